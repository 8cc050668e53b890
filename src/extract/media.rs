// src/extract/media.rs
// =============================================================================
// Finds bundler media references in raw text.
//
// Build tools like Next.js emit hashed asset paths such as
// `/_next/static/media/icon.a1b2.svg`. These mostly show up inside
// serialized script data rather than tag attributes, so a DOM query can't
// see them. We scan the text with a regex instead.
// =============================================================================

use regex::Regex;

/// Path prefix the bundler gives its static media files.
pub const DEFAULT_MEDIA_PREFIX: &str = "/_next/static/media/";

// Scans text for `<prefix><token>` where the token runs until whitespace,
// a quote, `)` or `]`
#[derive(Debug, Clone)]
pub struct MediaScanner {
    pattern: Regex,
}

impl MediaScanner {
    pub fn new(prefix: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(r#"{}[^"'\s)\]]+"#, regex::escape(prefix)))?;
        Ok(Self { pattern })
    }

    /// Every reference in `text`, with trailing escape/quote debris trimmed.
    pub fn scan<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pattern
            .find_iter(text)
            .map(|m| trim_reference(m.as_str()))
    }
}

impl Default for MediaScanner {
    fn default() -> Self {
        // The default prefix is escaped and known to compile
        Self::new(DEFAULT_MEDIA_PREFIX).expect("default media prefix is a valid pattern")
    }
}

// JSON-in-HTML leaves a `\` before the closing quote, e.g. `...svg\"`
fn trim_reference(raw: &str) -> &str {
    raw.trim_end_matches('\\')
        .trim_end_matches('"')
        .trim_end_matches('\'')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_reference_in_plain_text() {
        let scanner = MediaScanner::default();
        let found: Vec<_> = scanner
            .scan(r#"url(/_next/static/media/bg.123.png) more"#)
            .collect();
        assert_eq!(found, vec!["/_next/static/media/bg.123.png"]);
    }

    #[test]
    fn test_trims_escaped_json_quote() {
        let scanner = MediaScanner::default();
        let text = r#"self.__next_f.push([1,"{\"src\":\"/_next/static/media/hero.9f.webp\"}"])"#;
        let found: Vec<_> = scanner.scan(text).collect();
        assert_eq!(found, vec!["/_next/static/media/hero.9f.webp"]);
    }

    #[test]
    fn test_stops_at_bracket_and_whitespace() {
        let scanner = MediaScanner::default();
        let found: Vec<_> = scanner
            .scan("[/_next/static/media/a.svg] /_next/static/media/b.svg\n")
            .collect();
        assert_eq!(
            found,
            vec!["/_next/static/media/a.svg", "/_next/static/media/b.svg"]
        );
    }

    #[test]
    fn test_custom_prefix_is_escaped() {
        let scanner = MediaScanner::new("/static/media.v2/").unwrap();
        let found: Vec<_> = scanner
            .scan("/static/media.v2/x.png /static/mediaXv2/y.png")
            .collect();
        assert_eq!(found, vec!["/static/media.v2/x.png"]);
    }
}
