// src/extract/html.rs
// =============================================================================
// This module extracts asset URLs from an HTML page.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// Attribute-based classes (stylesheet, script, image, font) come from
// `href`/`src` values. Bundler media references come from a text scan of the
// raw HTML plus every inline <script> body.
//
// Every pass is independent: a value that matches two classes lands in both.
// =============================================================================

use scraper::{Html, Selector};
use url::Url;

use super::assets::{AssetClass, AssetSet};
use super::media::MediaScanner;

const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".svg", ".webp"];
const FONT_EXTENSIONS: &[&str] = &[".woff2", ".woff", ".ttf", ".otf"];

// Extracts every asset class from an HTML page
//
// Parameters:
//   html: the page's decoded text
//   base: the page's URL, for resolving relative references
//   media: scanner for bundler media references
//
// Example:
//   html = r#"<link href="/a.css"><img src="/x.PNG">"#
//   base = "https://example.com"
//   stylesheet = {"https://example.com/a.css"}, image = {"https://example.com/x.PNG"}
pub fn extract_assets(html: &str, base: &Url, media: &MediaScanner) -> AssetSet {
    let document = Html::parse_document(html);
    let mut assets = AssetSet::default();

    // The selectors below are constants and known to be valid
    let href = Selector::parse("[href]").expect("static selector");
    let src = Selector::parse("[src]").expect("static selector");
    let preload = Selector::parse(r#"link[rel~="preload"][href]"#).expect("static selector");

    for value in attribute_values(&document, &href, "href") {
        let Some(url) = resolve_asset_url(base, value) else {
            continue;
        };
        if value.contains(".css") {
            assets.insert(AssetClass::Stylesheet, url.clone());
        }
        if contains_any_ignore_case(value, FONT_EXTENSIONS) {
            assets.insert(AssetClass::Font, url);
        }
    }

    for value in attribute_values(&document, &src, "src") {
        let Some(url) = resolve_asset_url(base, value) else {
            continue;
        };
        if value.contains(".js") {
            assets.insert(AssetClass::Script, url.clone());
        }
        if contains_any_ignore_case(value, IMAGE_EXTENSIONS) {
            assets.insert(AssetClass::Image, url);
        }
    }

    // Preload hints for woff2 fonts. The general font pass above already
    // covers these; the set absorbs the overlap.
    for value in attribute_values(&document, &preload, "href") {
        if contains_any_ignore_case(value, &[".woff2"]) {
            if let Some(url) = resolve_asset_url(base, value) {
                assets.insert(AssetClass::Font, url);
            }
        }
    }

    collect_media(html, &document, base, media, &mut assets);

    assets
}

// Extracts only bundler media references (used by the second-pass command)
pub fn extract_media(html: &str, base: &Url, media: &MediaScanner) -> AssetSet {
    let document = Html::parse_document(html);
    let mut assets = AssetSet::default();
    collect_media(html, &document, base, media, &mut assets);
    assets
}

// Scans the raw page and then each inline script body. Script text is
// scanned a second time because references there live in serialized data.
fn collect_media(
    html: &str,
    document: &Html,
    base: &Url,
    media: &MediaScanner,
    assets: &mut AssetSet,
) {
    for reference in media.scan(html) {
        if let Ok(url) = base.join(reference) {
            assets.insert(AssetClass::Media, url.to_string());
        }
    }

    let script = Selector::parse("script").expect("static selector");
    for element in document.select(&script) {
        let body: String = element.text().collect();
        for reference in media.scan(&body) {
            if let Ok(url) = base.join(reference) {
                assets.insert(AssetClass::Media, url.to_string());
            }
        }
    }
}

// All values of `attr` on elements matching `selector`
fn attribute_values<'a>(
    document: &'a Html,
    selector: &'a Selector,
    attr: &'a str,
) -> impl Iterator<Item = &'a str> + 'a {
    document
        .select(selector)
        .filter_map(move |element| element.value().attr(attr))
}

// Resolves an attribute value to an absolute URL
//
// Only values that are absolute (`http...`) or root-relative (`/...`) are
// accepted. Absolute values are kept exactly as written.
//
// Examples:
//   base = "https://example.com/page"
//   "/docs/a.css"            -> Some("https://example.com/docs/a.css")
//   "//cdn.test/a.js"        -> Some("https://cdn.test/a.js")
//   "https://x.test/b.css"   -> Some("https://x.test/b.css")
//   "a.css"                  -> None (page-relative, ignored)
fn resolve_asset_url(base: &Url, value: &str) -> Option<String> {
    if value.starts_with("http") {
        return Some(value.to_string());
    }
    if !value.starts_with('/') {
        return None;
    }
    base.join(value).ok().map(|url| url.to_string())
}

fn contains_any_ignore_case(value: &str, needles: &[&str]) -> bool {
    let lowered = value.to_ascii_lowercase();
    needles.iter().any(|needle| lowered.contains(needle))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why "[href]" instead of "link[href]"?
//    - Assets are referenced from many tags (<link>, <a>, <use>, ...)
//    - "[href]" means "any element that has an href attribute"
//
// 2. What is let-else?
//    - `let Some(x) = expr else { continue; };`
//    - Binds x if the pattern matches, otherwise runs the else block
//    - The else block must leave the current scope (continue, return, ...)
//
// 3. Why BTreeSet (inside AssetSet) instead of HashSet?
//    - Both drop duplicates
//    - BTreeSet also keeps items sorted, so downloads happen in a stable order
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> AssetSet {
        let base = Url::parse("https://example.com/page").unwrap();
        extract_assets(html, &base, &MediaScanner::default())
    }

    fn urls(set: &std::collections::BTreeSet<String>) -> Vec<&str> {
        set.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_stylesheet_relative_and_absolute() {
        let assets = extract(
            r#"<link rel="stylesheet" href="/a.css">
               <link rel="stylesheet" href="https://x.test/b.css">"#,
        );
        assert_eq!(
            urls(&assets.stylesheet),
            vec!["https://example.com/a.css", "https://x.test/b.css"]
        );
    }

    #[test]
    fn test_page_relative_values_are_ignored() {
        let assets = extract(r#"<link href="a.css"><script src="app.js"></script>"#);
        assert!(assets.stylesheet.is_empty());
        assert!(assets.script.is_empty());
    }

    #[test]
    fn test_script_sources() {
        let assets = extract(
            r#"<script src="/_next/static/chunks/main.js?v=2"></script>
               <script src="//cdn.test/lib.js"></script>"#,
        );
        assert_eq!(
            urls(&assets.script),
            vec![
                "https://cdn.test/lib.js",
                "https://example.com/_next/static/chunks/main.js?v=2",
            ]
        );
    }

    #[test]
    fn test_duplicate_images_collapse() {
        let assets = extract(r#"<img src="/img/a.png"><img src="/img/a.png">"#);
        assert_eq!(urls(&assets.image), vec!["https://example.com/img/a.png"]);
    }

    #[test]
    fn test_image_extension_is_case_insensitive() {
        let assets = extract(r#"<img src="/x.PNG">"#);
        assert_eq!(urls(&assets.image), vec!["https://example.com/x.PNG"]);
    }

    #[test]
    fn test_preload_font_counted_once() {
        let assets = extract(
            r#"<link rel="preload" href="/f.woff2" as="font" crossorigin>
               <link rel="stylesheet" href="/f.woff2">"#,
        );
        assert_eq!(urls(&assets.font), vec!["https://example.com/f.woff2"]);
    }

    #[test]
    fn test_other_font_formats() {
        let assets = extract(r#"<link href="/fonts/a.TTF"><link href="/fonts/b.otf">"#);
        assert_eq!(
            urls(&assets.font),
            vec!["https://example.com/fonts/a.TTF", "https://example.com/fonts/b.otf"]
        );
    }

    #[test]
    fn test_inline_script_media_reference() {
        let assets = extract(
            r#"<html><body><script>
                 self.__next_f.push([1,"{\"icon\":\"/_next/static/media/icon.a1b2.svg\"}"])
               </script></body></html>"#,
        );
        assert_eq!(
            urls(&assets.media),
            vec!["https://example.com/_next/static/media/icon.a1b2.svg"]
        );
        assert!(assets.image.is_empty());
    }

    #[test]
    fn test_value_can_land_in_two_classes() {
        let assets = extract(r#"<img src="/_next/static/media/logo.png">"#);
        assert_eq!(
            urls(&assets.image),
            vec!["https://example.com/_next/static/media/logo.png"]
        );
        assert_eq!(
            urls(&assets.media),
            vec!["https://example.com/_next/static/media/logo.png"]
        );
    }

    #[test]
    fn test_extract_media_skips_attribute_classes() {
        let base = Url::parse("https://example.com").unwrap();
        let html = r#"<link href="/a.css"><script>"/_next/static/media/f.woff2"</script>"#;
        let assets = extract_media(html, &base, &MediaScanner::default());

        assert!(assets.stylesheet.is_empty());
        assert_eq!(
            urls(&assets.media),
            vec!["https://example.com/_next/static/media/f.woff2"]
        );
    }
}
