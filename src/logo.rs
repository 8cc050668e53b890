// src/logo.rs
// =============================================================================
// Writes a small square logo PNG from base64 data.
//
// The built-in data is a 20x20 black ring mark. Other data can be supplied
// from a file. Images of the wrong size are resized with a Lanczos3 filter.
// If the data can't be decoded at all, a simple ring glyph is drawn instead.
// =============================================================================

use anyhow::{Context, Result};
use base64::Engine;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::path::Path;
use tracing::warn;

/// Default side length in pixels.
pub const DEFAULT_LOGO_SIZE: u32 = 20;

/// Default output file name.
pub const DEFAULT_LOGO_FILE: &str = "openai-logo.png";

/// Built-in 20x20 RGBA PNG.
pub const EMBEDDED_LOGO: &str = "\
iVBORw0KGgoAAAANSUhEUgAAABQAAAAUCAYAAACNiR0NAAAARUlEQVR42mNgGOrgPw5MNYPIMpgYDUQbSqqX\
CKrHpgCfN/EaSIxhJBmKLkFshIwaSMNIoXqyoUnCpnrWo0nhQJPia/AAAPXVh3kOTYG7AAAAAElFTkSuQmCC";

// How the written logo was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoSource {
    /// Decoded and already the requested size
    Decoded,
    /// Decoded, then resized from the given dimensions
    Resized { width: u32, height: u32 },
    /// Decoding failed; the drawn glyph was written
    Fallback,
}

// Decodes `encoded` and writes a `size` x `size` PNG to `output`
//
// Errors only when the output file can't be written; bad input data falls
// back to the drawn glyph.
pub fn create_logo(encoded: &str, output: &Path, size: u32) -> Result<LogoSource> {
    let (image, source) = match decode_logo(encoded) {
        Ok(image) if image.width() == size && image.height() == size => {
            (image, LogoSource::Decoded)
        }
        Ok(image) => {
            let source = LogoSource::Resized {
                width: image.width(),
                height: image.height(),
            };
            (image.resize_exact(size, size, FilterType::Lanczos3), source)
        }
        Err(e) => {
            warn!("could not decode logo data, drawing fallback: {:#}", e);
            (DynamicImage::ImageRgba8(draw_fallback(size)), LogoSource::Fallback)
        }
    };

    image
        .save_with_format(output, ImageFormat::Png)
        .with_context(|| format!("could not write {}", output.display()))?;

    Ok(source)
}

fn decode_logo(encoded: &str) -> Result<DynamicImage> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .context("invalid base64")?;
    let image = image::load_from_memory(&bytes).context("invalid image data")?;
    Ok(image)
}

// Black disc, white ring, black centre dot on a transparent canvas.
// Radii are 8, 4 and 1 at 20px and scale with `size`.
fn draw_fallback(size: u32) -> RgbaImage {
    let scale = size as f32 / 20.0;
    let centre = size as f32 / 2.0;
    let (outer, middle, inner) = (8.0 * scale, 4.0 * scale, 1.0 * scale);

    let black = Rgba([0, 0, 0, 255]);
    let white = Rgba([255, 255, 255, 255]);
    let clear = Rgba([255, 255, 255, 0]);

    RgbaImage::from_fn(size, size, |x, y| {
        let dx = x as f32 + 0.5 - centre;
        let dy = y as f32 + 0.5 - centre;
        let distance = (dx * dx + dy * dy).sqrt();

        if distance <= inner {
            black
        } else if distance <= middle {
            white
        } else if distance <= outer {
            black
        } else {
            clear
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_logo_is_written_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("logo.png");

        let source = create_logo(EMBEDDED_LOGO, &output, DEFAULT_LOGO_SIZE).unwrap();
        assert_eq!(source, LogoSource::Decoded);

        let written = image::open(&output).unwrap();
        assert_eq!((written.width(), written.height()), (20, 20));
    }

    #[test]
    fn test_wrong_size_is_resized() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("logo.png");

        let source = create_logo(EMBEDDED_LOGO, &output, 32).unwrap();
        assert_eq!(
            source,
            LogoSource::Resized {
                width: 20,
                height: 20
            }
        );

        let written = image::open(&output).unwrap();
        assert_eq!((written.width(), written.height()), (32, 32));
    }

    #[test]
    fn test_bad_data_falls_back_to_glyph() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("logo.png");

        let source = create_logo("not base64 at all!", &output, 20).unwrap();
        assert_eq!(source, LogoSource::Fallback);

        let written = image::open(&output).unwrap().to_rgba8();
        assert_eq!(written.get_pixel(10, 10), &Rgba([0, 0, 0, 255]));
        assert_eq!(written.get_pixel(10, 7), &Rgba([255, 255, 255, 255]));
        assert_eq!(written.get_pixel(0, 0)[3], 0);
    }
}
