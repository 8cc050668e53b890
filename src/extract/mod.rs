// src/extract/mod.rs
// =============================================================================
// This module finds the assets an HTML page references.
//
// Submodules:
// - assets: AssetClass and the per-class AssetSet
// - html: DOM-based attribute passes over href/src values
// - media: text scan for bundler media references
// =============================================================================

mod assets;
mod html;
mod media;

pub use assets::{AssetClass, AssetSet};
pub use html::{extract_assets, extract_media};
pub use media::{MediaScanner, DEFAULT_MEDIA_PREFIX};
