// src/mirror/mod.rs
// =============================================================================
// This module mirrors a page and its assets onto the local filesystem.
//
// Submodules:
// - writer: URL -> local path mapping, skip-if-present, single downloads
// - run: the full `clone` flow and the media-only second pass
// =============================================================================

mod run;
mod writer;

pub use run::{
    default_output_dir, mirror_media, mirror_site, summary_line, MediaRun, MirrorConfig,
    MirrorReport,
};
pub use writer::DownloadOutcome;
