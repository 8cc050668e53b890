// src/mirror/writer.rs
// =============================================================================
// Mirrors a single asset URL onto the local filesystem.
//
// The local path is the URL's path, rooted under the output directory:
//   https://site.test/_next/static/a.css  ->  <root>/_next/static/a.css
//
// A file that already exists is never fetched again, so re-running a mirror
// only downloads what is missing. Stale files are not detected.
// =============================================================================

use serde::Serialize;
use std::path::{Path, PathBuf};
use url::Url;

use crate::extract::AssetClass;
use crate::fetch::{FetchError, Fetcher};

// What happened to one asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DownloadOutcome {
    /// Downloaded and written to disk
    Written { bytes: u64 },
    /// Already present locally; no request made
    Skipped,
    /// Gave up after the retry budget (or could not be saved)
    Failed { error: String },
}

// The result of mirroring a single asset
#[derive(Debug, Clone, Serialize)]
pub struct AssetResult {
    pub url: String,
    pub class: AssetClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(flatten)]
    pub outcome: DownloadOutcome,
}

impl AssetResult {
    /// True when the asset is on disk after the run (written or skipped).
    pub fn is_present(&self) -> bool {
        !matches!(self.outcome, DownloadOutcome::Failed { .. })
    }
}

/// Maps an asset URL to its path under `output_root`.
///
/// Returns `None` for unparseable URLs and for URLs whose path is just `/`.
pub fn mirror_path(output_root: &Path, url: &str) -> Option<PathBuf> {
    let parsed = Url::parse(url).ok()?;
    let relative = parsed.path().trim_start_matches('/');
    if relative.is_empty() {
        return None;
    }
    Some(output_root.join(relative))
}

// Mirrors one asset
//
// Never returns an error: failures are recorded in the outcome so the
// caller can move on to the next URL.
pub async fn mirror_asset(
    fetcher: &Fetcher,
    class: AssetClass,
    url: &str,
    output_root: &Path,
) -> AssetResult {
    let Some(path) = mirror_path(output_root, url) else {
        let error = FetchError::NoPath {
            url: url.to_string(),
        };
        return AssetResult {
            url: url.to_string(),
            class,
            path: None,
            outcome: DownloadOutcome::Failed {
                error: error.to_string(),
            },
        };
    };

    // Only a regular file counts; a directory in the way is a failure
    let outcome = if path.is_file() {
        DownloadOutcome::Skipped
    } else {
        match fetcher.download(url, &path).await {
            Ok(bytes) => DownloadOutcome::Written { bytes },
            Err(e) => DownloadOutcome::Failed {
                error: e.to_string(),
            },
        }
    };

    AssetResult {
        url: url.to_string(),
        class,
        path: Some(path),
        outcome,
    }
}
