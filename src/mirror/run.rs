// src/mirror/run.rs
// =============================================================================
// This module runs a whole mirror from start to finish.
//
// How `mirror_site` works:
// 1. Fetch the root HTML page once (failure here is fatal)
// 2. Save it verbatim as <output>/index.html
// 3. Extract stylesheet, script, image, font and media URLs
// 4. Mirror each class in turn, one URL at a time, in sorted order
// 5. Return a report; failed assets never abort the run
//
// `mirror_media` is the second pass: it re-reads a saved index.html and
// mirrors only the bundler media references found in it.
//
// Everything is sequential. There are no parallel requests and no rate
// limiting beyond the per-request timeout.
// =============================================================================

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use url::Url;

use super::writer::{mirror_asset, mirror_path, AssetResult, DownloadOutcome};
use crate::extract::{self, AssetSet, MediaScanner, DEFAULT_MEDIA_PREFIX};
use crate::fetch::{Fetcher, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS};

/// File name the root page is saved under.
pub const INDEX_FILE: &str = "index.html";

// Settings for one mirror run
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// Page to mirror; also the base for resolving relative references
    pub base_url: Url,
    /// Local root every mirrored path lives under
    pub output_dir: PathBuf,
    pub timeout: Duration,
    pub max_retries: u32,
    pub media_prefix: String,
    /// Print progress lines to stdout
    pub progress: bool,
}

impl MirrorConfig {
    pub fn new(base_url: Url, output_dir: PathBuf) -> Self {
        Self {
            base_url,
            output_dir,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            media_prefix: DEFAULT_MEDIA_PREFIX.to_string(),
            progress: true,
        }
    }

    pub fn index_path(&self) -> PathBuf {
        self.output_dir.join(INDEX_FILE)
    }
}

/// Output directory named after the URL's host (`https://a.test/x` -> `a.test`).
pub fn default_output_dir(url: &Url) -> PathBuf {
    PathBuf::from(url.host_str().unwrap_or("site"))
}

// Counts derived from the per-asset results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MirrorSummary {
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
    pub total: usize,
}

impl MirrorSummary {
    /// Assets on disk after the run.
    pub fn present(&self) -> usize {
        self.written + self.skipped
    }
}

// Everything a run produced
#[derive(Debug, Clone, Serialize)]
pub struct MirrorReport {
    pub base_url: String,
    pub output_dir: PathBuf,
    /// Size of the saved root page (absent for the media-only pass)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_bytes: Option<usize>,
    pub summary: MirrorSummary,
    pub assets: Vec<AssetResult>,
}

impl MirrorReport {
    fn new(config: &MirrorConfig, index_bytes: Option<usize>, assets: Vec<AssetResult>) -> Self {
        let mut summary = MirrorSummary {
            total: assets.len(),
            ..MirrorSummary::default()
        };
        for asset in &assets {
            match asset.outcome {
                DownloadOutcome::Written { .. } => summary.written += 1,
                DownloadOutcome::Skipped => summary.skipped += 1,
                DownloadOutcome::Failed { .. } => summary.failed += 1,
            }
        }

        Self {
            base_url: config.base_url.to_string(),
            output_dir: config.output_dir.clone(),
            index_bytes,
            summary,
            assets,
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &AssetResult> {
        self.assets.iter().filter(|asset| !asset.is_present())
    }

    /// Process exit code: 0 when every asset is on disk, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.summary.failed > 0 {
            1
        } else {
            0
        }
    }
}

// What the media-only pass found
#[derive(Debug)]
pub enum MediaRun {
    /// No saved page to scan; nothing was requested
    IndexMissing(PathBuf),
    Finished(MirrorReport),
}

// Prints only when progress output is enabled
macro_rules! progress {
    ($config:expr, $($arg:tt)*) => {
        if $config.progress {
            println!($($arg)*);
        }
    };
}

// Mirrors the root page and every asset it references
pub async fn mirror_site(config: &MirrorConfig) -> Result<MirrorReport> {
    let fetcher = Fetcher::new(config.timeout, config.max_retries)?;
    let scanner = MediaScanner::new(&config.media_prefix)
        .with_context(|| format!("invalid media prefix '{}'", config.media_prefix))?;

    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .with_context(|| format!("could not create {}", config.output_dir.display()))?;

    progress!(config, "\n[1/3] Downloading main page...");
    info!(url = %config.base_url, retries = fetcher.max_retries(), "fetching root page");

    let page = fetcher
        .fetch(config.base_url.as_str())
        .await
        .with_context(|| format!("could not download main page {}", config.base_url))?;

    let index_path = config.index_path();
    tokio::fs::write(&index_path, &page)
        .await
        .with_context(|| format!("could not save {}", index_path.display()))?;

    progress!(config, "✓ Saved HTML ({} bytes) to {}", page.len(), index_path.display());

    progress!(config, "\n[2/3] Extracting assets...");
    let html = String::from_utf8_lossy(&page);
    let assets = extract::extract_assets(&html, &config.base_url, &scanner);

    progress!(
        config,
        "✓ Found {} CSS, {} JS, {} images, {} fonts, {} media files",
        assets.stylesheet.len(),
        assets.script.len(),
        assets.image.len(),
        assets.font.len(),
        assets.media.len()
    );

    progress!(config, "\n[3/3] Downloading assets...");
    let results = mirror_all(config, &fetcher, &assets).await;

    Ok(MirrorReport::new(config, Some(page.len()), results))
}

// Second pass: mirror the media references of an already-saved index.html
//
// A missing index.html is not an error: the pass only makes sense after a
// clone, so it is reported back as `MediaRun::IndexMissing`.
pub async fn mirror_media(config: &MirrorConfig) -> Result<MediaRun> {
    let index_path = config.index_path();
    if !index_path.is_file() {
        return Ok(MediaRun::IndexMissing(index_path));
    }

    let fetcher = Fetcher::new(config.timeout, config.max_retries)?;
    let scanner = MediaScanner::new(&config.media_prefix)
        .with_context(|| format!("invalid media prefix '{}'", config.media_prefix))?;

    let page = tokio::fs::read(&index_path)
        .await
        .with_context(|| format!("could not read {}", index_path.display()))?;
    let html = String::from_utf8_lossy(&page);

    let assets = extract::extract_media(&html, &config.base_url, &scanner);
    progress!(config, "Found {} media files to download", assets.media.len());

    let results = mirror_all(config, &fetcher, &assets).await;

    Ok(MediaRun::Finished(MirrorReport::new(config, None, results)))
}

// Mirrors every class in download order; empty classes are skipped silently
async fn mirror_all(config: &MirrorConfig, fetcher: &Fetcher, assets: &AssetSet) -> Vec<AssetResult> {
    let mut results = Vec::with_capacity(assets.total());

    for (class, urls) in assets.iter() {
        if urls.is_empty() {
            continue;
        }

        progress!(config, "  {} files:", class);
        info!(%class, count = urls.len(), "mirroring");

        for (i, url) in urls.iter().enumerate() {
            // Name first, marker once the download settles
            if config.progress {
                print!("{}", pending_label(i + 1, urls.len(), url, &config.output_dir));
                let _ = std::io::stdout().flush();
            }

            let result = mirror_asset(fetcher, class, url, &config.output_dir).await;
            progress!(config, "{}", outcome_marker(&result.outcome));
            results.push(result);
        }
    }

    results
}

// `  [2/5] app.css... `, printed before the request goes out
fn pending_label(position: usize, count: usize, url: &str, output_root: &Path) -> String {
    format!("  [{}/{}] {}... ", position, count, display_name(url, output_root))
}

// File name for progress lines, falling back to the URL
fn display_name(url: &str, output_root: &Path) -> String {
    mirror_path(output_root, url)
        .as_deref()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| url.to_string())
}

fn outcome_marker(outcome: &DownloadOutcome) -> String {
    match outcome {
        DownloadOutcome::Written { .. } => "✓".to_string(),
        DownloadOutcome::Skipped => "(exists)".to_string(),
        DownloadOutcome::Failed { error } => format!("✗ {}", error),
    }
}

/// Human-readable one-liner, e.g. `3/3 assets written`.
pub fn summary_line(summary: &MirrorSummary) -> String {
    format!("{}/{} assets written", summary.present(), summary.total)
}
