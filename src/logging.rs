// src/logging.rs
// =============================================================================
// Diagnostic logging with `tracing`.
//
// Logs go to stderr so they never mix with the progress lines and JSON
// report on stdout. RUST_LOG takes precedence over the -v flag.
// =============================================================================

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Initialize diagnostics on stderr.
///
/// `RUST_LOG` wins when set; otherwise the `-v` count picks the level.
/// Progress output stays on stdout and is not affected.
pub fn init_logging(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},site_mirror={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))?;

    tracing::debug!("logging initialized at level {}", level);

    Ok(())
}
