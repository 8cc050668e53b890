// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Subcommands:
// - clone: download a page plus every asset it references
// - media: second pass over an already-saved index.html
// - logo:  write the small logo PNG
// =============================================================================

use clap::builder::NonEmptyStringValueParser;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::extract::DEFAULT_MEDIA_PREFIX;
use crate::fetch::{DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS};
use crate::logo::{DEFAULT_LOGO_FILE, DEFAULT_LOGO_SIZE};
use crate::mirror::{default_output_dir, MirrorConfig};

/// Site mirrored when no URL is given.
pub const DEFAULT_SITE: &str = "https://endless.design";

#[derive(Parser, Debug)]
#[command(
    name = "site-mirror",
    version,
    about = "Mirror a single web page and the assets it references",
    long_about = "site-mirror downloads one HTML page, finds its stylesheets, scripts, images, \
                  fonts and bundler media files, and saves each one under a local directory \
                  that mirrors the remote URL paths. Files that already exist are skipped."
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    ///
    /// Logs go to stderr. RUST_LOG overrides this flag when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download a page and mirror all of its assets
    ///
    /// Example: site-mirror clone https://endless.design --output mirror
    Clone {
        /// Page to mirror
        #[arg(default_value = DEFAULT_SITE)]
        url: Url,

        #[command(flatten)]
        options: MirrorOptions,
    },

    /// Mirror bundler media files referenced by an already-saved index.html
    ///
    /// Exits with code 1 if <output>/index.html does not exist.
    Media {
        /// URL the saved page came from; media paths are resolved against it
        #[arg(long, default_value = DEFAULT_SITE)]
        base_url: Url,

        #[command(flatten)]
        options: MirrorOptions,
    },

    /// Write a small square logo PNG from base64 data
    Logo {
        /// File holding base64 PNG data (defaults to the built-in logo)
        #[arg(long)]
        base64_file: Option<PathBuf>,

        /// Where to write the PNG
        #[arg(long, default_value = DEFAULT_LOGO_FILE)]
        output: PathBuf,

        /// Side length in pixels
        #[arg(long, default_value_t = DEFAULT_LOGO_SIZE, value_parser = clap::value_parser!(u32).range(1..))]
        size: u32,
    },
}

// Flags shared by `clone` and `media`
#[derive(Args, Debug)]
pub struct MirrorOptions {
    /// Output directory (defaults to the URL's host name)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Attempts per URL before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES)]
    pub retries: u32,

    /// Path prefix that marks bundler media references
    #[arg(long, default_value = DEFAULT_MEDIA_PREFIX, value_parser = NonEmptyStringValueParser::new())]
    pub media_prefix: String,

    /// Print the report as JSON instead of progress lines
    #[arg(long)]
    pub json: bool,
}

impl MirrorOptions {
    /// Builds the run configuration for `url`.
    pub fn into_config(self, url: Url) -> MirrorConfig {
        let output_dir = self.output.unwrap_or_else(|| default_output_dir(&url));

        let mut config = MirrorConfig::new(url, output_dir);
        config.timeout = Duration::from_secs(self.timeout);
        config.max_retries = self.retries;
        config.media_prefix = self.media_prefix;
        config.progress = !self.json;
        config
    }
}


// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does #[command(flatten)] do?
//    - It splices the fields of another Args struct into this subcommand
//    - `clone` and `media` share MirrorOptions without repeating the flags
//
// 2. How does clap parse a Url?
//    - Url implements FromStr, and clap falls back to FromStr for any type
//    - An invalid URL becomes a normal "invalid value" error with usage help
//
// 3. What is ArgAction::Count?
//    - Each repetition of the flag adds one: -v = 1, -vv = 2, -vvv = 3
// -----------------------------------------------------------------------------
