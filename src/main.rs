// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging
// 3. Dispatch to the appropriate subcommand handler
// 4. Print the report
// 5. Exit with proper code (0 = all assets present, 1 = some failed or the
//    media pass had no index.html, 2 = fatal error)
// =============================================================================

mod cli;      // src/cli.rs - command-line parsing
mod extract;  // src/extract/ - finding asset URLs in HTML
mod fetch;    // src/fetch/ - HTTP downloads with retries
mod logging;  // src/logging.rs - tracing setup
mod logo;     // src/logo.rs - base64 PNG logo
mod mirror;   // src/mirror/ - writing assets to disk, full runs

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use url::Url;

use cli::{Cli, Commands, MirrorOptions};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = every asset is on disk
//   Ok(1) = some assets failed, or a prerequisite file is missing
//   Err   = fatal error (mapped to exit code 2)
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    match cli.command {
        Commands::Clone { url, options } => handle_clone(url, options).await,
        Commands::Media { base_url, options } => handle_media(base_url, options).await,
        Commands::Logo {
            base64_file,
            output,
            size,
        } => handle_logo(base64_file, &output, size),
    }
}

// Handles the 'clone' subcommand
async fn handle_clone(url: Url, options: MirrorOptions) -> Result<i32> {
    let json = options.json;
    let config = options.into_config(url);

    if !json {
        println!("{}", "=".repeat(60));
        println!("Cloning {}", config.base_url);
        println!("{}", "=".repeat(60));
    }

    let report = mirror::mirror_site(&config).await?;
    print_report(&report, json)?;

    Ok(report.exit_code())
}

// Handles the 'media' subcommand
//
// This pass only makes sense after a clone, so a missing index.html is
// reported and turned into exit code 1 rather than an error.
async fn handle_media(base_url: Url, options: MirrorOptions) -> Result<i32> {
    let json = options.json;
    let config = options.into_config(base_url);

    match mirror::mirror_media(&config).await? {
        mirror::MediaRun::IndexMissing(index_path) => {
            eprintln!("Error: {} not found", index_path.display());
            Ok(1)
        }
        mirror::MediaRun::Finished(report) => {
            print_report(&report, json)?;
            Ok(report.exit_code())
        }
    }
}

// Handles the 'logo' subcommand
//
// Image decoding and encoding are blocking work, so this stays a plain fn.
fn handle_logo(base64_file: Option<PathBuf>, output: &Path, size: u32) -> Result<i32> {
    let encoded = match base64_file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("could not read {}", path.display()))?,
        None => logo::EMBEDDED_LOGO.to_string(),
    };

    match logo::create_logo(&encoded, output, size)? {
        logo::LogoSource::Decoded => {
            println!("✓ Created {} ({}x{})", output.display(), size, size);
        }
        logo::LogoSource::Resized { width, height } => {
            println!(
                "✓ Created {} ({}x{}, resized from {}x{})",
                output.display(),
                size,
                size,
                width,
                height
            );
        }
        logo::LogoSource::Fallback => {
            println!("⚠️  Logo data was unreadable; drew a fallback glyph");
            println!("✓ Created {} ({}x{})", output.display(), size, size);
        }
    }

    Ok(0)
}

// Prints the report either as a summary or JSON
fn print_report(report: &mirror::MirrorReport, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(report)?;
        println!("{}", json_output);
    } else {
        print_summary(report);
    }
    Ok(())
}

fn print_summary(report: &mirror::MirrorReport) {
    let failures: Vec<_> = report.failures().collect();
    if !failures.is_empty() {
        println!("\n❌ Failed assets:");
        for asset in &failures {
            if let mirror::DownloadOutcome::Failed { error } = &asset.outcome {
                println!("   {} ({}): {}", asset.url, asset.class, error);
            }
        }
    }

    println!();
    println!("📊 Summary:");
    println!("   ✅ {}", mirror::summary_line(&report.summary));
    println!("   ⏭️  Already present: {}", report.summary.skipped);
    println!("   ❌ Failed: {}", report.summary.failed);
    println!("📁 Files saved to: {}", report.output_dir.display());
}
