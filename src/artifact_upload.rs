use anyhow::Result;
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::info;

use tracekit_artifacts::{ApiClient, Config, StoreClient, UploadOutcome, Uploader, discover};

#[derive(Parser, Debug)]
#[command(
    name = "artifact-upload",
    version = env!("CARGO_PKG_VERSION"),
    about = "Upload release build artifacts to the TraceKit artifact store",
    long_about = "Scans a build output directory for artifacts (source maps by default) and uploads \
                  each one to the TraceKit artifact store through the slot/transfer/confirm handshake. \
                  Intended to run right after the production build in CI. Exits non-zero if any \
                  artifact fails to upload, so it can gate a deploy. Configure via environment \
                  variables or a .env file.",
    after_help = "Examples:\n  \
                  artifact-upload                         # Upload *.map files from $TRACEKIT_DIST_DIR (./dist)\n  \
                  artifact-upload ./build -r 1.4.2        # Upload from ./build for release 1.4.2\n  \
                  artifact-upload --suffix .dbg           # Upload debug files instead of source maps\n\n\
                  Configuration (.env):\n  \
                  TRACEKIT_API_KEY=tk_live_...\n  \
                  TRACEKIT_APP_ID=my-app\n  \
                  TRACEKIT_RELEASE=1.4.2                  # Falls back to BUILD_VERSION, then \"dev\"\n  \
                  TRACEKIT_DIST_DIR=./dist\n  \
                  TRACEKIT_API_URL=https://api.tracekit.io\n\n\
                  For more information: https://github.com/tracekit/artifacts"
)]
struct Cli {
    /// Directory to scan for artifacts (overrides TRACEKIT_DIST_DIR)
    path: Option<PathBuf>,

    /// Release label the artifacts belong to (overrides TRACEKIT_RELEASE)
    #[arg(long, short = 'r')]
    release: Option<String>,

    /// Artifact file name suffix to match
    #[arg(long, default_value = ".map")]
    suffix: String,

    /// Maximum number of concurrent uploads
    #[arg(long, short = 'c', default_value = "4")]
    max_concurrent: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file early to get LOG_LEVEL
    dotenv::dotenv().ok();

    // Initialize tracing/logging with support for LOG_LEVEL from .env
    let log_level = std::env::var("LOG_LEVEL")
        .ok()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(&log_level))
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    info!("Artifact Upload Tool v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::from_env()?;
    if let Some(path) = &cli.path {
        config.dist_dir = path.display().to_string();
    }
    if let Some(release) = &cli.release {
        config.release = release.clone();
    }
    if config.release.trim().is_empty() {
        anyhow::bail!("release label cannot be empty");
    }

    println!("{}", style("TraceKit artifact upload").cyan().bold());
    println!("  App ID:   {}", config.app_id);
    println!("  Release:  {}", config.release);
    println!("  Dist dir: {}", config.dist_dir);
    println!("  API URL:  {}", config.api_url);
    println!();

    let files = discover(Path::new(&config.dist_dir), &cli.suffix);

    if files.is_empty() {
        println!(
            "{}",
            style(format!(
                "No artifacts matching '{}' found in {}",
                cli.suffix, config.dist_dir
            ))
            .yellow()
        );
        println!(
            "{}",
            style(
                "Make sure your build emits source maps (e.g. \"sourcemap: true\" in your bundler config)"
            )
            .dim()
        );
        return Ok(());
    }

    println!("Found {} artifact(s):", files.len());
    for file in &files {
        println!("  - {}", file.name);
    }
    println!();

    let api = ApiClient::new(&config.api_key, &config.app_id, &config.api_url)?;
    let store = StoreClient::new()?;
    let uploader = Uploader::new(api, store).with_max_concurrent(cli.max_concurrent);

    println!(
        "{}",
        style(format!(
            "⚡ Uploading with {} workers...",
            cli.max_concurrent
        ))
        .cyan()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let report = uploader
        .upload_files(&config.release, &files, Some(&pb))
        .await?;
    pb.finish_and_clear();

    println!();
    for outcome in &report.outcomes {
        match outcome {
            UploadOutcome::Uploaded {
                artifact,
                artifact_id,
            } => {
                println!(
                    "{} {} ({})",
                    style("✓").green(),
                    style(artifact).green(),
                    style(artifact_id).dim()
                );
            }
            UploadOutcome::Failed {
                artifact, error, ..
            } => {
                println!(
                    "{} {} - {}",
                    style("✗").red(),
                    style(artifact).red(),
                    style(error).red()
                );
            }
        }
    }

    println!("\n{}", style("═".repeat(70)).dim());
    println!(
        "{}",
        style(format!(
            "Summary: {} total, {} uploaded, {} failed",
            report.total(),
            report.succeeded(),
            report.failed()
        ))
        .bold()
    );

    if !report.is_clean() {
        println!("\n{}", style("Failed uploads:").red().bold());
        for outcome in report.failures() {
            if let UploadOutcome::Failed {
                artifact, error, ..
            } = outcome
            {
                println!("  - {}: {}", artifact, error);
            }
        }
        std::process::exit(1);
    }

    println!(
        "{}",
        style(format!(
            "✅ Artifacts uploaded for release \"{}\"",
            config.release
        ))
        .green()
    );

    Ok(())
}
