//! Shot Manifest Binary
//!
//! Drives the planning pipeline from the command line and prints JSON to
//! stdout. Logs go to stderr.
//!
//! ## Commands
//!
//! - `shot_manifest plan <catalog.json>`: expand an already-fetched story
//!   catalog into a shot plan
//! - `shot_manifest manifest <base-url>`: list the image directories and
//!   build the comparison and upload manifests for artifacts hosted at
//!   `<base-url>`
//!
//! ## Configuration
//!
//! Flags, each with an environment fallback:
//! - `--config` / `SHOT_MANIFEST_CONFIG`: JSON config file (optional; defaults otherwise)
//! - `--site-url` / `HISTOIRE_URL`: story site URL (overrides `histoireShots.histoireUrl`)
//! - `--browsers` / `SHOT_BROWSERS`: comma-separated browsers, e.g. `chromium,firefox`
//!
//! Environment only:
//! - `IMAGE_PATH_*`, `LOST_PIXEL_PROJECT_ID`, `CI_BUILD_ID`, `SHOT_THRESHOLD`: see `config`
//! - `RUST_LOG`: Log level filter (default: info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: json)
//!
//! ## Usage
//!
//! ```bash
//! HISTOIRE_URL=http://localhost:6006 cargo run --bin shot_manifest -- plan histoire.json
//! LOST_PIXEL_PROJECT_ID=web CI_BUILD_ID=812 cargo run --bin shot_manifest -- manifest https://cdn.example.com/web/812
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use shot_manifest::{
    compute_changes, read_image_files, Browser, ComparisonManifestBuilder, PipelineConfig,
    ShotPlanner, StoryCatalog,
};

/// Screenshot planning and comparison manifests
#[derive(Parser, Debug)]
#[command(name = "shot_manifest")]
#[command(version, about, long_about = None)]
struct Cli {
    /// JSON config file
    #[arg(long, env = "SHOT_MANIFEST_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Expand a saved story catalog into a shot plan
    Plan {
        /// Catalog document fetched from `<site>/histoire.json`
        catalog: PathBuf,

        /// Story site URL
        #[arg(long, env = "HISTOIRE_URL")]
        site_url: Option<String>,

        /// Browsers to plan for, comma-separated
        #[arg(long, env = "SHOT_BROWSERS", value_delimiter = ',', value_parser = parse_browser)]
        browsers: Vec<Browser>,
    },

    /// Build comparison and upload manifests from the image directories
    Manifest {
        /// Public URL the uploaded images are served from
        base_url: String,
    },
}

fn parse_browser(name: &str) -> Result<Browser, String> {
    Browser::from_str(name.trim()).ok_or_else(|| format!("unknown browser: {}", name))
}

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shot_manifest=info".into());

    if log_format == "pretty" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
    let mut config = match path {
        Some(path) if !path.as_os_str().is_empty() => {
            info!(path = %path.display(), "loading config file");
            PipelineConfig::from_file(path)?
        }
        _ => PipelineConfig::default(),
    };
    config.apply_env()?;

    info!(fingerprint = %config.fingerprint(), "configuration loaded");
    Ok(config)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = std::io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), value)?;
    println!();
    Ok(())
}

fn run_plan(
    config: PipelineConfig,
    catalog_path: &Path,
    site_url: Option<String>,
    browsers: &[Browser],
) -> Result<(), Box<dyn std::error::Error>> {
    let site_url = site_url
        .filter(|s| !s.is_empty())
        .or_else(|| config.histoire_shots.as_ref().map(|h| h.histoire_url.clone()))
        .ok_or("no story site URL: set --site-url, HISTOIRE_URL or histoireShots.histoireUrl")?;

    let catalog = StoryCatalog::from_file(catalog_path)?;
    info!(
        stories = catalog.stories.len(),
        variants = catalog.variant_count(),
        "story catalog parsed"
    );

    let planner = ShotPlanner::new(config)?;
    let plan = planner.plan_for_browsers(&site_url, &catalog.stories, browsers);
    print_json(&plan)
}

fn run_manifest(config: PipelineConfig, base_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let files = read_image_files(&config.image_paths);
    let changes = compute_changes(&files);

    if changes.is_empty() {
        info!("no visual changes");
    }

    let bundle = ComparisonManifestBuilder::from_config(base_url, &config).build(&changes);
    print_json(&bundle)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing();

    info!(version = env!("CARGO_PKG_VERSION"), "Starting shot_manifest");

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Plan {
            catalog,
            site_url,
            browsers,
        } => run_plan(config, &catalog, site_url, &browsers),
        Command::Manifest { base_url } => run_manifest(config, &base_url),
    }
}
