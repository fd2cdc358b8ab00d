//! CLI entry point for the GTFS zip fixer.
//!
//! Parses the flag surface, builds the transformation registry, runs the
//! archive pipeline once, and reports per-file statistics plus a JSON run
//! summary.

use anyhow::{Context, Result};
use clap::Parser;
use gtfs_fix::config::{Options, build_registry};
use gtfs_fix::pipeline::transform_zip;
use gtfs_fix::report::print_json;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "gtfs_fix")]
#[command(about = "Modifies the source GTFS zip file and saves it as target", long_about = None)]
struct Cli {
    /// Source GTFS zip file
    source: PathBuf,

    /// Target GTFS zip file
    target: PathBuf,

    /// Add the `bikes_allowed` column to trips.txt and set all of its values to allowed
    #[arg(long)]
    bikes_allowed: bool,

    /// If the `bikes_allowed` column does already exist, don't fail and set
    /// all undefined values to allowed
    #[arg(long)]
    bikes_allowed_exists_ok: bool,

    /// Fix a file with unescaped double quotes (repeatable)
    #[arg(long, value_name = "FILE")]
    escape_double_quotes: Vec<String>,

    /// Rewrite `location_type` 2 to 0 in stops.txt
    #[arg(long)]
    change_stop_location_type: bool,

    /// Drop a file from the archive (repeatable)
    #[arg(long, value_name = "FILE")]
    delete: Vec<String>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/gtfs_fix.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("gtfs_fix.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let options = Options {
        bikes_allowed: cli.bikes_allowed,
        bikes_allowed_exists_ok: cli.bikes_allowed_exists_ok,
        escape_double_quotes: cli.escape_double_quotes,
        change_stop_location_type: cli.change_stop_location_type,
        delete: cli.delete,
    };

    if cli.bikes_allowed_exists_ok && !cli.bikes_allowed {
        warn!("--bikes-allowed-exists-ok has no effect without --bikes-allowed");
    }

    let registry = build_registry(&options)?;
    if registry.is_empty() {
        info!("No transformations selected, copying the archive unchanged");
    }

    info!(
        source = %cli.source.display(),
        target = %cli.target.display(),
        "Transforming GTFS archive"
    );

    let summary = transform_zip(&cli.source, &cli.target, &registry)
        .with_context(|| format!("failed to transform `{}`", cli.source.display()))?;

    print_json(&summary)?;

    Ok(())
}
