//! CLI entry point for the streaming records tool.
//!
//! Scrapes the Spotify streaming records table from Wikipedia into SQLite and
//! derives a report of top songs, stream distribution and top artists.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use streaming_records::config::PipelineConfig;
use streaming_records::pipeline;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "streaming_records")]
#[command(about = "Scrape and summarize the Spotify streaming records table", long_about = None)]
struct Cli {
    /// JSON config file; flags given on the command line take precedence
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the page, store the records, then build the report
    Run {
        /// URL to fetch or local HTML file
        #[arg(short, long, value_name = "FILE_OR_URL")]
        source: Option<String>,

        /// SQLite database file
        #[arg(long)]
        db: Option<String>,

        /// JSON report output path
        #[arg(short, long)]
        report: Option<String>,

        /// Optional CSV export of the stored records
        #[arg(long)]
        csv: Option<String>,

        /// Log the full report as pretty JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Scrape the page and replace the stored records
    Scrape {
        /// URL to fetch or local HTML file
        #[arg(short, long, value_name = "FILE_OR_URL")]
        source: Option<String>,

        /// SQLite database file
        #[arg(long)]
        db: Option<String>,
    },
    /// Build the report from already stored records
    Report {
        /// SQLite database file
        #[arg(long)]
        db: Option<String>,

        /// JSON report output path
        #[arg(short, long)]
        report: Option<String>,

        /// Optional CSV export of the stored records
        #[arg(long)]
        csv: Option<String>,

        /// Log the full report as pretty JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn apply_overrides(
    config: &mut PipelineConfig,
    source: Option<String>,
    db: Option<String>,
    report: Option<String>,
    csv: Option<String>,
) {
    if let Some(source) = source {
        config.source = source;
    }
    if let Some(db) = db {
        config.store.path = db;
    }
    if report.is_some() {
        config.report_path = report;
    }
    if csv.is_some() {
        config.csv_path = csv;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/streaming_records.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("streaming_records.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };

    match cli.command {
        Commands::Run {
            source,
            db,
            report,
            csv,
            json,
        } => {
            apply_overrides(&mut config, source, db, report, csv);
            config.print_json |= json;
            let report = pipeline::run(&config).await?;
            info!(records = report.record_count, "Run finished");
        }
        Commands::Scrape { source, db } => {
            apply_overrides(&mut config, source, db, None, None);
            let summary = pipeline::scrape(&config).await?;
            info!(inserted = summary.inserted, db = %config.store.path, "Scrape finished");
        }
        Commands::Report {
            db,
            report,
            csv,
            json,
        } => {
            apply_overrides(&mut config, None, db, report, csv);
            config.print_json |= json;
            let report = pipeline::report(&config)?;
            info!(records = report.record_count, "Report finished");
        }
    }

    Ok(())
}
