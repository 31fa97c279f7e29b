//! Stage wiring: fetch → extract → normalize → store, then load → report.

use anyhow::{Context, Result};
use tracing::info;

use crate::analyzers::report::build_report;
use crate::analyzers::types::Report;
use crate::config::PipelineConfig;
use crate::fetch::load_source;
use crate::normalize::normalize_rows;
use crate::output::{log_summary, print_json, print_pretty, write_json, write_records_csv};
use crate::parser::parse_table;
use crate::store::{WriteSummary, load_records, write_records};

/// Fetches the page and replaces the stored records with its table.
#[tracing::instrument(skip(config), fields(source = %config.source, db = %config.store.path))]
pub async fn scrape(config: &PipelineConfig) -> Result<WriteSummary> {
    let page = load_source(&config.source, &config.user_agent).await?;
    let table = parse_table(&page.body, &config.table)?;
    let records = normalize_rows(&table.rows)?;

    let summary = write_records(&config.store, &records)
        .with_context(|| format!("failed to store records in '{}'", config.store.path))?;

    info!(
        extracted = table.rows.len(),
        stored = summary.inserted,
        "Scrape complete"
    );
    Ok(summary)
}

/// Loads the stored records and derives the report views.
///
/// The JSON report and CSV export are written when their paths are configured.
#[tracing::instrument(skip(config), fields(db = %config.store.path))]
pub fn report(config: &PipelineConfig) -> Result<Report> {
    let records = load_records(&config.store)
        .with_context(|| format!("failed to load records from '{}'", config.store.path))?;

    let report = build_report(&config.store.path, &records, &config.report);
    print_pretty(&report);
    log_summary(&report);
    if config.print_json {
        print_json(&report)?;
    }

    if let Some(path) = &config.report_path {
        write_json(path, &report)?;
        info!(path = %path, "Report written");
    }
    if let Some(path) = &config.csv_path {
        write_records_csv(path, &records)?;
        info!(path = %path, rows = records.len(), "Records exported");
    }

    Ok(report)
}

/// Runs the full pipeline.
pub async fn run(config: &PipelineConfig) -> Result<Report> {
    scrape(config).await?;
    report(config)
}
