//! Output formatting and persistence for reports and records.
//!
//! Supports pretty-printing, JSON files, structured log summaries and CSV export.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::types::Report;
use crate::record::StreamingRecord;
use csv::WriterBuilder;
use std::fs::{self, File};
use std::path::Path;

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &Report) {
    debug!("{:#?}", report);
}

/// Logs a report as pretty-printed JSON.
pub fn print_json(report: &Report) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn ensure_parent(path: &str) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Serializes a value to pretty JSON and writes it to `path`, replacing any previous file.
pub fn write_json(path: &str, value: &impl Serialize) -> Result<()> {
    ensure_parent(path)?;
    let body = serde_json::to_vec_pretty(value)?;
    fs::write(path, body)?;
    debug!(path, "JSON written");
    Ok(())
}

/// Writes all records to a CSV file with a header row, replacing any previous file.
pub fn write_records_csv(path: &str, records: &[StreamingRecord]) -> Result<()> {
    ensure_parent(path)?;
    let file = File::create(path)?;

    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    debug!(path, rows = records.len(), "CSV written");
    Ok(())
}

/// Emits one structured log line per chart entry.
pub fn log_summary(report: &Report) {
    info!(
        records = report.record_count,
        source = %report.source,
        "Report summary"
    );

    for song in &report.top_songs {
        info!(
            rank = %song.rank,
            song = %song.song,
            artist = %song.artist,
            streams_billions = song.stream_billions,
            "Top song"
        );
    }

    for bin in &report.distribution.bins {
        debug!(lower = bin.lower, upper = bin.upper, count = bin.count, "Histogram bin");
    }
    info!(
        mean = %format!("{:.2}", report.distribution.mean),
        stddev = %format!("{:.2}", report.distribution.stddev),
        bins = report.distribution.bins.len(),
        "Stream distribution"
    );

    for artist in &report.top_artists {
        info!(
            artist = %artist.artist,
            songs = artist.songs,
            total_streams_billions = artist.stream_billions,
            "Top artist"
        );
    }
}
