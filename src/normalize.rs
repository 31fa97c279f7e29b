//! Field cleanup for raw table rows.
//!
//! Each `clean_*` function trims first, then strips its characters, so
//! re-applying it is a no-op unless stripped characters enclosed edge
//! whitespace (`" a"` becomes ` a`, then `a`). Only rows with exactly
//! [`RECORD_CELLS`] cells become records; other rows are dropped.

use tracing::{debug, info};

use crate::record::{NormalizeError, RECORD_CELLS, RawRow, StreamingRecord};

pub fn clean_rank(cell: &str) -> String {
    cell.trim().to_string()
}

/// Strips the quotation marks Wikipedia puts around song titles.
pub fn clean_song(cell: &str) -> String {
    cell.trim().replace('"', "")
}

pub fn clean_artist(cell: &str) -> String {
    cell.trim().to_string()
}

/// Removes thousands separators, leaving a plain decimal numeral.
pub fn clean_stream_count(cell: &str) -> String {
    cell.trim().replace(',', "")
}

pub fn clean_release_date(cell: &str) -> String {
    cell.trim().to_string()
}

/// Strips footnote brackets: `[12]` becomes `12`.
pub fn clean_reference(cell: &str) -> String {
    cell.trim().replace(['[', ']'], "")
}

/// Parses a cleaned stream count. Rejects anything that is not a finite decimal.
pub fn parse_stream_count(row: usize, text: &str) -> Result<f64, NormalizeError> {
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(NormalizeError::InvalidStreamCount {
            row,
            value: text.to_string(),
        }),
    }
}

/// Converts raw rows into records, keeping input order.
///
/// # Errors
///
/// Returns the first [`NormalizeError::InvalidStreamCount`] encountered.
#[tracing::instrument(skip(rows), fields(rows = rows.len()))]
pub fn normalize_rows(rows: &[RawRow]) -> Result<Vec<StreamingRecord>, NormalizeError> {
    let mut records = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        if row.len() != RECORD_CELLS {
            debug!(row = index, cells = row.len(), "Skipping row with unexpected cell count");
            continue;
        }
        records.push(StreamingRecord::from_raw(index, row)?);
    }

    info!(
        original = rows.len(),
        cleaned = records.len(),
        "Rows normalized"
    );
    if let (Some(first), Some(last)) = (records.first(), records.last()) {
        debug!(?first, ?last, "First and last cleaned records");
    }

    Ok(records)
}
