//! SQLite persistence for streaming records.
//!
//! Every write drops and recreates the table; there is no incremental sync.
//! Connections are scoped to a single call and closed on every return path.

use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags, params};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::record::StreamingRecord;

/// Number of rows read back after a write for inspection.
pub const PREVIEW_ROWS: usize = 5;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid table name '{0}': expected letters, digits and underscores")]
    InvalidTableName(String),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// What a write left in the store.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteSummary {
    pub inserted: usize,
    pub preview: Vec<StreamingRecord>,
}

/// Table names are interpolated into DDL, so only plain identifiers are accepted.
fn checked_table(config: &StoreConfig) -> Result<&str> {
    let name = config.table.as_str();
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(name)
    } else {
        Err(StoreError::InvalidTableName(name.to_string()))
    }
}

fn select_sql(table: &str) -> String {
    format!("SELECT rank, song, artist, stream_billions, release_date, reference FROM {table}")
}

/// SQLite keeps `rank` as INTEGER when the text looks numeric, TEXT otherwise.
fn rank_text(value: Value) -> String {
    match value {
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => f.to_string(),
        Value::Text(t) => t,
        Value::Null | Value::Blob(_) => String::new(),
    }
}

fn map_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<StreamingRecord> {
    Ok(StreamingRecord {
        rank: rank_text(row.get(0)?),
        song: row.get(1)?,
        artist: row.get(2)?,
        stream_billions: row.get(3)?,
        release_date: row.get(4)?,
        reference: row.get(5)?,
    })
}

fn query_records(conn: &Connection, sql: &str) -> Result<Vec<StreamingRecord>> {
    let mut stmt = conn.prepare(sql)?;
    let records = stmt
        .query_map([], map_record)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(records)
}

/// Replaces the table with `records` and reads back the count and a short preview.
///
/// Drop, create and inserts commit atomically: any failed write, such as a
/// database locked by another writer, leaves the previous table in place.
#[tracing::instrument(skip(config, records), fields(path = %config.path, table = %config.table, records = records.len()))]
pub fn write_records(config: &StoreConfig, records: &[StreamingRecord]) -> Result<WriteSummary> {
    let table = checked_table(config)?;
    let mut conn = Connection::open(&config.path)?;

    let tx = conn.transaction()?;
    tx.execute_batch(&format!(
        "DROP TABLE IF EXISTS {table};
         CREATE TABLE {table} (
            rank INTEGER,
            song TEXT,
            artist TEXT,
            stream_billions REAL,
            release_date TEXT,
            reference TEXT
         );"
    ))?;
    {
        let mut stmt = tx.prepare_cached(&format!(
            "INSERT INTO {table} (rank, song, artist, stream_billions, release_date, reference)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
        ))?;
        for r in records {
            stmt.execute(params![
                r.rank,
                r.song,
                r.artist,
                r.stream_billions,
                r.release_date,
                r.reference
            ])?;
        }
    }
    tx.commit()?;

    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })?;
    let preview = query_records(&conn, &format!("{} LIMIT {PREVIEW_ROWS}", select_sql(table)))?;

    info!(inserted = count, "Records stored");
    for record in &preview {
        debug!(?record, "Stored row");
    }

    Ok(WriteSummary {
        inserted: count as usize,
        preview,
    })
}

/// Reads every stored record in insertion order.
#[tracing::instrument(skip(config), fields(path = %config.path, table = %config.table))]
pub fn load_records(config: &StoreConfig) -> Result<Vec<StreamingRecord>> {
    let table = checked_table(config)?;
    let conn = Connection::open_with_flags(
        &config.path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;

    let records = query_records(&conn, &select_sql(table))?;
    info!(rows = records.len(), "Records loaded");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_config(name: &str) -> StoreConfig {
        let path = format!("{}/{}", env::temp_dir().display(), name);
        let _ = fs::remove_file(&path);
        StoreConfig {
            path,
            table: "streaming_records".to_string(),
        }
    }

    fn record(rank: &str, song: &str, artist: &str, streams: f64) -> StreamingRecord {
        StreamingRecord {
            rank: rank.to_string(),
            song: song.to_string(),
            artist: artist.to_string(),
            stream_billions: streams,
            release_date: "1 January 2020".to_string(),
            reference: "4".to_string(),
        }
    }

    fn sample(n: usize) -> Vec<StreamingRecord> {
        (1..=n)
            .map(|i| record(&i.to_string(), &format!("Song {i}"), "Artist", 5.0 - i as f64 * 0.1))
            .collect()
    }

    #[test]
    fn test_write_then_load_round_trip() {
        let config = temp_config("streaming_records_test_round_trip.db");
        let records = sample(8);

        let summary = write_records(&config, &records).unwrap();
        assert_eq!(summary.inserted, 8);
        assert_eq!(summary.preview, records[..PREVIEW_ROWS].to_vec());

        let loaded = load_records(&config).unwrap();
        assert_eq!(loaded, records);

        fs::remove_file(&config.path).unwrap();
    }

    #[test]
    fn test_second_write_replaces_first() {
        let config = temp_config("streaming_records_test_reset.db");

        write_records(&config, &sample(7)).unwrap();
        let summary = write_records(&config, &sample(3)).unwrap();
        assert_eq!(summary.inserted, 3);

        let loaded = load_records(&config).unwrap();
        assert_eq!(loaded.len(), 3);

        fs::remove_file(&config.path).unwrap();
    }

    #[test]
    fn test_non_numeric_rank_survives_as_text() {
        let config = temp_config("streaming_records_test_text_rank.db");
        let records = vec![record("—", "Untracked", "Someone", 1.25)];

        write_records(&config, &records).unwrap();
        let loaded = load_records(&config).unwrap();
        assert_eq!(loaded, records);

        fs::remove_file(&config.path).unwrap();
    }

    #[test]
    fn test_empty_write_creates_empty_table() {
        let config = temp_config("streaming_records_test_empty.db");

        let summary = write_records(&config, &[]).unwrap();
        assert_eq!(summary.inserted, 0);
        assert!(summary.preview.is_empty());
        assert!(load_records(&config).unwrap().is_empty());

        fs::remove_file(&config.path).unwrap();
    }

    #[test]
    fn test_failed_write_keeps_previous_table() {
        let config = temp_config("streaming_records_test_locked.db");
        write_records(&config, &sample(4)).unwrap();

        let writer = Connection::open(&config.path).unwrap();
        writer.execute_batch("BEGIN IMMEDIATE;").unwrap();

        // the drop cannot take the write lock and times out as busy
        let result = write_records(&config, &sample(2));
        assert!(matches!(result, Err(StoreError::Sqlite(_))));

        writer.execute_batch("ROLLBACK;").unwrap();
        drop(writer);

        let loaded = load_records(&config).unwrap();
        assert_eq!(loaded, sample(4));

        fs::remove_file(&config.path).unwrap();
    }

    #[test]
    fn test_invalid_table_name_rejected() {
        let mut config = temp_config("streaming_records_test_bad_name.db");
        config.table = "records; DROP TABLE x".to_string();

        let err = write_records(&config, &sample(1)).unwrap_err();
        assert!(matches!(err, StoreError::InvalidTableName(_)));

        config.table = "1records".to_string();
        assert!(matches!(
            load_records(&config).unwrap_err(),
            StoreError::InvalidTableName(_)
        ));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let config = temp_config("streaming_records_test_missing.db");
        let result = load_records(&config);
        assert!(matches!(result, Err(StoreError::Sqlite(_))));
    }
}
