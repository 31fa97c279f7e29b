use serde::Serialize;
use thiserror::Error;

use crate::normalize::{
    clean_artist, clean_rank, clean_reference, clean_release_date, clean_song,
    clean_stream_count, parse_stream_count,
};

/// Number of cells in a well-formed row of the streaming records table.
pub const RECORD_CELLS: usize = 6;

/// Cell texts of one table row, in page order, before validation.
pub type RawRow = Vec<String>;

#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("row {row} has {cells} cells, expected 6")]
    WrongCellCount { row: usize, cells: usize },
    #[error("row {row}: stream count '{value}' is not a decimal number")]
    InvalidStreamCount { row: usize, value: String },
}

/// One normalized row of the streaming records table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamingRecord {
    pub rank: String,
    pub song: String,
    pub artist: String,
    pub stream_billions: f64,
    pub release_date: String,
    pub reference: String,
}

impl StreamingRecord {
    /// Builds a record from the `row`-th raw row, cleaning every field.
    pub fn from_raw(row: usize, cells: &[String]) -> Result<Self, NormalizeError> {
        let [rank, song, artist, streams, release_date, reference] = cells else {
            return Err(NormalizeError::WrongCellCount {
                row,
                cells: cells.len(),
            });
        };

        let streams = clean_stream_count(streams);
        let stream_billions = parse_stream_count(row, &streams)?;

        Ok(Self {
            rank: clean_rank(rank),
            song: clean_song(song),
            artist: clean_artist(artist),
            stream_billions,
            release_date: clean_release_date(release_date),
            reference: clean_reference(reference),
        })
    }

    /// The rank as a number, if the rank cell holds one.
    pub fn rank_number(&self) -> Option<u32> {
        self.rank.parse().ok()
    }
}
