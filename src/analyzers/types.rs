//! Data types produced by the report views.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One bar of the top songs chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongStreams {
    pub rank: String,
    pub song: String,
    pub artist: String,
    pub stream_billions: f64,
}

/// Half-open bin `[lower, upper)`; the last bin of a histogram is closed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Histogram of `stream_billions` with its mean marker.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Distribution {
    pub bins: Vec<HistogramBin>,
    pub mean: f64,
    pub stddev: f64,
}

/// Summed streams for one artist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistStreams {
    pub artist: String,
    pub songs: usize,
    pub stream_billions: f64,
}

/// All three views over the stored records, written out as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub record_count: usize,
    pub top_songs: Vec<SongStreams>,
    pub distribution: Distribution,
    pub top_artists: Vec<ArtistStreams>,
}
