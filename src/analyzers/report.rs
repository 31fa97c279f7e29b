use crate::analyzers::types::Report;
use crate::analyzers::views::{stream_distribution, top_artists, top_songs};
use crate::config::ReportConfig;
use crate::record::StreamingRecord;
use chrono::Utc;

/// Builds the three report views over `records`, as loaded from the store.
pub fn build_report(source: &str, records: &[StreamingRecord], config: &ReportConfig) -> Report {
    Report {
        generated_at: Utc::now(),
        source: source.to_string(),
        record_count: records.len(),
        top_songs: top_songs(records, config.top_n),
        distribution: stream_distribution(records, config.histogram_bins),
        top_artists: top_artists(records, config.top_n),
    }
}
