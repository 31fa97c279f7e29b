use crate::analyzers::types::{ArtistStreams, Distribution, HistogramBin, SongStreams};
use crate::analyzers::utility::{mean, min_max, stddev};
use crate::record::StreamingRecord;
use std::collections::HashMap;

/// The `n` best-ranked songs, best first.
///
/// Records are sorted by numeric rank rather than trusting storage order.
/// Records without a numeric rank go last, keeping their relative order.
pub fn top_songs(records: &[StreamingRecord], n: usize) -> Vec<SongStreams> {
    let mut ranked: Vec<&StreamingRecord> = records.iter().collect();
    ranked.sort_by_key(|r| match r.rank_number() {
        Some(rank) => (0, rank),
        None => (1, 0),
    });

    ranked
        .into_iter()
        .take(n)
        .map(|r| SongStreams {
            rank: r.rank.clone(),
            song: r.song.clone(),
            artist: r.artist.clone(),
            stream_billions: r.stream_billions,
        })
        .collect()
}

/// Equal-width histogram of stream counts over their observed range.
///
/// A single distinct value is spread over `[v - 0.5, v + 0.5]`.
pub fn stream_distribution(records: &[StreamingRecord], bins: usize) -> Distribution {
    let values: Vec<f64> = records.iter().map(|r| r.stream_billions).collect();
    let avg = mean(&values);
    let sd = stddev(&values, avg);

    let range = match min_max(&values) {
        Some(_) if bins == 0 => None,
        Some((lo, hi)) if lo == hi => Some((lo - 0.5, hi + 0.5)),
        other => other,
    };
    let Some((lo, hi)) = range else {
        return Distribution {
            bins: Vec::new(),
            mean: avg,
            stddev: sd,
        };
    };

    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in &values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: lo + i as f64 * width,
            upper: if i + 1 == bins { hi } else { lo + (i + 1) as f64 * width },
            count,
        })
        .collect();

    Distribution {
        bins,
        mean: avg,
        stddev: sd,
    }
}

/// Artists ranked by summed streams, highest first; ties break on name.
pub fn top_artists(records: &[StreamingRecord], n: usize) -> Vec<ArtistStreams> {
    let mut totals: HashMap<&str, (usize, f64)> = HashMap::new();
    for r in records {
        let entry = totals.entry(r.artist.as_str()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += r.stream_billions;
    }

    let mut artists: Vec<ArtistStreams> = totals
        .into_iter()
        .map(|(artist, (songs, stream_billions))| ArtistStreams {
            artist: artist.to_string(),
            songs,
            stream_billions,
        })
        .collect();

    artists.sort_by(|a, b| {
        b.stream_billions
            .total_cmp(&a.stream_billions)
            .then_with(|| a.artist.cmp(&b.artist))
    });
    artists.truncate(n);
    artists
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(rank: &str, song: &str, artist: &str, streams: f64) -> StreamingRecord {
        StreamingRecord {
            rank: rank.to_string(),
            song: song.to_string(),
            artist: artist.to_string(),
            stream_billions: streams,
            release_date: String::new(),
            reference: String::new(),
        }
    }

    #[test]
    fn test_empty_records_give_empty_views() {
        assert!(top_songs(&[], 10).is_empty());
        assert!(top_artists(&[], 10).is_empty());

        let dist = stream_distribution(&[], 20);
        assert!(dist.bins.is_empty());
        assert_eq!(dist.mean, 0.0);
    }

    #[test]
    fn test_top_songs_sorted_by_rank_not_input_order() {
        let records = vec![
            record("3", "C", "x", 3.0),
            record("—", "Unranked", "x", 9.0),
            record("1", "A", "x", 5.0),
            record("10", "J", "x", 1.0),
            record("2", "B", "x", 4.0),
        ];

        let top = top_songs(&records, 4);
        let songs: Vec<_> = top.iter().map(|s| s.song.as_str()).collect();
        assert_eq!(songs, vec!["A", "B", "C", "J"]);

        let all = top_songs(&records, 10);
        assert_eq!(all.len(), 5);
        assert_eq!(all[4].song, "Unranked");
    }

    #[test]
    fn test_distribution_counts_every_value() {
        let records: Vec<_> = [1.0, 1.5, 2.0, 2.5, 3.0, 5.0]
            .iter()
            .enumerate()
            .map(|(i, &v)| record(&(i + 1).to_string(), "s", "a", v))
            .collect();

        let dist = stream_distribution(&records, 4);
        assert_eq!(dist.bins.len(), 4);
        assert_eq!(dist.bins.iter().map(|b| b.count).sum::<usize>(), 6);
        assert_eq!(dist.bins[0].lower, 1.0);
        assert_eq!(dist.bins[3].upper, 5.0);
        // max lands in the closed last bin
        assert_eq!(dist.bins[3].count, 1);
        assert_eq!(dist.mean, 2.5);
    }

    #[test]
    fn test_distribution_single_value() {
        let records = vec![record("1", "s", "a", 4.0), record("2", "t", "b", 4.0)];

        let dist = stream_distribution(&records, 20);
        assert_eq!(dist.bins.len(), 20);
        assert_eq!(dist.bins[0].lower, 3.5);
        assert_eq!(dist.bins[19].upper, 4.5);
        assert_eq!(dist.bins.iter().map(|b| b.count).sum::<usize>(), 2);
        assert_eq!(dist.stddev, 0.0);
    }

    #[test]
    fn test_distribution_zero_bins() {
        let records = vec![record("1", "s", "a", 4.0)];
        let dist = stream_distribution(&records, 0);
        assert!(dist.bins.is_empty());
        assert_eq!(dist.mean, 4.0);
    }

    #[test]
    fn test_top_artists_sums_and_sorts() {
        let records = vec![
            record("1", "a1", "Ed Sheeran", 4.0),
            record("2", "b1", "The Weeknd", 4.5),
            record("3", "a2", "Ed Sheeran", 2.5),
            record("4", "c1", "Dua Lipa", 3.0),
            record("5", "d1", "Billie Eilish", 3.0),
        ];

        let artists = top_artists(&records, 3);
        assert_eq!(artists.len(), 3);
        assert_eq!(artists[0].artist, "Ed Sheeran");
        assert_eq!(artists[0].songs, 2);
        assert_eq!(artists[0].stream_billions, 6.5);
        assert_eq!(artists[1].artist, "The Weeknd");
        // tie on 3.0 broken alphabetically
        assert_eq!(artists[2].artist, "Billie Eilish");
    }
}
