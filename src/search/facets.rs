//! Facet histograms for search results

use chrono::{DateTime, Duration, Utc};

use crate::types::{histogram, FacetBucket, HistoryEvent, SearchFacets};

/// Date facet labels with their inclusive upper age in days, in display order.
/// Anything older falls into `Older`.
pub const DATE_BUCKETS: [(&str, i64); 3] = [
    ("Last Week", 7),
    ("Last Month", 30),
    ("Last 3 Months", 90),
];

const OLDER: &str = "Older";

/// Label of the first bucket whose age limit covers `timestamp`
pub fn date_bucket(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> &'static str {
    let age = now - timestamp;
    DATE_BUCKETS
        .iter()
        .find(|(_, days)| age <= Duration::days(*days))
        .map(|(label, _)| *label)
        .unwrap_or(OLDER)
}

pub fn build_facets(events: &[HistoryEvent], now: DateTime<Utc>) -> SearchFacets {
    let mut date_ranges: Vec<FacetBucket> = DATE_BUCKETS
        .iter()
        .map(|(label, _)| *label)
        .chain(std::iter::once(OLDER))
        .map(|label| FacetBucket {
            label: label.to_string(),
            count: 0,
        })
        .collect();

    for event in events {
        let label = date_bucket(event.timestamp, now);
        if let Some(bucket) = date_ranges.iter_mut().find(|b| b.label == label) {
            bucket.count += 1;
        }
    }

    SearchFacets {
        event_types: histogram(events.iter().map(|e| e.event_type.as_str())),
        sources: histogram(events.iter().map(|e| e.source.kind.as_str())),
        date_ranges,
    }
}
