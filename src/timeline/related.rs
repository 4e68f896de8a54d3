//! Related-event linking
//!
//! Two events are related when they share a type or fall within a day of
//! each other. The scan is O(n) per event, O(n²) for a page over the full
//! filtered set; a per-type / per-day index is the next step if per-property
//! volumes grow large.

use chrono::Duration;

use crate::types::HistoryEvent;

/// Maximum number of related ids attached to one event
pub const MAX_RELATED: usize = 5;

pub fn related_window() -> Duration {
    Duration::days(1)
}

/// Ids of up to `MAX_RELATED` events in `pool` related to `target`, in pool order
pub fn related_events(target: &HistoryEvent, pool: &[HistoryEvent]) -> Vec<String> {
    let window = related_window();
    pool.iter()
        .filter(|other| other.id != target.id)
        .filter(|other| {
            let delta = other.timestamp - target.timestamp;
            other.event_type == target.event_type || (delta <= window && delta >= -window)
        })
        .take(MAX_RELATED)
        .map(|other| other.id.clone())
        .collect()
}
