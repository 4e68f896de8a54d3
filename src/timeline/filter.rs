//! Conjunctive event filters and ordering

use crate::types::{HistoryEvent, TimelineFilters};

/// True when `event` satisfies every constraint present in `filters`.
/// Missing or empty lists impose nothing.
pub fn matches_filters(event: &HistoryEvent, filters: &TimelineFilters) -> bool {
    if let Some(types) = filters.event_types.as_deref().filter(|t| !t.is_empty()) {
        if !types.contains(&event.event_type) {
            return false;
        }
    }

    if let Some(range) = &filters.date_range {
        if !range.contains(&event.timestamp) {
            return false;
        }
    }

    if let Some(sources) = filters.sources.as_deref().filter(|s| !s.is_empty()) {
        if !sources.contains(&event.source.kind) {
            return false;
        }
    }

    if let Some(tags) = filters.tags.as_deref().filter(|t| !t.is_empty()) {
        if !event.has_any_tag(tags) {
            return false;
        }
    }

    if let Some(is_public) = filters.is_public {
        if event.is_public != is_public {
            return false;
        }
    }

    true
}

/// Newest first; equal timestamps keep their incoming order
pub fn sort_newest_first(events: &mut [HistoryEvent]) {
    events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}
