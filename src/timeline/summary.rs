//! Timeline summary over a filtered, newest-first event set

use chrono::{DateTime, Utc};

use crate::classifier::is_milestone;
use crate::types::{histogram, DateSpan, HistoryEvent, TimelineSummary};

pub const MAX_MILESTONES: usize = 5;
pub const MAX_RECENT: usize = 10;

/// Summarize `events`, which must already be sorted newest first.
/// An empty set collapses the date span to `now`.
pub fn build_summary(events: &[HistoryEvent], now: DateTime<Utc>) -> TimelineSummary {
    let date_range = DateSpan {
        start: events.iter().map(|e| e.timestamp).min().unwrap_or(now),
        end: events.iter().map(|e| e.timestamp).max().unwrap_or(now),
    };

    TimelineSummary {
        total_events: events.len(),
        public_events: events.iter().filter(|e| e.is_public).count(),
        date_range,
        event_types: histogram(events.iter().map(|e| e.event_type)),
        key_milestones: events
            .iter()
            .filter(|e| is_milestone(e.event_type))
            .take(MAX_MILESTONES)
            .cloned()
            .collect(),
        recent_activity: events.iter().take(MAX_RECENT).cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EventSource, EventType, SourceKind};
    use chrono::{Duration, TimeZone};

    fn event(i: i64, event_type: EventType, public: bool) -> HistoryEvent {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        HistoryEvent {
            id: format!("e{}", i),
            property_id: "p".to_string(),
            event_type,
            title: "t".to_string(),
            description: "d".to_string(),
            timestamp: base + Duration::days(i),
            data: Default::default(),
            source: EventSource::new(SourceKind::Agent, "a", "A"),
            metadata: Default::default(),
            is_public: public,
            tags: vec![],
        }
    }

    #[test]
    fn test_empty_set_spans_now() {
        let now = Utc.with_ymd_and_hms(2024, 9, 9, 9, 9, 9).unwrap();
        let summary = build_summary(&[], now);
        assert_eq!(summary.total_events, 0);
        assert_eq!(summary.date_range, DateSpan { start: now, end: now });
        assert!(summary.event_types.is_empty());
    }

    #[test]
    fn test_counts_and_slices() {
        // newest first
        let mut events: Vec<HistoryEvent> = (0..14)
            .map(|i| {
                let t = match i % 3 {
                    0 => EventType::PriceChange,
                    1 => EventType::PhotosAdded,
                    _ => EventType::Listed,
                };
                event(i, t, i % 2 == 0)
            })
            .collect();
        events.reverse();

        let summary = build_summary(&events, Utc::now());
        assert_eq!(summary.total_events, 14);
        assert_eq!(summary.public_events, 7);
        assert_eq!(summary.event_types["price_change"], 5);
        assert_eq!(summary.event_types["photos_added"], 5);
        assert_eq!(summary.event_types["listed"], 4);
        assert_eq!(summary.key_milestones.len(), MAX_MILESTONES);
        assert!(summary.key_milestones.iter().all(|e| e.event_type != EventType::PhotosAdded));
        assert_eq!(summary.key_milestones[0].id, "e12");
        assert_eq!(summary.recent_activity.len(), MAX_RECENT);
        assert_eq!(summary.recent_activity[0].id, "e13");
        assert_eq!(summary.date_range.start, events.last().unwrap().timestamp);
        assert_eq!(summary.date_range.end, events[0].timestamp);
    }
}
