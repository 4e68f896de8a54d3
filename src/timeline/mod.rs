//! Timeline builder
//!
//! Turns a property's raw events into one presentation page:
//! filter → sort newest-first → paginate → decorate, with a summary computed
//! over the whole filtered set rather than the page.

mod filter;
mod page;
mod related;
mod summary;

use chrono::{DateTime, Utc};

use crate::classifier::{category_of, importance_of};
use crate::types::{HistoryEvent, PropertyTimeline, TimelineEvent, TimelineFilters};

pub use filter::{matches_filters, sort_newest_first};
pub use page::{PageRequest, PageWindow};
pub use related::{related_events, MAX_RELATED};
pub use summary::{build_summary, MAX_MILESTONES, MAX_RECENT};

/// Build a timeline page for `property_id` from `events`.
///
/// Events belonging to other properties are ignored, so an unknown property
/// yields an empty timeline rather than an error.
pub fn build_timeline(
    property_id: &str,
    events: Vec<HistoryEvent>,
    filters: &TimelineFilters,
    page: PageRequest,
    now: DateTime<Utc>,
) -> PropertyTimeline {
    let mut filtered: Vec<HistoryEvent> = events
        .into_iter()
        .filter(|e| e.property_id == property_id && matches_filters(e, filters))
        .collect();
    sort_newest_first(&mut filtered);

    let (range, pagination) = page.apply(filtered.len());
    let first_order = page.first_display_order();

    let page_events: Vec<TimelineEvent> = filtered[range]
        .iter()
        .enumerate()
        .map(|(index, event)| TimelineEvent {
            display_order: first_order + index,
            category: category_of(event.event_type),
            importance: importance_of(event.event_type),
            related_events: related_events(event, &filtered),
            event: event.clone(),
        })
        .collect();

    PropertyTimeline {
        property_id: property_id.to_string(),
        events: page_events,
        summary: build_summary(&filtered, now),
        filters: filters.clone(),
        pagination,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EventCategory, EventImportance, EventSource, EventType, SourceKind};
    use chrono::{Duration, TimeZone};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
    }

    fn event(id: &str, property_id: &str, event_type: EventType, days: i64) -> HistoryEvent {
        HistoryEvent {
            id: id.to_string(),
            property_id: property_id.to_string(),
            event_type,
            title: id.to_string(),
            description: "d".to_string(),
            timestamp: base() + Duration::days(days),
            data: Default::default(),
            source: EventSource::new(SourceKind::Agent, "a", "A"),
            metadata: Default::default(),
            is_public: true,
            tags: vec![],
        }
    }

    fn sample() -> Vec<HistoryEvent> {
        vec![
            event("listed", "p1", EventType::Listed, 0),
            event("photos", "p1", EventType::PhotosAdded, 1),
            event("price", "p1", EventType::PriceChange, 10),
            event("viewing", "p1", EventType::ViewingScheduled, 20),
            event("sold", "p1", EventType::Sold, 40),
            event("elsewhere", "p2", EventType::Listed, 5),
        ]
    }

    #[test]
    fn test_first_page_is_decorated() {
        let timeline = build_timeline("p1", sample(), &TimelineFilters::default(), PageRequest::window(1, 2), base());

        assert_eq!(timeline.pagination.total, 5);
        assert!(timeline.pagination.has_more);
        assert_eq!(timeline.events.len(), 2);

        let first = &timeline.events[0];
        assert_eq!(first.event.id, "sold");
        assert_eq!(first.display_order, 1);
        assert_eq!(first.category, EventCategory::Status);
        assert_eq!(first.importance, EventImportance::Critical);
        assert_eq!(timeline.events[1].display_order, 2);
    }

    #[test]
    fn test_display_order_continues_across_pages() {
        let timeline = build_timeline("p1", sample(), &TimelineFilters::default(), PageRequest::window(2, 2), base());
        let orders: Vec<usize> = timeline.events.iter().map(|e| e.display_order).collect();
        assert_eq!(orders, vec![3, 4]);
        assert_eq!(timeline.events[0].event.id, "price");
    }

    #[test]
    fn test_related_uses_full_filtered_set() {
        let timeline = build_timeline("p1", sample(), &TimelineFilters::default(), PageRequest::window(3, 2), base());
        // Last page holds only "listed"; "photos" is within a day of it
        assert_eq!(timeline.events.len(), 1);
        assert_eq!(timeline.events[0].related_events, vec!["photos"]);
    }

    #[test]
    fn test_summary_ignores_pagination() {
        let timeline = build_timeline("p1", sample(), &TimelineFilters::default(), PageRequest::window(1, 1), base());
        assert_eq!(timeline.summary.total_events, 5);
        assert_eq!(timeline.summary.key_milestones.len(), 3);
        assert_eq!(timeline.summary.date_range.start, base());
        assert_eq!(timeline.summary.date_range.end, base() + Duration::days(40));
    }

    #[test]
    fn test_unknown_property_is_empty() {
        let now = base() + Duration::days(100);
        let timeline = build_timeline("nope", sample(), &TimelineFilters::default(), PageRequest::window(1, 10), now);
        assert!(timeline.events.is_empty());
        assert_eq!(timeline.pagination.total, 0);
        assert!(!timeline.pagination.has_more);
        assert_eq!(timeline.summary.date_range.start, now);
    }

    #[test]
    fn test_filters_echoed_back() {
        let filters = TimelineFilters::default().with_event_types(vec![EventType::PriceChange]);
        let timeline = build_timeline("p1", sample(), &filters, PageRequest::All, base());
        assert_eq!(timeline.events.len(), 1);
        assert_eq!(timeline.filters, filters);
        assert_eq!(timeline.summary.event_types.get("price_change"), Some(&1));
    }

    #[test]
    fn test_page_far_past_end_is_empty() {
        let timeline = build_timeline(
            "p1",
            sample(),
            &TimelineFilters::default(),
            PageRequest::window(usize::MAX / 2, 100),
            base(),
        );
        assert!(timeline.events.is_empty());
        assert_eq!(timeline.pagination.total, 5);
        assert!(!timeline.pagination.has_more);
        assert_eq!(timeline.summary.total_events, 5);
    }
}
