//! Read operations for the history service
//!
//! Each operation takes a snapshot of the relevant events from the store and
//! computes its view without holding any lock. Store faults are returned to
//! the caller, never reported as an empty result.

use std::sync::Arc;

use tracing::{debug, error};

use crate::analytics::analyze;
use crate::error::{HistoryError, HistoryResult, StoreResult};
use crate::export::{export, ExportFormat, ExportOptions, ExportedTimeline};
use crate::search::search;
use crate::timeline::{build_timeline, sort_newest_first, PageRequest};
use crate::types::{
    FieldError, HistoryAnalytics, HistoryEvent, PropertyHistory, PropertyTimeline, SearchQuery,
    SearchResults, ServiceResponse, TimelineRequest,
};

use super::crud::failure_response;
use super::HistoryService;

fn compute_history(svc: &HistoryService, property_id: &str) -> StoreResult<Option<PropertyHistory>> {
    let mut events = svc.store.get_by_property(property_id)?;
    if events.is_empty() {
        return Ok(None);
    }
    sort_newest_first(&mut events);
    let last_event_date = events[0].timestamp;

    Ok(Some(PropertyHistory {
        property_id: property_id.to_string(),
        total_events: events.len(),
        last_event_date,
        events,
    }))
}

/// Cached newest-first history; `None` when the property has no events
pub fn get_property_history(
    svc: &HistoryService,
    property_id: &str,
) -> HistoryResult<Option<Arc<PropertyHistory>>> {
    svc.history_cache
        .get_or_compute(property_id, || {
            debug!(property_id, "computing property history");
            compute_history(svc, property_id)
        })
        .map_err(|e| {
            error!(property_id, error = %e, "failed to load property history");
            HistoryError::from(e)
        })
}

pub fn get_property_timeline(
    svc: &HistoryService,
    request: TimelineRequest,
) -> ServiceResponse<PropertyTimeline> {
    if request.property_id.trim().is_empty() {
        return ServiceResponse::rejected(
            "Validation failed",
            vec![FieldError::new("propertyId", "Property ID is required")],
        );
    }

    let events = match svc.store.get_by_property(&request.property_id) {
        Ok(events) => events,
        Err(e) => return failure_response(e.into(), "building timeline"),
    };
    let page = PageRequest::from_options(
        request.page,
        request.limit,
        svc.config.page_size,
        svc.config.max_page_size,
    );
    debug!(property_id = %request.property_id, events = events.len(), ?page, "building timeline");

    let timeline = build_timeline(&request.property_id, events, &request.filters, page, svc.now());
    ServiceResponse::ok(timeline)
}

fn search_pool(svc: &HistoryService, query: &SearchQuery) -> StoreResult<Vec<HistoryEvent>> {
    match query.property_id.as_deref().map(str::trim) {
        Some(property_id) if !property_id.is_empty() => svc.store.get_by_property(property_id),
        _ => svc.store.all_events(),
    }
}

pub fn search_events(
    svc: &HistoryService,
    query: &SearchQuery,
    page: Option<usize>,
    limit: Option<usize>,
) -> HistoryResult<SearchResults> {
    let page = PageRequest::from_options(page, limit, svc.config.page_size, svc.config.max_page_size);
    let events = search_pool(svc, query).map_err(|e| {
        error!(error = %e, "search could not read events");
        HistoryError::from(e)
    })?;
    debug!(candidates = events.len(), "searching events");
    Ok(search(events, query, page, svc.now()))
}

pub fn get_history_analytics(
    svc: &HistoryService,
    property_id: &str,
) -> HistoryResult<Option<HistoryAnalytics>> {
    let events = svc.store.get_by_property(property_id).map_err(|e| {
        error!(property_id, error = %e, "analytics could not read events");
        HistoryError::from(e)
    })?;
    Ok(analyze(property_id, &events, svc.benchmarks.as_ref(), svc.now()))
}

pub fn export_timeline(
    svc: &HistoryService,
    property_id: &str,
    options: &ExportOptions,
) -> HistoryResult<ExportedTimeline> {
    let format = ExportFormat::parse(&options.format)?;

    let events = svc.store.get_by_property(property_id).map_err(|e| {
        error!(property_id, error = %e, "export could not read events");
        HistoryError::from(e)
    })?;
    let timeline = build_timeline(property_id, events, &options.filters, PageRequest::All, svc.now());
    debug!(property_id, %format, events = timeline.events.len(), "exporting timeline");
    export(&timeline, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use crate::event_store::store::tests::FailingStore;
    use crate::event_store::InMemoryEventStore;
    use crate::types::{CreateEventRequest, EventPatch, EventSource, EventType, SourceKind, TimelineFilters};
    use crate::utils::ManualClock;
    use chrono::{Duration, TimeZone, Utc};

    fn service() -> (HistoryService, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()));
        let service = HistoryService::in_memory().with_clock(clock.clone());
        (service, clock)
    }

    fn create(service: &HistoryService, property_id: &str, event_type: EventType, title: &str) -> HistoryEvent {
        service
            .create_event(CreateEventRequest::new(
                property_id,
                event_type,
                title,
                "details",
                EventSource::new(SourceKind::Agent, "a1", "Agent One"),
            ))
            .data
            .unwrap()
    }

    #[test]
    fn test_history_is_cached_and_refreshed() {
        let (service, clock) = service();
        assert!(service.get_property_history("p1").unwrap().is_none());

        let first = create(&service, "p1", EventType::Listed, "Listed");
        clock.advance(Duration::days(1));
        let second = create(&service, "p1", EventType::PriceChange, "Price");

        let history = service.get_property_history("p1").unwrap().unwrap();
        assert_eq!(history.total_events, 2);
        assert_eq!(history.events[0].id, second.id);
        assert_eq!(history.last_event_date, second.timestamp);
        assert!(Arc::ptr_eq(&history, &service.get_property_history("p1").unwrap().unwrap()));

        service.update_event(
            &first.id,
            EventPatch {
                title: Some("Listed today".to_string()),
                ..Default::default()
            },
        );
        let history = service.get_property_history("p1").unwrap().unwrap();
        assert_eq!(history.events[1].title, "Listed today");

        service.delete_event(&first.id);
        service.delete_event(&second.id);
        assert!(service.get_property_history("p1").unwrap().is_none());
    }

    #[test]
    fn test_timeline_clamps_limit_to_max() {
        let store = Arc::new(InMemoryEventStore::new());
        let config = ServiceConfig {
            max_page_size: 3,
            ..ServiceConfig::default()
        };
        let service = HistoryService::new(store, config);
        for i in 0..5 {
            create(&service, "p1", EventType::Custom, &format!("note {}", i));
        }

        let timeline = service
            .get_property_timeline(TimelineRequest::new("p1").page(1, 50))
            .data
            .unwrap();
        assert_eq!(timeline.pagination.limit, 3);
        assert_eq!(timeline.events.len(), 3);
        assert!(timeline.pagination.has_more);
    }

    #[test]
    fn test_timeline_requires_property_id() {
        let (service, _) = service();
        let response = service.get_property_timeline(TimelineRequest::new(" "));
        assert_eq!(response.error_fields(), vec!["propertyId"]);
    }

    #[test]
    fn test_search_scoped_to_property() {
        let (service, _) = service();
        create(&service, "p1", EventType::Listed, "Listed p1");
        create(&service, "p2", EventType::Listed, "Listed p2");

        let all = service.search_events(&SearchQuery::default(), None, None).unwrap();
        assert_eq!(all.total, 2);
        assert_eq!(all.limit, 20);

        let scoped = service.search_events(
            &SearchQuery {
                property_id: Some("p2".to_string()),
                ..Default::default()
            },
            None,
            None,
        )
        .unwrap();
        assert_eq!(scoped.total, 1);
        assert_eq!(scoped.events[0].property_id, "p2");
    }

    #[test]
    fn test_export_rejects_format_before_reading() {
        let (service, _) = service();
        let err = service
            .export_timeline("p1", &ExportOptions::new("docx"))
            .unwrap_err();
        assert!(matches!(err, HistoryError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_export_applies_filters_without_pagination() {
        let (service, clock) = service();
        for i in 0..30 {
            clock.advance(Duration::minutes(1));
            let event_type = if i % 2 == 0 { EventType::ViewingScheduled } else { EventType::OpenHouse };
            create(&service, "p1", event_type, "Visit");
        }

        let options = ExportOptions::new("json")
            .with_filters(TimelineFilters::default().with_event_types(vec![EventType::OpenHouse]));
        let exported = service.export_timeline("p1", &options).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&exported.bytes).unwrap();
        assert_eq!(value["events"].as_array().unwrap().len(), 15);
        assert_eq!(value["pagination"]["total"], 15);
    }

    #[test]
    fn test_analytics_absent_without_events() {
        let (service, _) = service();
        assert!(service.get_history_analytics("p1").unwrap().is_none());
        create(&service, "p1", EventType::Listed, "Listed");
        let analytics = service.get_history_analytics("p1").unwrap().unwrap();
        assert_eq!(analytics.key_metrics.total_events, 1);
        assert_eq!(analytics.key_metrics.days_on_market, 0);
    }

    #[test]
    fn test_store_faults_are_not_empty_results() {
        let service = HistoryService::new(Arc::new(FailingStore), ServiceConfig::default());

        let err = service.get_property_history("p1").unwrap_err();
        assert!(err.is_internal());
        let err = service
            .search_events(&SearchQuery::default(), None, None)
            .unwrap_err();
        assert!(err.is_internal());
        let err = service.get_history_analytics("p1").unwrap_err();
        assert!(err.is_internal());

        let response = service.get_property_timeline(TimelineRequest::new("p1"));
        assert_eq!(response.outcome, crate::types::Outcome::Failed);
        assert_eq!(response.message.as_deref(), Some("Internal error while building timeline"));
    }
}
