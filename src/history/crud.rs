//! Write operations for the history service

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::HistoryError;
use crate::types::{
    normalize_tags, CreateEventRequest, EventPatch, HistoryEvent, ServiceResponse,
};
use crate::validation::{validate_create, validate_patch};

use super::HistoryService;

const VALIDATION_FAILED: &str = "Validation failed";
const EVENT_NOT_FOUND: &str = "Event not found";

/// Fresh event id: `evt_` followed by a simple-form v4 UUID
pub fn new_event_id() -> String {
    format!("evt_{}", Uuid::new_v4().simple())
}

/// Turn a failed operation into a response, logging faults the caller
/// should not see
pub(crate) fn failure_response<T>(err: HistoryError, operation: &str) -> ServiceResponse<T> {
    let message = err.public_message(operation);
    if err.is_internal() {
        error!(operation, error = %err, "history operation failed");
        return ServiceResponse::failure(message);
    }
    warn!(operation, error = %err, "history request refused");
    ServiceResponse::rejected(message, err.field_errors())
}

pub fn create_event(svc: &HistoryService, request: CreateEventRequest) -> ServiceResponse<HistoryEvent> {
    let errors = validate_create(&request);
    if !errors.is_empty() {
        warn!(
            property_id = %request.property_id,
            fields = ?errors.iter().map(|e| e.field.as_str()).collect::<Vec<_>>(),
            "rejected event creation"
        );
        return ServiceResponse::rejected(VALIDATION_FAILED, errors);
    }

    let event = HistoryEvent {
        id: new_event_id(),
        property_id: request.property_id.trim().to_string(),
        event_type: request.event_type,
        title: request.title.trim().to_string(),
        description: request.description.trim().to_string(),
        timestamp: svc.next_timestamp(),
        data: request.data,
        source: request.source.unwrap_or_default(),
        metadata: request.metadata.unwrap_or_default(),
        is_public: request.is_public,
        tags: normalize_tags(request.tags),
    };

    {
        let _write = svc.history_cache.begin_write(&event.property_id);
        if let Err(e) = svc.store.append(event.clone()) {
            return failure_response(e.into(), "creating event");
        }
    }

    info!(
        id = %event.id,
        property_id = %event.property_id,
        event_type = %event.event_type,
        "event created"
    );
    ServiceResponse::ok_with_message(event, "Event created")
}

pub fn get_event(svc: &HistoryService, id: &str) -> ServiceResponse<HistoryEvent> {
    debug!(id, "fetching event");
    match svc.store.get_by_id(id) {
        Ok(Some(event)) => ServiceResponse::ok(event),
        Ok(None) => ServiceResponse::not_found(EVENT_NOT_FOUND),
        Err(e) => failure_response(e.into(), "fetching event"),
    }
}

pub fn update_event(svc: &HistoryService, id: &str, patch: EventPatch) -> ServiceResponse<HistoryEvent> {
    let errors = validate_patch(&patch);
    if !errors.is_empty() {
        warn!(id, "rejected event update");
        return ServiceResponse::rejected(VALIDATION_FAILED, errors);
    }

    let property_id = match svc.store.get_by_id(id) {
        Ok(Some(current)) => current.property_id,
        Ok(None) => return ServiceResponse::not_found(EVENT_NOT_FOUND),
        Err(e) => return failure_response(e.into(), "updating event"),
    };

    let _write = svc.history_cache.begin_write(&property_id);
    match svc.store.update(id, &patch) {
        Ok(Some(updated)) => {
            info!(id, property_id = %updated.property_id, "event updated");
            ServiceResponse::ok_with_message(updated, "Event updated")
        }
        Ok(None) => ServiceResponse::not_found(EVENT_NOT_FOUND),
        Err(e) => failure_response(e.into(), "updating event"),
    }
}

pub fn delete_event(svc: &HistoryService, id: &str) -> ServiceResponse<HistoryEvent> {
    // Property ids never change, so the owner can be read before the write
    let property_id = match svc.store.get_by_id(id) {
        Ok(Some(current)) => current.property_id,
        Ok(None) => return ServiceResponse::not_found(EVENT_NOT_FOUND),
        Err(e) => return failure_response(e.into(), "deleting event"),
    };

    let _write = svc.history_cache.begin_write(&property_id);
    match svc.store.delete_by_id(id) {
        Ok(Some(removed)) => {
            info!(id, property_id = %removed.property_id, "event deleted");
            ServiceResponse::ok_with_message(removed, "Event deleted")
        }
        Ok(None) => ServiceResponse::not_found(EVENT_NOT_FOUND),
        Err(e) => failure_response(e.into(), "deleting event"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EventData, EventSource, EventType, Outcome, PriceChange, SourceKind, StatusChange};
    use serde_json::json;

    fn request(property_id: &str, event_type: EventType) -> CreateEventRequest {
        CreateEventRequest::new(
            property_id,
            event_type,
            "Price updated",
            "Seller adjusted price",
            EventSource::new(SourceKind::Agent, "agent-7", "Sam Agent"),
        )
    }

    #[test]
    fn test_create_assigns_id_and_normalizes() {
        let service = HistoryService::in_memory();
        let response = service.create_event(
            request(" p1 ", EventType::PriceChange)
                .with_tags(["price", " price", "", "q2"]),
        );

        assert!(response.success);
        let event = response.data.unwrap();
        assert!(event.id.starts_with("evt_"));
        assert_eq!(event.id.len(), 4 + 32);
        assert_eq!(event.property_id, "p1");
        assert_eq!(event.tags, vec!["price", "q2"]);
        assert_eq!(event.metadata.confidence, 100);
    }

    #[test]
    fn test_create_reports_every_missing_field() {
        let service = HistoryService::in_memory();
        let mut bad = request("", EventType::Listed);
        bad.title = "  ".to_string();
        bad.description = String::new();
        bad.source = None;

        let response = service.create_event(bad);
        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("Validation failed"));
        assert_eq!(response.error_fields(), vec!["propertyId", "title", "description", "source"]);
        assert!(service.store().all_events().unwrap().is_empty());
    }

    #[test]
    fn test_mismatched_payload_rejected() {
        let service = HistoryService::in_memory();
        let response = service.create_event(request("p1", EventType::PriceChange).with_data(
            EventData::Status(StatusChange {
                old_status: None,
                new_status: "pending".to_string(),
                reason: None,
            }),
        ));
        assert_eq!(response.error_fields(), vec!["data"]);
    }

    #[test]
    fn test_update_merges_payload_and_keeps_timestamp() {
        let service = HistoryService::in_memory();
        let created = service
            .create_event(request("p1", EventType::PriceChange).with_data(EventData::Price(PriceChange {
                old_price: Some(500_000.0),
                new_price: 480_000.0,
                currency: Some("USD".to_string()),
                reason: None,
            })))
            .data
            .unwrap();

        let patch = EventPatch {
            data: Some(json!({"price": {"newPrice": 470000.0}})),
            ..Default::default()
        };
        let updated = service.update_event(&created.id, patch).data.unwrap();
        assert_eq!(updated.timestamp, created.timestamp);
        match updated.data {
            EventData::Price(price) => {
                assert_eq!(price.new_price, 470_000.0);
                assert_eq!(price.old_price, Some(500_000.0));
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_update_and_delete_unknown_id() {
        let service = HistoryService::in_memory();
        let patch = EventPatch {
            title: Some("x".to_string()),
            ..Default::default()
        };
        let response = service.update_event("evt_missing", patch);
        assert!(!response.success);
        assert_eq!(response.outcome, Outcome::NotFound);
        assert_eq!(response.message.as_deref(), Some("Event not found"));

        let response = service.delete_event("evt_missing");
        assert!(!response.success);
        assert!(response.data.is_none());
    }

    #[test]
    fn test_empty_patch_rejected() {
        let service = HistoryService::in_memory();
        let created = service.create_event(request("p1", EventType::Listed)).data.unwrap();
        let response = service.update_event(&created.id, EventPatch::default());
        assert_eq!(response.error_fields(), vec!["patch"]);
    }

    #[test]
    fn test_bad_patch_payload_is_validation_failure() {
        let service = HistoryService::in_memory();
        let created = service.create_event(request("p1", EventType::Listed)).data.unwrap();
        let patch = EventPatch {
            data: Some(json!({"price": {"newPrice": 1.0}})),
            ..Default::default()
        };
        let response = service.update_event(&created.id, patch);
        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("Validation failed"));
        assert_eq!(response.error_fields(), vec!["data"]);
    }

    #[test]
    fn test_delete_returns_removed_event() {
        let service = HistoryService::in_memory();
        let created = service.create_event(request("p1", EventType::Listed)).data.unwrap();

        let response = service.delete_event(&created.id);
        assert!(response.success);
        assert_eq!(response.data.unwrap().id, created.id);
        assert!(!service.get_event(&created.id).success);
    }
}
