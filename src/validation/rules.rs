//! Field rules for create and update requests

use crate::types::{CreateEventRequest, EventData, EventPatch, FieldError};

/// Upper bound of `metadata.confidence`
pub const MAX_CONFIDENCE: u8 = 100;

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Check a create request. An empty result means the request is admissible.
///
/// Order: `propertyId`, `title`, `description`, `source`, then metadata and
/// payload shape.
pub fn validate_create(request: &CreateEventRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if is_blank(&request.property_id) {
        errors.push(FieldError::new("propertyId", "Property ID is required"));
    }
    if is_blank(&request.title) {
        errors.push(FieldError::new("title", "Title is required"));
    }
    if is_blank(&request.description) {
        errors.push(FieldError::new("description", "Description is required"));
    }

    match &request.source {
        None => errors.push(FieldError::new("source", "Source is required")),
        Some(source) => {
            if is_blank(&source.id) {
                errors.push(FieldError::new("source.id", "Source ID is required"));
            }
            if is_blank(&source.name) {
                errors.push(FieldError::new("source.name", "Source name is required"));
            }
        }
    }

    if let Some(metadata) = &request.metadata {
        if metadata.confidence > MAX_CONFIDENCE {
            errors.push(FieldError::new(
                "metadata.confidence",
                format!("Confidence must be between 0 and {}", MAX_CONFIDENCE),
            ));
        }
    }

    let expected = request.event_type.payload_kind();
    let actual = request.data.kind();
    if !matches!(request.data, EventData::Custom(_)) && actual != expected {
        errors.push(FieldError::new(
            "data",
            format!(
                "A '{}' event carries a '{}' payload, not '{}'",
                request.event_type, expected, actual
            ),
        ));
    }

    errors
}

/// Check an update patch before it is applied
pub fn validate_patch(patch: &EventPatch) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if patch.is_empty() {
        errors.push(FieldError::new("patch", "No updatable fields supplied"));
        return errors;
    }
    if patch.title.as_deref().is_some_and(is_blank) {
        errors.push(FieldError::new("title", "Title cannot be empty"));
    }
    if patch.description.as_deref().is_some_and(is_blank) {
        errors.push(FieldError::new("description", "Description cannot be empty"));
    }

    errors
}
