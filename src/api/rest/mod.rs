//! REST API module for HTTP endpoints
//!
//! - `POST /api/events`, `GET|PATCH|DELETE /api/events/:id` - event CRUD
//! - `POST /api/events/search` - cross-property search
//! - `GET /api/properties/:id/{history,timeline,analytics,export}` - per-property views

pub mod events;
pub mod properties;
pub mod search;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HistoryError;
use crate::types::{
    DateRange, EventType, FieldError, Outcome, ServiceResponse, SourceKind, TimelineFilters,
};

/// Standard API response wrapper for plain reads
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    /// Total count (for paginated responses)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data, total: None }
    }

    pub fn with_total(data: T, total: usize) -> Self {
        Self {
            data,
            total: Some(total),
        }
    }
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl ApiError {
    fn with_code(message: impl Into<String>, code: &str) -> Self {
        Self {
            error: message.into(),
            code: code.to_string(),
            errors: Vec::new(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_code(message, "NOT_FOUND")
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_code(message, "BAD_REQUEST")
    }

    pub fn invalid_fields(errors: Vec<FieldError>) -> Self {
        Self {
            errors,
            ..Self::with_code("Validation failed", "VALIDATION_FAILED")
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_code(message, "INTERNAL_ERROR")
    }
}

/// Send a service envelope with the status code its outcome calls for
pub fn respond<T: Serialize>(response: ServiceResponse<T>, success: StatusCode) -> Response {
    let status = match response.outcome {
        Outcome::Success => success,
        Outcome::Rejected => StatusCode::BAD_REQUEST,
        Outcome::NotFound => StatusCode::NOT_FOUND,
        Outcome::Failed => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(response)).into_response()
}

/// 500 carrying the generic message for a store or internal fault
pub fn fault(err: &HistoryError, operation: &str) -> Response {
    let error = ApiError::internal(err.public_message(operation));
    (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
}

/// Query parameters shared by the timeline and export endpoints.
/// List values are comma separated; `start`/`end` are RFC 3339.
#[derive(Debug, Default, Deserialize)]
pub struct TimelineParams {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub types: Option<String>,
    pub sources: Option<String>,
    pub tags: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub public: Option<bool>,
    /// Export only
    pub format: Option<String>,
}

fn split_list(raw: &str) -> Vec<&str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty()).collect()
}

fn parse_list<T, F>(raw: Option<&str>, field: &str, parse: F, errors: &mut Vec<FieldError>) -> Option<Vec<T>>
where
    F: Fn(&str) -> Result<T, String>,
{
    let raw = raw?;
    let mut values = Vec::new();
    for item in split_list(raw) {
        match parse(item) {
            Ok(value) => values.push(value),
            Err(message) => errors.push(FieldError::new(field, message)),
        }
    }
    Some(values)
}

fn parse_instant(raw: Option<&str>, field: &str, errors: &mut Vec<FieldError>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(e) => {
            errors.push(FieldError::new(field, format!("expected an RFC 3339 timestamp: {}", e)));
            None
        }
    }
}

impl TimelineParams {
    /// Build timeline filters, collecting every malformed parameter
    pub fn filters(&self) -> Result<TimelineFilters, Vec<FieldError>> {
        let mut errors = Vec::new();

        let event_types = parse_list(self.types.as_deref(), "types", |s| s.parse::<EventType>(), &mut errors);
        let sources = parse_list(self.sources.as_deref(), "sources", |s| s.parse::<SourceKind>(), &mut errors);
        let tags = self
            .tags
            .as_deref()
            .map(|raw| split_list(raw).into_iter().map(str::to_string).collect());

        let start = parse_instant(self.start.as_deref(), "start", &mut errors);
        let end = parse_instant(self.end.as_deref(), "end", &mut errors);
        let date_range = (start.is_some() || end.is_some()).then_some(DateRange { start, end });

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(TimelineFilters {
            event_types,
            date_range,
            sources,
            tags,
            is_public: self.public,
        })
    }
}
