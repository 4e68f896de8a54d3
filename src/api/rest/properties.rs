//! Per-property endpoints: history, timeline, analytics and export

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::{fault, respond, ApiError, ApiResponse, TimelineParams};
use crate::api::state::AppState;
use crate::error::HistoryError;
use crate::export::ExportOptions;
use crate::types::TimelineRequest;

/// GET /api/properties/:id/history - All events, newest first
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(property_id): Path<String>,
) -> Response {
    match state.service.get_property_history(&property_id) {
        Ok(Some(history)) => {
            let total = history.total_events;
            (StatusCode::OK, Json(ApiResponse::with_total(history.as_ref(), total))).into_response()
        }
        Ok(None) => {
            let error = ApiError::not_found(format!("No history for property '{}'", property_id));
            (StatusCode::NOT_FOUND, Json(error)).into_response()
        }
        Err(err) => fault(&err, "loading property history"),
    }
}

/// GET /api/properties/:id/timeline
pub async fn get_timeline(
    State(state): State<Arc<AppState>>,
    Path(property_id): Path<String>,
    Query(params): Query<TimelineParams>,
) -> Response {
    let filters = match params.filters() {
        Ok(filters) => filters,
        Err(errors) => {
            return (StatusCode::BAD_REQUEST, Json(ApiError::invalid_fields(errors))).into_response();
        }
    };

    let request = TimelineRequest {
        property_id,
        filters,
        page: params.page,
        limit: params.limit,
    };
    respond(state.service.get_property_timeline(request), StatusCode::OK)
}

/// GET /api/properties/:id/analytics
pub async fn get_analytics(
    State(state): State<Arc<AppState>>,
    Path(property_id): Path<String>,
) -> Response {
    match state.service.get_history_analytics(&property_id) {
        Ok(Some(analytics)) => (StatusCode::OK, Json(ApiResponse::new(analytics))).into_response(),
        Ok(None) => {
            let error = ApiError::not_found(format!("No events for property '{}'", property_id));
            (StatusCode::NOT_FOUND, Json(error)).into_response()
        }
        Err(err) => fault(&err, "computing analytics"),
    }
}

/// GET /api/properties/:id/export?format=json|csv|pdf
pub async fn export_timeline(
    State(state): State<Arc<AppState>>,
    Path(property_id): Path<String>,
    Query(params): Query<TimelineParams>,
) -> Response {
    let filters = match params.filters() {
        Ok(filters) => filters,
        Err(errors) => {
            return (StatusCode::BAD_REQUEST, Json(ApiError::invalid_fields(errors))).into_response();
        }
    };
    let format = params.format.clone().unwrap_or_else(|| "json".to_string());
    let options = ExportOptions::new(format).with_filters(filters);

    match state.service.export_timeline(&property_id, &options) {
        Ok(exported) => {
            let disposition = format!("attachment; filename=\"{}\"", exported.file_name);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, exported.content_type.to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                exported.bytes,
            )
                .into_response()
        }
        Err(err @ HistoryError::UnsupportedFormat(_)) => {
            let error = ApiError::bad_request(err.public_message("exporting timeline"));
            (StatusCode::BAD_REQUEST, Json(error)).into_response()
        }
        Err(err) => fault(&err, "exporting timeline"),
    }
}
