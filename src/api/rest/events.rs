//! Event endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Json,
};

use super::respond;
use crate::api::state::AppState;
use crate::types::{CreateEventRequest, EventPatch};

/// POST /api/events - Record a new event
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateEventRequest>,
) -> Response {
    respond(state.service.create_event(request), StatusCode::CREATED)
}

/// GET /api/events/:id
pub async fn get_event(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    respond(state.service.get_event(&id), StatusCode::OK)
}

/// PATCH /api/events/:id - Update title, description, data, visibility or tags
pub async fn update_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<EventPatch>,
) -> Response {
    respond(state.service.update_event(&id, patch), StatusCode::OK)
}

/// DELETE /api/events/:id - Hard delete
pub async fn delete_event(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    respond(state.service.delete_event(&id), StatusCode::OK)
}
