//! Search endpoint

use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use super::fault;
use crate::api::state::AppState;
use crate::types::SearchQuery;

/// Search query plus paging
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchBody {
    #[serde(flatten)]
    pub query: SearchQuery,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

/// POST /api/events/search - Keyword and structured search across properties
pub async fn search_events(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SearchBody>,
) -> Response {
    match state.service.search_events(&body.query, body.page, body.limit) {
        Ok(results) => Json(results).into_response(),
        Err(err) => fault(&err, "searching events"),
    }
}
