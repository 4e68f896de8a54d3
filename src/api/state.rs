//! Shared application state

use std::sync::Arc;

use crate::history::HistoryService;

/// State handed to every handler
pub struct AppState {
    pub service: Arc<HistoryService>,
}

impl AppState {
    pub fn new(service: Arc<HistoryService>) -> Self {
        Self { service }
    }
}
