//! HTTP API for the history service
//!
//! REST endpoints over [`HistoryService`](crate::history::HistoryService),
//! served with axum.

pub mod http;
pub mod rest;
pub mod state;

pub use http::create_router;
pub use state::AppState;
