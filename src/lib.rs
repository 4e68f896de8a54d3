//! Property History Engine
//!
//! An append-only log of domain events per property, with timelines,
//! cross-property search, analytics and export computed on demand.
//!
//! # Features
//!
//! - **Validated writes**: every rejected field is reported, nothing partial is stored
//! - **Thread-Safe**: per-property sharded store behind `parking_lot` locks
//! - **Timelines**: filtered, paginated, categorized and summarized views
//! - **Search**: keyword and structured filters with facet counts
//! - **Export**: JSON, CSV and PDF
//! - **Durable**: optional JSON-lines journal with compaction
//!
//! # Modules
//!
//! - `types`: Core data structures (HistoryEvent, EventData, PropertyTimeline)
//! - `event_store`: Store trait, in-memory and journal-backed stores
//! - `validation`: Create and patch validation
//! - `classifier`: Event type to category and importance
//! - `timeline`: Timeline builder
//! - `search`: Search engine and facets
//! - `analytics`: Per-property metrics and insights
//! - `export`: Timeline serialization
//! - `history`: The caller-facing `HistoryService`
//! - `api`: REST API over axum
//!
//! # Example
//!
//! ```no_run
//! use property_history::{CreateEventRequest, EventSource, EventType, HistoryService, SourceKind};
//!
//! let service = HistoryService::in_memory();
//! let response = service.create_event(CreateEventRequest::new(
//!     "prop-42",
//!     EventType::Listed,
//!     "Listed for sale",
//!     "Three bedroom house listed",
//!     EventSource::new(SourceKind::Agent, "agent-1", "Jane Agent"),
//! ));
//! assert!(response.success);
//! ```

pub mod analytics;
pub mod api;
pub mod classifier;
pub mod config;
pub mod error;
pub mod event_store;
pub mod export;
pub mod history;
pub mod search;
pub mod telemetry;
pub mod timeline;
pub mod types;
pub mod utils;
pub mod validation;

// Re-export commonly used items at crate root
pub use config::ServiceConfig;
pub use error::{HistoryError, HistoryResult, StoreError, StoreResult};
pub use event_store::{EventStore, InMemoryEventStore, JournalConfig, JournalEventStore};
pub use export::{ExportFormat, ExportOptions, ExportedTimeline};
pub use history::HistoryService;
pub use types::{
    CreateEventRequest, EventData, EventPatch, EventSource, EventType, HistoryAnalytics,
    HistoryEvent, PropertyHistory, PropertyTimeline, SearchQuery, SearchResults,
    ServiceResponse, SourceKind, TimelineFilters, TimelineRequest,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
