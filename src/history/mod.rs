//! History service - caller-facing facade
//!
//! Owns the event store, the clock, the market benchmark provider and the
//! cached per-property history views. Writes go through validation into the
//! store; reads are pure projections over a snapshot of the store.

mod cache;
mod crud;
mod query;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::analytics::{MarketBenchmarks, StaticBenchmarks};
use crate::config::ServiceConfig;
use crate::error::{HistoryResult, StoreResult};
use crate::event_store::{EventStore, InMemoryEventStore, JournalConfig, JournalEventStore};
use crate::export::{ExportOptions, ExportedTimeline};
use crate::types::{
    CreateEventRequest, EventPatch, HistoryAnalytics, HistoryEvent, PropertyHistory,
    PropertyTimeline, SearchQuery, SearchResults, ServiceResponse, TimelineRequest,
};
use crate::utils::{Clock, SystemClock};

use cache::HistoryCache;

pub use crud::new_event_id;

/// Thread-safe property history service, shared through `Arc`
pub struct HistoryService {
    pub(crate) store: Arc<dyn EventStore>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) benchmarks: Arc<dyn MarketBenchmarks>,
    pub(crate) config: ServiceConfig,
    /// property id → newest-first history, dropped on every write
    pub(crate) history_cache: HistoryCache,
    /// Last timestamp handed out; creation stamps never go backwards
    pub(crate) last_stamp: Mutex<Option<DateTime<Utc>>>,
}

impl HistoryService {
    /// Service over `store` with the system clock and static benchmarks
    pub fn new(store: Arc<dyn EventStore>, config: ServiceConfig) -> Self {
        let benchmarks = Arc::new(StaticBenchmarks::new(config.market.clone()));
        Self {
            store,
            clock: Arc::new(SystemClock),
            benchmarks,
            config,
            history_cache: HistoryCache::new(),
            last_stamp: Mutex::new(None),
        }
    }

    /// Service backed by a fresh in-memory store and default config
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryEventStore::new()), ServiceConfig::default())
    }

    /// Service for `config`: journal-backed when a data dir is set, in-memory otherwise
    pub fn open(config: ServiceConfig) -> HistoryResult<Self> {
        let store: Arc<dyn EventStore> = match &config.data_dir {
            Some(dir) => Arc::new(JournalEventStore::open(JournalConfig::new(dir))?),
            None => Arc::new(InMemoryEventStore::new()),
        };
        let service = Self::new(store, config);
        service.seed_last_stamp()?;
        Ok(service)
    }

    /// Start creation stamps no earlier than the newest stored event
    fn seed_last_stamp(&self) -> StoreResult<()> {
        let newest = self.store.all_events()?.into_iter().map(|e| e.timestamp).max();
        *self.last_stamp.lock() = newest;
        Ok(())
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_benchmarks(mut self, benchmarks: Arc<dyn MarketBenchmarks>) -> Self {
        self.benchmarks = benchmarks;
        self
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn EventStore> {
        &self.store
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Creation timestamp: the clock's reading, but never earlier than the
    /// previous stamp
    pub(crate) fn next_timestamp(&self) -> DateTime<Utc> {
        let mut last = self.last_stamp.lock();
        let now = self.clock.now();
        let stamp = match *last {
            Some(prev) if prev > now => prev,
            _ => now,
        };
        *last = Some(stamp);
        stamp
    }
}

impl Default for HistoryService {
    fn default() -> Self {
        Self::in_memory()
    }
}

// Public operations, implemented in the submodules
impl HistoryService {
    // Writes (from crud.rs)
    pub fn create_event(&self, request: CreateEventRequest) -> ServiceResponse<HistoryEvent> {
        crud::create_event(self, request)
    }

    pub fn get_event(&self, id: &str) -> ServiceResponse<HistoryEvent> {
        crud::get_event(self, id)
    }

    pub fn update_event(&self, id: &str, patch: EventPatch) -> ServiceResponse<HistoryEvent> {
        crud::update_event(self, id, patch)
    }

    pub fn delete_event(&self, id: &str) -> ServiceResponse<HistoryEvent> {
        crud::delete_event(self, id)
    }

    // Reads (from query.rs)
    pub fn get_property_history(&self, property_id: &str) -> HistoryResult<Option<Arc<PropertyHistory>>> {
        query::get_property_history(self, property_id)
    }

    pub fn get_property_timeline(&self, request: TimelineRequest) -> ServiceResponse<PropertyTimeline> {
        query::get_property_timeline(self, request)
    }

    pub fn search_events(
        &self,
        query: &SearchQuery,
        page: Option<usize>,
        limit: Option<usize>,
    ) -> HistoryResult<SearchResults> {
        query::search_events(self, query, page, limit)
    }

    pub fn get_history_analytics(&self, property_id: &str) -> HistoryResult<Option<HistoryAnalytics>> {
        query::get_history_analytics(self, property_id)
    }

    pub fn export_timeline(
        &self,
        property_id: &str,
        options: &ExportOptions,
    ) -> HistoryResult<ExportedTimeline> {
        query::export_timeline(self, property_id, options)
    }
}
