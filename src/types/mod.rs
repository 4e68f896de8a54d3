//! Data types for the property history engine
//!
//! This module contains all the core data structures used throughout the crate.

mod analytics;
mod classification;
mod event;
mod payload;
mod request;
mod response;
mod search;
mod timeline;

pub use analytics::{ActivityPoint, HistoryAnalytics, KeyMetrics, MarketComparison};
pub use classification::{EventCategory, EventImportance};
pub use event::{
    normalize_tags, EventMetadata, EventSource, EventType, HistoryEvent, SourceKind,
};
pub use payload::{
    EventData, ListingAction, MarketUpdate, MediaAction, OwnershipTransfer, PayloadKind,
    PriceChange, PropertyAction, StatusChange, Viewing,
};
pub use request::{CreateEventRequest, EventPatch, FieldError};
pub use response::{Outcome, ServiceResponse};
pub use search::{FacetBucket, SearchFacets, SearchQuery, SearchResults};
pub use timeline::{
    DateRange, DateSpan, Pagination, PropertyHistory, PropertyTimeline, TimelineEvent,
    TimelineFilters, TimelineRequest, TimelineSummary,
};

/// Count occurrences of each key, ordered by key
pub fn histogram<I, K>(keys: I) -> std::collections::BTreeMap<String, usize>
where
    I: IntoIterator<Item = K>,
    K: ToString,
{
    let mut counts = std::collections::BTreeMap::new();
    for key in keys {
        *counts.entry(key.to_string()).or_insert(0) += 1;
    }
    counts
}
