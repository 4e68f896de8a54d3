//! Cross-property search types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::event::{EventType, HistoryEvent, SourceKind};
use super::timeline::DateRange;

/// Structured + keyword search over all events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_types: Option<Vec<EventType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<SourceKind>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Case-insensitive substring matched against title or description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
}

/// A labelled count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetBucket {
    pub label: String,
    pub count: usize,
}

/// Facet histograms over the filtered (pre-pagination) result set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFacets {
    pub event_types: BTreeMap<String, usize>,
    pub sources: BTreeMap<String, usize>,
    pub date_ranges: Vec<FacetBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub events: Vec<HistoryEvent>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub has_more: bool,
    pub facets: SearchFacets,
}
