//! Timeline and property-history projections

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::classification::{EventCategory, EventImportance};
use super::event::{EventType, HistoryEvent, SourceKind};

/// Inclusive time window; either bound may be open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        self.start.map_or(true, |s| *ts >= s) && self.end.map_or(true, |e| *ts <= e)
    }
}

/// Timeline filters. A missing (or empty) field places no constraint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_types: Option<Vec<EventType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<SourceKind>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

impl TimelineFilters {
    pub fn with_event_types(mut self, types: impl Into<Vec<EventType>>) -> Self {
        self.event_types = Some(types.into());
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn with_sources(mut self, sources: impl Into<Vec<SourceKind>>) -> Self {
        self.sources = Some(sources.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn public_only(mut self, is_public: bool) -> Self {
        self.is_public = Some(is_public);
        self
    }
}

/// Request for one page of a property's timeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineRequest {
    pub property_id: String,
    #[serde(default)]
    pub filters: TimelineFilters,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl TimelineRequest {
    pub fn new(property_id: impl Into<String>) -> Self {
        Self {
            property_id: property_id.into(),
            ..Default::default()
        }
    }

    pub fn with_filters(mut self, filters: TimelineFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn page(mut self, page: usize, limit: usize) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }
}

/// A history event decorated for presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    #[serde(flatten)]
    pub event: HistoryEvent,
    /// 1-based position within the filtered, sorted set
    pub display_order: usize,
    pub category: EventCategory,
    pub importance: EventImportance,
    pub related_events: Vec<String>,
}

/// Earliest and latest timestamps of a filtered set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Summary over the full filtered set, independent of pagination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineSummary {
    pub total_events: usize,
    pub public_events: usize,
    pub date_range: DateSpan,
    pub event_types: BTreeMap<String, usize>,
    pub key_milestones: Vec<HistoryEvent>,
    pub recent_activity: Vec<HistoryEvent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub has_more: bool,
}

/// One page of a property's timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyTimeline {
    pub property_id: String,
    pub events: Vec<TimelineEvent>,
    pub summary: TimelineSummary,
    pub filters: TimelineFilters,
    pub pagination: Pagination,
}

/// All events for one property, newest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyHistory {
    pub property_id: String,
    pub events: Vec<HistoryEvent>,
    pub total_events: usize,
    pub last_event_date: DateTime<Utc>,
}
