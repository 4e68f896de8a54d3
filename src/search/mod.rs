//! Cross-property event search
//!
//! Structured filters and a keyword are applied conjunctively, results are
//! sorted newest-first and paged, and facet histograms are computed over the
//! whole matching set.

mod facets;

use chrono::{DateTime, Utc};
use rayon::prelude::*;

use crate::timeline::{matches_filters, sort_newest_first, PageRequest};
use crate::types::{HistoryEvent, SearchQuery, SearchResults, TimelineFilters};

pub use facets::{build_facets, date_bucket, DATE_BUCKETS};

/// Threshold for using parallel filtering (event count)
pub const PARALLEL_SEARCH_THRESHOLD: usize = 1000;

/// Does `event` contain `keyword` (already lowercased) in title or description?
pub fn matches_keyword(event: &HistoryEvent, keyword: &str) -> bool {
    event.title.to_lowercase().contains(keyword)
        || event.description.to_lowercase().contains(keyword)
}

fn structured_filters(query: &SearchQuery) -> TimelineFilters {
    TimelineFilters {
        event_types: query.event_types.clone(),
        date_range: query.date_range,
        sources: query.sources.clone(),
        tags: query.tags.clone(),
        is_public: None,
    }
}

fn matches_query(
    event: &HistoryEvent,
    query: &SearchQuery,
    filters: &TimelineFilters,
    keyword: Option<&str>,
) -> bool {
    if let Some(property_id) = query.property_id.as_deref() {
        if !property_id.is_empty() && event.property_id != property_id {
            return false;
        }
    }
    if !matches_filters(event, filters) {
        return false;
    }
    keyword.map_or(true, |k| matches_keyword(event, k))
}

/// Run `query` over `events`
pub fn search(
    events: Vec<HistoryEvent>,
    query: &SearchQuery,
    page: PageRequest,
    now: DateTime<Utc>,
) -> SearchResults {
    let filters = structured_filters(query);
    let keyword = query
        .keywords
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_lowercase);
    let keyword = keyword.as_deref();

    let mut matching: Vec<HistoryEvent> = if events.len() > PARALLEL_SEARCH_THRESHOLD {
        events
            .into_par_iter()
            .filter(|e| matches_query(e, query, &filters, keyword))
            .collect()
    } else {
        events
            .into_iter()
            .filter(|e| matches_query(e, query, &filters, keyword))
            .collect()
    };
    sort_newest_first(&mut matching);

    let facets = build_facets(&matching, now);
    let (range, pagination) = page.apply(matching.len());

    SearchResults {
        events: matching[range].to_vec(),
        total: pagination.total,
        page: pagination.page,
        limit: pagination.limit,
        has_more: pagination.has_more,
        facets,
    }
}
