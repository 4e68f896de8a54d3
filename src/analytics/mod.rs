//! Per-property analytics
//!
//! Everything here is a pure projection over one property's events. Market
//! reference values come from a [`MarketBenchmarks`] provider rather than
//! being derived from the property itself.

mod insights;

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::types::{
    histogram, ActivityPoint, EventType, HistoryAnalytics, HistoryEvent, KeyMetrics,
    MarketComparison,
};
use crate::utils::ceil_days_between;

pub use insights::{timeline_insights, RECENT_WINDOW_DAYS};

/// Source of market-wide reference values
pub trait MarketBenchmarks: Send + Sync {
    fn comparison_for(&self, property_id: &str) -> MarketComparison;
}

/// The same benchmark for every property
#[derive(Debug, Clone, Default)]
pub struct StaticBenchmarks {
    comparison: MarketComparison,
}

impl StaticBenchmarks {
    pub fn new(comparison: MarketComparison) -> Self {
        Self { comparison }
    }
}

impl MarketBenchmarks for StaticBenchmarks {
    fn comparison_for(&self, _property_id: &str) -> MarketComparison {
        self.comparison.clone()
    }
}

/// Compute analytics for `property_id`. `None` when it has no events.
pub fn analyze(
    property_id: &str,
    events: &[HistoryEvent],
    benchmarks: &dyn MarketBenchmarks,
    now: DateTime<Utc>,
) -> Option<HistoryAnalytics> {
    let events: Vec<&HistoryEvent> = events
        .iter()
        .filter(|e| e.property_id == property_id)
        .collect();
    if events.is_empty() {
        return None;
    }

    let key_metrics = key_metrics(&events, now);
    let market_comparison = benchmarks.comparison_for(property_id);
    let timeline_insights = timeline_insights(&events, &key_metrics, &market_comparison, now);

    Some(HistoryAnalytics {
        property_id: property_id.to_string(),
        event_type_distribution: histogram(events.iter().map(|e| e.event_type.as_str())),
        activity_trend: activity_trend(&events),
        key_metrics,
        market_comparison,
        timeline_insights,
    })
}

/// Events per UTC calendar day, ascending by date
pub fn activity_trend(events: &[&HistoryEvent]) -> Vec<ActivityPoint> {
    let mut days: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for event in events {
        *days.entry(event.timestamp.date_naive()).or_insert(0) += 1;
    }
    days.into_iter()
        .map(|(date, count)| ActivityPoint { date, count })
        .collect()
}

/// Whole days from the earliest listing to the latest sale, or to `now`
/// while unsold. Zero when never listed.
pub fn days_on_market(events: &[&HistoryEvent], now: DateTime<Utc>) -> i64 {
    let listed = events
        .iter()
        .filter(|e| e.event_type == EventType::Listed)
        .map(|e| e.timestamp)
        .min();
    let Some(listed) = listed else {
        return 0;
    };

    let sold = events
        .iter()
        .filter(|e| e.event_type == EventType::Sold)
        .map(|e| e.timestamp)
        .max();
    ceil_days_between(listed, sold.unwrap_or(now))
}

fn count_containing(events: &[&HistoryEvent], needle: &str) -> usize {
    events
        .iter()
        .filter(|e| e.event_type.as_str().contains(needle))
        .count()
}

pub fn key_metrics(events: &[&HistoryEvent], now: DateTime<Utc>) -> KeyMetrics {
    KeyMetrics {
        days_on_market: days_on_market(events, now),
        price_changes: count_containing(events, "price"),
        viewings: count_containing(events, "viewing"),
        status_changes: count_containing(events, "status"),
        total_events: events.len(),
    }
}
