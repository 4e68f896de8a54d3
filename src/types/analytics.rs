//! Per-property analytics types

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of events on one UTC calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityPoint {
    pub date: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMetrics {
    pub days_on_market: i64,
    pub price_changes: usize,
    pub viewings: usize,
    pub status_changes: usize,
    pub total_events: usize,
}

/// Reference values for the wider market, supplied from outside
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketComparison {
    pub average_days_on_market: f64,
    pub average_price_changes: f64,
    pub market_activity: String,
}

impl Default for MarketComparison {
    fn default() -> Self {
        Self {
            average_days_on_market: 45.0,
            average_price_changes: 1.5,
            market_activity: "moderate".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryAnalytics {
    pub property_id: String,
    pub event_type_distribution: BTreeMap<String, usize>,
    pub activity_trend: Vec<ActivityPoint>,
    pub key_metrics: KeyMetrics,
    pub market_comparison: MarketComparison,
    pub timeline_insights: Vec<String>,
}
