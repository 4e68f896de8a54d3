//! Advisory insight rules
//!
//! Rules are independent; each fires at most once and output follows the
//! order they are declared in.

use chrono::{DateTime, Duration, Utc};

use crate::types::{HistoryEvent, KeyMetrics, MarketComparison};

/// Trailing window for the recent-activity rule
pub const RECENT_WINDOW_DAYS: i64 = 7;

const PRICE_CHANGE_LIMIT: usize = 2;
const VIEWING_LIMIT: usize = 5;
const RECENT_EVENT_LIMIT: usize = 3;

pub fn timeline_insights(
    events: &[&HistoryEvent],
    metrics: &KeyMetrics,
    market: &MarketComparison,
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut insights = Vec::new();

    if metrics.price_changes > PRICE_CHANGE_LIMIT {
        insights.push(format!(
            "Multiple price changes ({}) suggest the asking price is still being tested",
            metrics.price_changes
        ));
    }

    if metrics.viewings > VIEWING_LIMIT {
        insights.push(format!(
            "Strong buyer interest with {} viewing events",
            metrics.viewings
        ));
    }

    let window_start = now - Duration::days(RECENT_WINDOW_DAYS);
    let recent = events
        .iter()
        .filter(|e| e.timestamp >= window_start && e.timestamp <= now)
        .count();
    if recent > RECENT_EVENT_LIMIT {
        insights.push(format!(
            "Recent high activity: {} events in the last {} days",
            recent, RECENT_WINDOW_DAYS
        ));
    }

    if metrics.days_on_market as f64 > market.average_days_on_market {
        insights.push(format!(
            "On market for {} days, longer than the {:.0}-day market average",
            metrics.days_on_market, market.average_days_on_market
        ));
    }

    insights
}
