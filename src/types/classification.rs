//! Display classification of event types

use serde::{Deserialize, Serialize};

/// Coarse grouping of event types for display and analytics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Price,
    Status,
    Market,
    Property,
    Viewing,
    Media,
    Social,
    Custom,
}

/// Priority tier of an event type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventImportance {
    Low,
    Medium,
    High,
    Critical,
}
