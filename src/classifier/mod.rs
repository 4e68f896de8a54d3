//! Event classification
//!
//! Maps each event type to a display category and an importance tier.
//! Both lookups are table-driven; a type missing from a table falls back to
//! `Custom` / `Medium` so every event can be rendered.

use crate::types::{EventCategory, EventImportance, EventType};

pub const DEFAULT_CATEGORY: EventCategory = EventCategory::Custom;
pub const DEFAULT_IMPORTANCE: EventImportance = EventImportance::Medium;

const CATEGORY_TABLE: &[(EventType, EventCategory)] = &[
    (EventType::PriceChange, EventCategory::Price),
    (EventType::PriceReduction, EventCategory::Price),
    (EventType::PriceIncrease, EventCategory::Price),
    (EventType::Listed, EventCategory::Status),
    (EventType::Delisted, EventCategory::Status),
    (EventType::Relisted, EventCategory::Status),
    (EventType::StatusChange, EventCategory::Status),
    (EventType::Pending, EventCategory::Status),
    (EventType::Sold, EventCategory::Status),
    (EventType::Rented, EventCategory::Status),
    (EventType::OffMarket, EventCategory::Status),
    (EventType::BackOnMarket, EventCategory::Status),
    (EventType::MarketUpdate, EventCategory::Market),
    (EventType::ComparableSold, EventCategory::Market),
    (EventType::MarketTrendChange, EventCategory::Market),
    (EventType::AssessmentUpdate, EventCategory::Market),
    (EventType::OwnershipTransfer, EventCategory::Property),
    (EventType::Renovation, EventCategory::Property),
    (EventType::Inspection, EventCategory::Property),
    (EventType::Appraisal, EventCategory::Property),
    (EventType::FeatureUpdate, EventCategory::Property),
    (EventType::ViewingScheduled, EventCategory::Viewing),
    (EventType::ViewingCompleted, EventCategory::Viewing),
    (EventType::OpenHouse, EventCategory::Viewing),
    (EventType::PhotosAdded, EventCategory::Media),
    (EventType::VideoAdded, EventCategory::Media),
    (EventType::VirtualTourAdded, EventCategory::Media),
    (EventType::FloorPlanAdded, EventCategory::Media),
    (EventType::Shared, EventCategory::Social),
    (EventType::Favorited, EventCategory::Social),
    (EventType::ReviewAdded, EventCategory::Social),
    (EventType::CommentAdded, EventCategory::Social),
    (EventType::Custom, EventCategory::Custom),
];

const IMPORTANCE_TABLE: &[(EventType, EventImportance)] = &[
    (EventType::Sold, EventImportance::Critical),
    (EventType::OwnershipTransfer, EventImportance::Critical),
    (EventType::Listed, EventImportance::High),
    (EventType::Delisted, EventImportance::High),
    (EventType::Pending, EventImportance::High),
    (EventType::StatusChange, EventImportance::High),
    (EventType::PriceChange, EventImportance::High),
    (EventType::PriceReduction, EventImportance::High),
    (EventType::PriceIncrease, EventImportance::High),
    (EventType::Relisted, EventImportance::Medium),
    (EventType::Rented, EventImportance::Medium),
    (EventType::OffMarket, EventImportance::Medium),
    (EventType::BackOnMarket, EventImportance::Medium),
    (EventType::MarketTrendChange, EventImportance::Medium),
    (EventType::AssessmentUpdate, EventImportance::Medium),
    (EventType::Renovation, EventImportance::Medium),
    (EventType::Inspection, EventImportance::Medium),
    (EventType::Appraisal, EventImportance::Medium),
    (EventType::OpenHouse, EventImportance::Medium),
    (EventType::MarketUpdate, EventImportance::Low),
    (EventType::ComparableSold, EventImportance::Low),
    (EventType::FeatureUpdate, EventImportance::Low),
    (EventType::ViewingScheduled, EventImportance::Low),
    (EventType::ViewingCompleted, EventImportance::Low),
    (EventType::PhotosAdded, EventImportance::Low),
    (EventType::VideoAdded, EventImportance::Low),
    (EventType::VirtualTourAdded, EventImportance::Low),
    (EventType::FloorPlanAdded, EventImportance::Low),
    (EventType::Shared, EventImportance::Low),
    (EventType::Favorited, EventImportance::Low),
    (EventType::ReviewAdded, EventImportance::Low),
    (EventType::CommentAdded, EventImportance::Low),
];

/// Types surfaced as milestones in a timeline summary
pub const MILESTONE_TYPES: &[EventType] = &[EventType::Sold, EventType::Listed, EventType::PriceChange];

fn lookup<T: Copy>(table: &[(EventType, T)], event_type: EventType, default: T) -> T {
    table
        .iter()
        .find(|(t, _)| *t == event_type)
        .map(|(_, value)| *value)
        .unwrap_or(default)
}

pub fn category_of(event_type: EventType) -> EventCategory {
    lookup(CATEGORY_TABLE, event_type, DEFAULT_CATEGORY)
}

pub fn importance_of(event_type: EventType) -> EventImportance {
    lookup(IMPORTANCE_TABLE, event_type, DEFAULT_IMPORTANCE)
}

pub fn is_milestone(event_type: EventType) -> bool {
    MILESTONE_TYPES.contains(&event_type)
}
