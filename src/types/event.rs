//! History event types
//!
//! A `HistoryEvent` is the atomic fact in a property's history. Events are
//! created once, may have a handful of presentation fields edited, and are
//! hard-deleted; everything else in the crate is a projection over them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::payload::{EventData, PayloadKind};
use super::request::{EventPatch, FieldError};

/// Kinds of events that can appear in a property's history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Listed,
    Delisted,
    Relisted,
    StatusChange,
    Pending,
    Sold,
    Rented,
    OffMarket,
    BackOnMarket,
    PriceChange,
    PriceReduction,
    PriceIncrease,
    OwnershipTransfer,
    MarketUpdate,
    ComparableSold,
    MarketTrendChange,
    AssessmentUpdate,
    Renovation,
    Inspection,
    Appraisal,
    FeatureUpdate,
    ViewingScheduled,
    ViewingCompleted,
    OpenHouse,
    PhotosAdded,
    VideoAdded,
    VirtualTourAdded,
    FloorPlanAdded,
    Shared,
    Favorited,
    ReviewAdded,
    CommentAdded,
    #[default]
    Custom,
}

impl EventType {
    /// Every event type, in declaration order
    pub const ALL: [EventType; 33] = [
        EventType::Listed,
        EventType::Delisted,
        EventType::Relisted,
        EventType::StatusChange,
        EventType::Pending,
        EventType::Sold,
        EventType::Rented,
        EventType::OffMarket,
        EventType::BackOnMarket,
        EventType::PriceChange,
        EventType::PriceReduction,
        EventType::PriceIncrease,
        EventType::OwnershipTransfer,
        EventType::MarketUpdate,
        EventType::ComparableSold,
        EventType::MarketTrendChange,
        EventType::AssessmentUpdate,
        EventType::Renovation,
        EventType::Inspection,
        EventType::Appraisal,
        EventType::FeatureUpdate,
        EventType::ViewingScheduled,
        EventType::ViewingCompleted,
        EventType::OpenHouse,
        EventType::PhotosAdded,
        EventType::VideoAdded,
        EventType::VirtualTourAdded,
        EventType::FloorPlanAdded,
        EventType::Shared,
        EventType::Favorited,
        EventType::ReviewAdded,
        EventType::CommentAdded,
        EventType::Custom,
    ];

    /// Wire name, e.g. `price_change`
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Listed => "listed",
            EventType::Delisted => "delisted",
            EventType::Relisted => "relisted",
            EventType::StatusChange => "status_change",
            EventType::Pending => "pending",
            EventType::Sold => "sold",
            EventType::Rented => "rented",
            EventType::OffMarket => "off_market",
            EventType::BackOnMarket => "back_on_market",
            EventType::PriceChange => "price_change",
            EventType::PriceReduction => "price_reduction",
            EventType::PriceIncrease => "price_increase",
            EventType::OwnershipTransfer => "ownership_transfer",
            EventType::MarketUpdate => "market_update",
            EventType::ComparableSold => "comparable_sold",
            EventType::MarketTrendChange => "market_trend_change",
            EventType::AssessmentUpdate => "assessment_update",
            EventType::Renovation => "renovation",
            EventType::Inspection => "inspection",
            EventType::Appraisal => "appraisal",
            EventType::FeatureUpdate => "feature_update",
            EventType::ViewingScheduled => "viewing_scheduled",
            EventType::ViewingCompleted => "viewing_completed",
            EventType::OpenHouse => "open_house",
            EventType::PhotosAdded => "photos_added",
            EventType::VideoAdded => "video_added",
            EventType::VirtualTourAdded => "virtual_tour_added",
            EventType::FloorPlanAdded => "floor_plan_added",
            EventType::Shared => "shared",
            EventType::Favorited => "favorited",
            EventType::ReviewAdded => "review_added",
            EventType::CommentAdded => "comment_added",
            EventType::Custom => "custom",
        }
    }

    /// Payload shape this type carries. `custom` payloads are accepted for any type.
    pub fn payload_kind(&self) -> PayloadKind {
        match self {
            EventType::Listed | EventType::Delisted | EventType::Relisted => PayloadKind::Listing,
            EventType::StatusChange
            | EventType::Pending
            | EventType::Rented
            | EventType::OffMarket
            | EventType::BackOnMarket => PayloadKind::Status,
            EventType::Sold | EventType::OwnershipTransfer => PayloadKind::Ownership,
            EventType::PriceChange | EventType::PriceReduction | EventType::PriceIncrease => {
                PayloadKind::Price
            }
            EventType::MarketUpdate
            | EventType::ComparableSold
            | EventType::MarketTrendChange
            | EventType::AssessmentUpdate => PayloadKind::Market,
            EventType::Renovation
            | EventType::Inspection
            | EventType::Appraisal
            | EventType::FeatureUpdate => PayloadKind::Property,
            EventType::ViewingScheduled | EventType::ViewingCompleted | EventType::OpenHouse => {
                PayloadKind::Viewing
            }
            EventType::PhotosAdded
            | EventType::VideoAdded
            | EventType::VirtualTourAdded
            | EventType::FloorPlanAdded => PayloadKind::Media,
            EventType::Shared
            | EventType::Favorited
            | EventType::ReviewAdded
            | EventType::CommentAdded
            | EventType::Custom => PayloadKind::Custom,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        EventType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown event type '{}'", wanted))
    }
}

/// Who or what produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    #[default]
    System,
    User,
    Agent,
    Mls,
    Api,
    Import,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::System => "system",
            SourceKind::User => "user",
            SourceKind::Agent => "agent",
            SourceKind::Mls => "mls",
            SourceKind::Api => "api",
            SourceKind::Import => "import",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "system" => Ok(SourceKind::System),
            "user" => Ok(SourceKind::User),
            "agent" => Ok(SourceKind::Agent),
            "mls" => Ok(SourceKind::Mls),
            "api" => Ok(SourceKind::Api),
            "import" => Ok(SourceKind::Import),
            other => Err(format!("unknown source type '{}'", other)),
        }
    }
}

/// Origin of an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EventSource {
    #[serde(rename = "type", default)]
    pub kind: SourceKind,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub verified: bool,
}

impl EventSource {
    pub fn new(kind: SourceKind, id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            name: name.into(),
            verified: false,
        }
    }
}

/// Provenance details attached to an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMetadata {
    /// Confidence score, 0-100
    #[serde(default = "default_confidence")]
    pub confidence: u8,
    #[serde(default)]
    pub verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_ref: Option<String>,
}

fn default_confidence() -> u8 {
    100
}

impl Default for EventMetadata {
    fn default() -> Self {
        Self {
            confidence: default_confidence(),
            verified: false,
            external_ref: None,
        }
    }
}

/// An event in a property's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEvent {
    pub id: String,
    pub property_id: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub title: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub data: EventData,
    pub source: EventSource,
    #[serde(default)]
    pub metadata: EventMetadata,
    pub is_public: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl HistoryEvent {
    /// Whether this event carries any of the given tags
    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        self.tags.iter().any(|t| tags.contains(t))
    }

    /// Produce the updated event described by `patch`.
    ///
    /// Only presentation fields change; id, property, type, timestamp and
    /// source are carried over untouched.
    pub fn apply_patch(&self, patch: &EventPatch) -> Result<HistoryEvent, FieldError> {
        let mut updated = self.clone();

        if let Some(title) = &patch.title {
            updated.title = title.trim().to_string();
        }
        if let Some(description) = &patch.description {
            updated.description = description.trim().to_string();
        }
        if let Some(data) = &patch.data {
            updated.data = self.data.merge(data)?;
        }
        if let Some(is_public) = patch.is_public {
            updated.is_public = is_public;
        }
        if let Some(tags) = &patch.tags {
            updated.tags = normalize_tags(tags.clone());
        }

        Ok(updated)
    }
}

/// Trim, drop blanks and collapse duplicate tags, keeping first-seen order
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::payload::PriceChange;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample_event() -> HistoryEvent {
        HistoryEvent {
            id: "evt_1".to_string(),
            property_id: "prop-1".to_string(),
            event_type: EventType::PriceChange,
            title: "Price reduced".to_string(),
            description: "Seller lowered the asking price".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            data: EventData::Price(PriceChange {
                old_price: Some(450_000.0),
                new_price: 425_000.0,
                currency: None,
                reason: None,
            }),
            source: EventSource::new(SourceKind::Agent, "agent-7", "Dana Reyes"),
            metadata: EventMetadata::default(),
            is_public: true,
            tags: vec!["price".to_string()],
        }
    }

    #[test]
    fn test_event_type_serialization() {
        let json = serde_json::to_string(&EventType::PriceChange).unwrap();
        assert_eq!(json, "\"price_change\"");

        let parsed: EventType = serde_json::from_str("\"market_trend_change\"").unwrap();
        assert_eq!(parsed, EventType::MarketTrendChange);
    }

    #[test]
    fn test_event_type_wire_names_match_serde() {
        for t in EventType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
            assert_eq!(t.as_str().parse::<EventType>().unwrap(), t);
        }
    }

    #[test]
    fn test_event_json_shape() {
        let value = serde_json::to_value(sample_event()).unwrap();
        assert_eq!(value["propertyId"], "prop-1");
        assert_eq!(value["type"], "price_change");
        assert_eq!(value["isPublic"], true);
        assert_eq!(value["source"]["type"], "agent");
        assert_eq!(value["data"]["price"]["oldPrice"], 450000.0);
        assert_eq!(value["data"]["price"]["newPrice"], 425000.0);
    }

    #[test]
    fn test_apply_patch_keeps_immutable_fields() {
        let event = sample_event();
        let patch = EventPatch {
            title: Some("  Price cut  ".to_string()),
            is_public: Some(false),
            tags: Some(vec!["a".into(), "a".into(), " ".into(), "b".into()]),
            ..Default::default()
        };

        let updated = event.apply_patch(&patch).unwrap();
        assert_eq!(updated.title, "Price cut");
        assert!(!updated.is_public);
        assert_eq!(updated.tags, vec!["a", "b"]);
        assert_eq!(updated.id, event.id);
        assert_eq!(updated.timestamp, event.timestamp);
        assert_eq!(updated.source, event.source);
        assert_eq!(updated.event_type, event.event_type);
    }

    #[test]
    fn test_apply_patch_merges_data() {
        let event = sample_event();
        let patch = EventPatch {
            data: Some(json!({"price": {"reason": "slow market"}})),
            ..Default::default()
        };

        let updated = event.apply_patch(&patch).unwrap();
        match updated.data {
            EventData::Price(p) => {
                assert_eq!(p.new_price, 425_000.0);
                assert_eq!(p.reason.as_deref(), Some("slow market"));
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_source_kind_parse() {
        assert_eq!("MLS".parse::<SourceKind>().unwrap(), SourceKind::Mls);
        assert!("carrier-pigeon".parse::<SourceKind>().is_err());
    }
}
