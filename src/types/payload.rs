//! Type-specific event payloads
//!
//! `EventData` is externally tagged on the wire, so a price change reads
//! `{"price": {"oldPrice": 450000, "newPrice": 425000}}`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::request::FieldError;

/// Shape of an event payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    Price,
    Status,
    Listing,
    Ownership,
    Market,
    Property,
    Viewing,
    Media,
    Custom,
}

impl PayloadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadKind::Price => "price",
            PayloadKind::Status => "status",
            PayloadKind::Listing => "listing",
            PayloadKind::Ownership => "ownership",
            PayloadKind::Market => "market",
            PayloadKind::Property => "property",
            PayloadKind::Viewing => "viewing",
            PayloadKind::Media => "media",
            PayloadKind::Custom => "custom",
        }
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceChange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_price: Option<f64>,
    pub new_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_status: Option<String>,
    pub new_status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingAction {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mls_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipTransfer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deed_reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketUpdate {
    pub metric: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparable_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyAction {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contractor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendees: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaAction {
    pub media_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

/// Event payload, one variant per payload shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventData {
    Price(PriceChange),
    Status(StatusChange),
    Listing(ListingAction),
    Ownership(OwnershipTransfer),
    Market(MarketUpdate),
    Property(PropertyAction),
    Viewing(Viewing),
    Media(MediaAction),
    Custom(Map<String, Value>),
}

impl Default for EventData {
    fn default() -> Self {
        EventData::Custom(Map::new())
    }
}

impl EventData {
    pub fn kind(&self) -> PayloadKind {
        match self {
            EventData::Price(_) => PayloadKind::Price,
            EventData::Status(_) => PayloadKind::Status,
            EventData::Listing(_) => PayloadKind::Listing,
            EventData::Ownership(_) => PayloadKind::Ownership,
            EventData::Market(_) => PayloadKind::Market,
            EventData::Property(_) => PayloadKind::Property,
            EventData::Viewing(_) => PayloadKind::Viewing,
            EventData::Media(_) => PayloadKind::Media,
            EventData::Custom(_) => PayloadKind::Custom,
        }
    }

    /// Merge a partial payload into this one.
    ///
    /// The patch must use the same tag as the current payload, e.g.
    /// `{"price": {"reason": "..."}}`. Fields set to `null` are cleared.
    pub fn merge(&self, patch: &Value) -> Result<EventData, FieldError> {
        let tag = self.kind().as_str();

        let fields = patch
            .as_object()
            .filter(|obj| obj.len() == 1)
            .and_then(|obj| obj.get(tag))
            .and_then(Value::as_object)
            .ok_or_else(|| {
                FieldError::new(
                    "data",
                    format!("data patch must be an object under the existing '{}' payload", tag),
                )
            })?;

        let mut current = serde_json::to_value(self)
            .map_err(|e| FieldError::new("data", format!("unreadable payload: {}", e)))?;
        let inner = current
            .get_mut(tag)
            .and_then(Value::as_object_mut)
            .ok_or_else(|| FieldError::new("data", "unreadable payload"))?;

        for (key, value) in fields {
            if value.is_null() {
                inner.remove(key);
            } else {
                inner.insert(key.clone(), value.clone());
            }
        }

        serde_json::from_value(current)
            .map_err(|e| FieldError::new("data", format!("invalid {} payload: {}", tag, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_price_payload_wire_shape() {
        let data: EventData =
            serde_json::from_value(json!({"price": {"oldPrice": 450000, "newPrice": 425000}}))
                .unwrap();
        assert_eq!(data.kind(), PayloadKind::Price);
        match data {
            EventData::Price(p) => {
                assert_eq!(p.old_price, Some(450_000.0));
                assert_eq!(p.new_price, 425_000.0);
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_default_is_empty_custom() {
        let value = serde_json::to_value(EventData::default()).unwrap();
        assert_eq!(value, json!({"custom": {}}));
    }

    #[test]
    fn test_merge_rejects_other_kind() {
        let data = EventData::Status(StatusChange {
            old_status: None,
            new_status: "pending".to_string(),
            reason: None,
        });
        let err = data.merge(&json!({"price": {"newPrice": 1}})).unwrap_err();
        assert_eq!(err.field, "data");
    }

    #[test]
    fn test_merge_clears_null_fields() {
        let data = EventData::Status(StatusChange {
            old_status: Some("active".to_string()),
            new_status: "pending".to_string(),
            reason: Some("offer".to_string()),
        });
        let merged = data.merge(&json!({"status": {"reason": null}})).unwrap();
        match merged {
            EventData::Status(s) => {
                assert_eq!(s.reason, None);
                assert_eq!(s.old_status.as_deref(), Some("active"));
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_merge_custom_payload() {
        let data = EventData::default();
        let merged = data.merge(&json!({"custom": {"note": "hello"}})).unwrap();
        assert_eq!(
            serde_json::to_value(merged).unwrap(),
            json!({"custom": {"note": "hello"}})
        );
    }

    #[test]
    fn test_merge_cannot_drop_required_field() {
        let data = EventData::Media(MediaAction {
            media_type: "photo".to_string(),
            url: None,
            count: Some(12),
        });
        assert!(data.merge(&json!({"media": {"mediaType": null}})).is_err());
    }
}
