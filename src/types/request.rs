//! Inbound request types for write operations

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::event::{EventMetadata, EventSource, EventType};
use super::payload::EventData;

/// A single rejected field with a human-readable reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn default_true() -> bool {
    true
}

/// Request to record a new history event
///
/// Missing strings deserialize as empty so the validator can report them
/// field by field instead of failing the whole payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[serde(default)]
    pub property_id: String,
    #[serde(rename = "type", default)]
    pub event_type: EventType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub data: EventData,
    #[serde(default)]
    pub source: Option<EventSource>,
    #[serde(default)]
    pub metadata: Option<EventMetadata>,
    #[serde(default = "default_true")]
    pub is_public: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CreateEventRequest {
    /// Minimal request; payload, metadata and tags take their defaults
    pub fn new(
        property_id: impl Into<String>,
        event_type: EventType,
        title: impl Into<String>,
        description: impl Into<String>,
        source: EventSource,
    ) -> Self {
        Self {
            property_id: property_id.into(),
            event_type,
            title: title.into(),
            description: description.into(),
            data: EventData::default(),
            source: Some(source),
            metadata: None,
            is_public: true,
            tags: Vec::new(),
        }
    }

    pub fn with_data(mut self, data: EventData) -> Self {
        self.data = data;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn private(mut self) -> Self {
        self.is_public = false;
        self
    }
}

/// Partial update of an existing event's mutable fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Partial payload under the event's existing payload tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.data.is_none()
            && self.is_public.is_none()
            && self.tags.is_none()
    }
}
