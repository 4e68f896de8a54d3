//! Timeline export
//!
//! A timeline is rendered in full (no pagination) and serialized as JSON,
//! CSV or a minimal PDF document.

mod csv;
mod pdf;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{HistoryError, HistoryResult};
use crate::types::{PropertyTimeline, TimelineFilters};

pub use self::csv::{to_csv, CSV_HEADER};
pub use self::pdf::to_pdf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
    Pdf,
}

impl ExportFormat {
    /// Parse a format name, case-insensitively
    pub fn parse(name: &str) -> HistoryResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "pdf" => Ok(ExportFormat::Pdf),
            _ => Err(HistoryError::UnsupportedFormat(name.to_string())),
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
            ExportFormat::Pdf => "application/pdf",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = HistoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// What to export. `format` stays a string so unknown names reach the
/// service and are reported as `UnsupportedFormat`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    pub format: String,
    #[serde(default)]
    pub filters: TimelineFilters,
}

impl ExportOptions {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            filters: TimelineFilters::default(),
        }
    }

    pub fn with_filters(mut self, filters: TimelineFilters) -> Self {
        self.filters = filters;
        self
    }
}

/// Serialized timeline with its declared content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedTimeline {
    pub content_type: &'static str,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ExportedTimeline {
    /// Body as text; PDF output is ASCII so this is lossless for every format
    pub fn as_text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Property id reduced to characters safe inside a quoted header filename
fn file_stem(property_id: &str) -> String {
    property_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Serialize `timeline` as `format`
pub fn export(timeline: &PropertyTimeline, format: ExportFormat) -> HistoryResult<ExportedTimeline> {
    let bytes = match format {
        ExportFormat::Json => serde_json::to_vec_pretty(timeline)
            .map_err(|e| HistoryError::Internal(format!("serializing timeline: {}", e)))?,
        ExportFormat::Csv => to_csv(timeline).into_bytes(),
        ExportFormat::Pdf => to_pdf(timeline),
    };

    Ok(ExportedTimeline {
        content_type: format.content_type(),
        file_name: format!(
            "property-{}-timeline.{}",
            file_stem(&timeline.property_id),
            format.extension()
        ),
        bytes,
    })
}
