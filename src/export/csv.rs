//! CSV rendering

use chrono::SecondsFormat;

use crate::types::{HistoryEvent, PropertyTimeline};

pub const CSV_HEADER: &str = "Date,Type,Title,Description,Source,Tags";

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn row(event: &HistoryEvent) -> String {
    [
        event.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        event.event_type.as_str().to_string(),
        event.title.clone(),
        event.description.clone(),
        event.source.name.clone(),
        event.tags.join(";"),
    ]
    .iter()
    .map(|v| quote(v))
    .collect::<Vec<_>>()
    .join(",")
}

/// Header plus one row per event, rows separated by `\n` with no trailing newline
pub fn to_csv(timeline: &PropertyTimeline) -> String {
    std::iter::once(CSV_HEADER.to_string())
        .chain(timeline.events.iter().map(|e| row(&e.event)))
        .collect::<Vec<_>>()
        .join("\n")
}
