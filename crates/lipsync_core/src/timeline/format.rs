//! Output shapes for an extracted timeline.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::models::VisemeEvent;

/// How a timeline is handed back to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineFormat {
    /// List of `{"timestamp", "viseme"}` objects.
    #[default]
    Json,
    /// One `"<seconds:.3> <viseme>"` line per event.
    Timeline,
    /// List of `[timestamp, viseme]` pairs.
    Raw,
}

impl TimelineFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimelineFormat::Json => "json",
            TimelineFormat::Timeline => "timeline",
            TimelineFormat::Raw => "raw",
        }
    }
}

impl std::fmt::Display for TimelineFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised output format name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid output format '{0}': must be one of json, timeline, raw")]
pub struct InvalidFormatError(pub String);

impl FromStr for TimelineFormat {
    type Err = InvalidFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(TimelineFormat::Json),
            "timeline" => Ok(TimelineFormat::Timeline),
            "raw" => Ok(TimelineFormat::Raw),
            other => Err(InvalidFormatError(other.to_string())),
        }
    }
}

/// Render events as timeline text, one `"<t:.3> <viseme>"` line each.
pub fn render_timeline_text(events: &[VisemeEvent]) -> String {
    events
        .iter()
        .map(|e| format!("{:.3} {}", e.timestamp, e.viseme))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render events into the response document for `format`.
pub fn render_timeline(events: &[VisemeEvent], format: TimelineFormat) -> Value {
    match format {
        TimelineFormat::Json => json!({
            "success": true,
            "viseme_data": events,
        }),
        TimelineFormat::Timeline => json!({
            "success": true,
            "timeline": render_timeline_text(events),
        }),
        TimelineFormat::Raw => {
            let pairs: Vec<(f64, &str)> = events
                .iter()
                .map(|e| (e.timestamp, e.viseme.as_str()))
                .collect();
            json!({
                "success": true,
                "viseme_data": pairs,
            })
        }
    }
}
