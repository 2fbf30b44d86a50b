//! Timeline text parser.
//!
//! The analysis tool writes one event per line:
//! ```text
//! 0.00	X
//! 0.05	B
//! 0.27	C
//! ```
//!
//! A line contributes an event only if, after trimming, it starts with a
//! decimal number (ASCII digits, dot, ASCII digits), whitespace, then a word
//! token. Everything else is ignored.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::{TimelineError, TimelineResult};
use crate::models::VisemeEvent;

static EVENT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+\.[0-9]+)\s+(\w+)").expect("valid timeline regex"));

/// Parse a single line; `None` if it does not match the event format.
pub fn parse_timeline_line(line: &str) -> Option<VisemeEvent> {
    let caps = EVENT_LINE.captures(line.trim())?;
    let timestamp: f64 = caps[1].parse().ok()?;
    Some(VisemeEvent::new(timestamp, &caps[2]))
}

/// Parse timeline text into events, in file order.
pub fn parse_timeline(content: &str) -> Vec<VisemeEvent> {
    content.lines().filter_map(parse_timeline_line).collect()
}

/// Read and parse a timeline file.
pub fn parse_timeline_file(path: &Path) -> TimelineResult<Vec<VisemeEvent>> {
    let content = std::fs::read_to_string(path).map_err(|source| TimelineError::OutputRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_timeline(&content))
}
