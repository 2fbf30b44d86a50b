//! Timed event types produced by the timeline extractor and the timing synthesizer.

use serde::{Deserialize, Serialize};

/// A viseme starting at a point on the audio timeline.
///
/// Produced only by the timeline extractor, in file order (ascending timestamps
/// for well-formed tool output).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisemeEvent {
    /// Start time in seconds (non-negative).
    pub timestamp: f64,
    /// Viseme symbol as emitted by the analysis tool.
    pub viseme: String,
}

impl VisemeEvent {
    pub fn new(timestamp: f64, viseme: impl Into<String>) -> Self {
        Self {
            timestamp,
            viseme: viseme.into(),
        }
    }
}

/// A phoneme occupying `[start, end)` seconds.
///
/// Produced only by the timing synthesizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedPhonemeEvent {
    pub phoneme: String,
    pub start: f64,
    pub end: f64,
}

impl TimedPhonemeEvent {
    pub fn new(phoneme: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            phoneme: phoneme.into(),
            start,
            end,
        }
    }

    /// Length of the event in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viseme_event_serializes_with_field_names() {
        let event = VisemeEvent::new(1.25, "AA");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["timestamp"], 1.25);
        assert_eq!(json["viseme"], "AA");
    }

    #[test]
    fn timed_phoneme_duration() {
        let event = TimedPhonemeEvent::new("HH", 0.5, 0.6);
        assert!((event.duration() - 0.1).abs() < 1e-9);
    }
}
