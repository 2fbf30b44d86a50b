//! Phoneme timing synthesizer.
//!
//! Produces timed phoneme events from free text when no audio analysis is
//! available, for text-driven previews. This is a placeholder heuristic, not a
//! phonetic analyzer: a handful of words have hand-written pronunciations and
//! everything else is spelled out one character per event.
//!
//! ```text
//! "hello you"
//! HH 0.0-0.1  EH 0.1-0.2  L 0.2-0.3  OW 0.3-0.4   (gap to 0.5)
//! Y  0.5-0.6  UW 0.6-0.7                          (gap to 0.8)
//! ```

use crate::models::TimedPhonemeEvent;

/// Duration of each synthetic per-character phoneme, in seconds.
pub const FALLBACK_PHONEME_SECS: f64 = 0.1;

/// Clock advance after every word, in seconds.
pub const WORD_GAP_SECS: f64 = 0.1;

/// Characters stripped from both ends of a word before lookup.
const WORD_PUNCTUATION: &[char] = &['.', ',', '!', '?'];

/// Known pronunciations as `(phoneme, duration)` lists.
fn word_phonemes(word: &str) -> Option<&'static [(&'static str, f64)]> {
    let phonemes: &'static [(&'static str, f64)] = match word {
        "hello" => &[("HH", 0.1), ("EH", 0.1), ("L", 0.1), ("OW", 0.1)],
        "how" => &[("HH", 0.1), ("AW", 0.1)],
        "are" => &[("AA", 0.1), ("R", 0.1)],
        "you" => &[("Y", 0.1), ("UW", 0.1)],
        _ => return None,
    };
    Some(phonemes)
}

/// Synthesize timed phonemes for whitespace-separated words in `text`.
///
/// Known words (case-insensitive, surrounding `.,!?` ignored) emit their listed
/// phonemes; unknown words emit one uppercase event per character of the raw
/// word, each [`FALLBACK_PHONEME_SECS`] long. The clock then advances by
/// [`WORD_GAP_SECS`] before the next word.
pub fn synthesize_timing(text: &str) -> Vec<TimedPhonemeEvent> {
    let mut events = Vec::new();
    let mut clock = 0.0_f64;

    for word in text.split_whitespace() {
        let key = word.to_lowercase();
        let key = key.trim_matches(WORD_PUNCTUATION);

        match word_phonemes(key) {
            Some(phonemes) => {
                for &(phoneme, duration) in phonemes {
                    events.push(TimedPhonemeEvent::new(phoneme, clock, clock + duration));
                    clock += duration;
                }
            }
            None => {
                for c in word.chars() {
                    let phoneme: String = c.to_uppercase().collect();
                    events.push(TimedPhonemeEvent::new(
                        phoneme,
                        clock,
                        clock + FALLBACK_PHONEME_SECS,
                    ));
                    clock += FALLBACK_PHONEME_SECS;
                }
            }
        }

        clock += WORD_GAP_SECS;
    }

    tracing::debug!("Synthesized {} timed phonemes ({:.3}s)", events.len(), clock);
    events
}
