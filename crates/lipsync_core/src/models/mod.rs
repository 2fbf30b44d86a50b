//! Data models shared across the engine.
//!
//! Phoneme and viseme symbols are opaque short strings; nothing beyond
//! equality is interpreted. The only reserved symbol is [`SILENCE_VISEME`].

mod events;

pub use events::{TimedPhonemeEvent, VisemeEvent};

/// Reserved silence/fallback viseme.
pub const SILENCE_VISEME: &str = "sil";
