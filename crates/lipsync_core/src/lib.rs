//! Lip Sync Core - phoneme to viseme engine
//!
//! This crate contains the mapping and smoothing engine with zero CLI dependencies:
//! - Static phoneme → viseme table and the transition weight model
//! - Simple (1:1) and predictive (smoothed) mapping
//! - Timeline extraction through an external analysis tool (Rhubarb)
//! - Low-fidelity phoneme timing synthesis for text previews
//!
//! # Example
//!
//! ```no_run
//! use lipsync_core::{LipSyncEngine, Mode, ModeConfig};
//!
//! let engine = LipSyncEngine::load("assets/static_viseme_map.json");
//! let config = ModeConfig::new().with_mode(Mode::Predictive);
//! let visemes = engine.process_phonemes(&["HH", "EH", "L", "OW"], &config).unwrap();
//! println!("{:?}", visemes);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod mapping;
pub mod mode;
pub mod models;
pub mod timeline;
pub mod timing;

pub use engine::{LipSyncEngine, TextMapping};
pub use error::{LipSyncError, LipSyncResult};
pub use mode::{InvalidModeError, Mode, ModeConfig};
pub use models::{TimedPhonemeEvent, VisemeEvent, SILENCE_VISEME};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
