//! Configuration management for Lip Sync.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only changed section is modified)
//! - Defaults for every missing field
//!
//! # Example
//!
//! ```no_run
//! use lipsync_core::config::{ConfigManager, ConfigSection};
//! use lipsync_core::Mode;
//!
//! let mut config = ConfigManager::new("lipsync.toml");
//! config.load_or_create().unwrap();
//!
//! println!("Viseme map: {}", config.settings().paths.viseme_map);
//!
//! config.settings_mut().mapping.mode = Mode::Predictive;
//! config.update_section(ConfigSection::Mapping).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    ConfigSection, LoggingSettings, MappingSettings, PathSettings, RhubarbSettings, Settings,
};
