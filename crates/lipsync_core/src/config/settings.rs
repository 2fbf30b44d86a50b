//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use std::path::PathBuf;
use std::time::Duration;

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::logging::LogLevel;
use crate::mapping::TransitionOverride;
use crate::mode::{Mode, ModeConfig};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Input and output locations.
    #[serde(default)]
    pub paths: PathSettings,

    /// Mapping algorithm selection.
    #[serde(default)]
    pub mapping: MappingSettings,

    /// External analysis tool.
    #[serde(default)]
    pub rhubarb: RhubarbSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Settings {
    /// Per-call mode configuration built from these settings.
    ///
    /// The tool path is not checked here; extraction checks it when it runs.
    pub fn mode_config(&self) -> ModeConfig {
        let tool_path = (!self.rhubarb.tool_path.is_empty())
            .then(|| PathBuf::from(&self.rhubarb.tool_path));

        ModeConfig::new()
            .with_tool_path_unchecked(tool_path)
            .with_tool_timeout(Duration::from_secs(self.rhubarb.timeout_secs))
            .with_extra_args(self.rhubarb.extra_args.iter().cloned())
            .with_mode(self.mapping.mode)
    }
}

/// Path configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Phoneme → viseme map (flat JSON object).
    #[serde(default = "default_viseme_map")]
    pub viseme_map: String,

    /// Folder for rolling log files (empty disables file logging).
    #[serde(default)]
    pub log_dir: String,
}

fn default_viseme_map() -> String {
    "assets/static_viseme_map.json".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            viseme_map: default_viseme_map(),
            log_dir: String::new(),
        }
    }
}

/// Mapping configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingSettings {
    /// Algorithm used when none is requested explicitly.
    #[serde(default)]
    pub mode: Mode,

    /// Extra transition weights applied after the built-in ones.
    #[serde(default)]
    pub transition_overrides: Vec<TransitionOverride>,
}

/// External tool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RhubarbSettings {
    /// Path to the Rhubarb executable (empty = not configured).
    #[serde(default)]
    pub tool_path: String,

    /// Kill the tool after this many seconds. Must be at least 1.
    #[serde(
        default = "default_timeout_secs",
        deserialize_with = "deserialize_timeout_secs"
    )]
    pub timeout_secs: u64,

    /// Extra arguments passed before the audio path.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

fn default_timeout_secs() -> u64 {
    300
}

fn deserialize_timeout_secs<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = u64::deserialize(deserializer)?;
    if secs == 0 {
        return Err(de::Error::invalid_value(
            de::Unexpected::Unsigned(0),
            &"a timeout of at least 1 second",
        ));
    }
    Ok(secs)
}

impl Default for RhubarbSettings {
    fn default() -> Self {
        Self {
            tool_path: String::new(),
            timeout_secs: default_timeout_secs(),
            extra_args: Vec::new(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default level when RUST_LOG is not set.
    #[serde(default)]
    pub level: LogLevel,
}

/// Names of config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Paths,
    Mapping,
    Rhubarb,
    Logging,
}

impl ConfigSection {
    /// All sections, in file order.
    pub const ALL: [ConfigSection; 4] = [
        ConfigSection::Paths,
        ConfigSection::Mapping,
        ConfigSection::Rhubarb,
        ConfigSection::Logging,
    ];

    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "paths",
            ConfigSection::Mapping => "mapping",
            ConfigSection::Rhubarb => "rhubarb",
            ConfigSection::Logging => "logging",
        }
    }

    /// Comment written above the section header.
    pub fn description(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "Input and output locations",
            ConfigSection::Mapping => "Phoneme to viseme mapping",
            ConfigSection::Rhubarb => "External audio analysis tool (Rhubarb Lip Sync)",
            ConfigSection::Logging => "Logging configuration",
        }
    }
}
