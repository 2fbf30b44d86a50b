//! Mode controller.
//!
//! A [`Mode`] selects which mapping algorithm runs. It travels inside an
//! immutable [`ModeConfig`] that is passed into every engine call, together
//! with the external tool settings that `Rhubarb` mode needs. There is no
//! process-wide mode state, so one engine can serve concurrent callers that
//! each hold their own config.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::timeline::{TimelineError, TimelineResult};

/// Default upper bound for one external tool run.
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(300);

/// Mapping algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Direct 1:1 phoneme → viseme substitution.
    #[default]
    Simple,
    /// Simple mapping followed by the transition-weight smoothing pass.
    Predictive,
    /// Audio timeline extraction through the external analysis tool.
    Rhubarb,
}

impl Mode {
    /// All modes, in declaration order.
    pub const ALL: [Mode; 3] = [Mode::Simple, Mode::Predictive, Mode::Rhubarb];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Simple => "simple",
            Mode::Predictive => "predictive",
            Mode::Rhubarb => "rhubarb",
        }
    }

    /// Whether this mode maps phoneme sequences (as opposed to audio files).
    pub fn maps_phonemes(&self) -> bool {
        matches!(self, Mode::Simple | Mode::Predictive)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised mode name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid mode '{0}': must be one of simple, predictive, rhubarb")]
pub struct InvalidModeError(pub String);

impl FromStr for Mode {
    type Err = InvalidModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(Mode::Simple),
            "predictive" => Ok(Mode::Predictive),
            "rhubarb" => Ok(Mode::Rhubarb),
            other => Err(InvalidModeError(other.to_string())),
        }
    }
}

/// Immutable per-call configuration: selected mode plus external tool settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeConfig {
    mode: Mode,
    tool_path: Option<PathBuf>,
    tool_timeout: Duration,
    extra_args: Vec<String>,
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Simple,
            tool_path: None,
            tool_timeout: DEFAULT_TOOL_TIMEOUT,
            extra_args: Vec::new(),
        }
    }
}

impl ModeConfig {
    /// Start from `Simple` mode with no tool configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a mode.
    ///
    /// Always succeeds. Selecting `Rhubarb` before a tool path is set only
    /// warns, since the path may still be supplied afterwards.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        if mode == Mode::Rhubarb && self.tool_path.is_none() {
            tracing::warn!("Rhubarb mode selected but Rhubarb path not set");
        }
        tracing::debug!("Lip sync mode set to: {}", mode);
        self.mode = mode;
        self
    }

    /// Set the external analysis tool, failing if the executable is missing.
    pub fn with_tool_path(mut self, path: impl Into<PathBuf>) -> TimelineResult<Self> {
        let path = path.into();
        if !path.exists() {
            return Err(TimelineError::ToolNotFound(path));
        }
        tracing::debug!("Rhubarb path set to: {}", path.display());
        self.tool_path = Some(path);
        Ok(self)
    }

    /// Set the tool path without checking that it exists.
    ///
    /// Used when building from settings; the extractor re-checks at call time.
    pub(crate) fn with_tool_path_unchecked(mut self, path: Option<PathBuf>) -> Self {
        self.tool_path = path;
        self
    }

    /// Bound each external tool run.
    ///
    /// A zero timeout would kill every run at its first poll, so it is
    /// ignored and the current timeout stays in place.
    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        if timeout.is_zero() {
            tracing::warn!(
                "Ignoring zero tool timeout, keeping {:.1}s",
                self.tool_timeout.as_secs_f64()
            );
        } else {
            self.tool_timeout = timeout;
        }
        self
    }

    /// Extra arguments passed to the tool before the audio path.
    pub fn with_extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn tool_path(&self) -> Option<&Path> {
        self.tool_path.as_deref()
    }

    pub fn tool_timeout(&self) -> Duration {
        self.tool_timeout
    }

    pub fn extra_args(&self) -> &[String] {
        &self.extra_args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn initial_state_is_simple() {
        let config = ModeConfig::new();
        assert_eq!(config.mode(), Mode::Simple);
        assert!(config.tool_path().is_none());
        assert_eq!(config.tool_timeout(), DEFAULT_TOOL_TIMEOUT);
    }

    #[test]
    fn parses_known_modes() {
        for mode in Mode::ALL {
            assert_eq!(mode.as_str().parse::<Mode>().unwrap(), mode);
        }
    }

    #[test]
    fn rejects_unknown_mode() {
        let err = "smooth".parse::<Mode>().unwrap_err();
        assert_eq!(err, InvalidModeError("smooth".to_string()));
        assert!(err.to_string().contains("smooth"));
    }

    #[test]
    fn mode_names_are_case_sensitive() {
        assert!("Simple".parse::<Mode>().is_err());
    }

    #[test]
    fn rhubarb_without_tool_is_allowed() {
        let config = ModeConfig::new().with_mode(Mode::Rhubarb);
        assert_eq!(config.mode(), Mode::Rhubarb);
        assert!(config.tool_path().is_none());
    }

    #[test]
    fn tool_path_must_exist() {
        let result = ModeConfig::new().with_tool_path("/nonexistent/rhubarb");
        assert!(matches!(result, Err(TimelineError::ToolNotFound(_))));
    }

    #[test]
    fn tool_path_accepted_when_present() {
        let tool = NamedTempFile::new().unwrap();
        let config = ModeConfig::new()
            .with_tool_path(tool.path())
            .unwrap()
            .with_mode(Mode::Rhubarb);
        assert_eq!(config.tool_path(), Some(tool.path()));
    }

    #[test]
    fn switching_modes_keeps_tool_settings() {
        let config = ModeConfig::new()
            .with_extra_args(["--recognizer", "phonetic"])
            .with_mode(Mode::Predictive)
            .with_mode(Mode::Simple);
        assert_eq!(config.mode(), Mode::Simple);
        assert_eq!(config.extra_args(), ["--recognizer", "phonetic"]);
    }

    #[test]
    fn zero_tool_timeout_keeps_previous() {
        let config = ModeConfig::new().with_tool_timeout(Duration::ZERO);
        assert_eq!(config.tool_timeout(), DEFAULT_TOOL_TIMEOUT);

        let config = config
            .with_tool_timeout(Duration::from_secs(5))
            .with_tool_timeout(Duration::ZERO);
        assert_eq!(config.tool_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn mode_serializes_lowercase() {
        let json = serde_json::to_string(&Mode::Predictive).unwrap();
        assert_eq!(json, "\"predictive\"");
    }
}
