//! Timeline extraction error types.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while extracting a viseme timeline.
#[derive(Error, Debug)]
pub enum TimelineError {
    /// No external tool path has been configured.
    #[error("Rhubarb path not set")]
    ToolNotConfigured,

    /// The configured tool path does not exist.
    #[error("Rhubarb executable not found at: {}", .0.display())]
    ToolNotFound(PathBuf),

    /// The input audio file does not exist.
    #[error("Audio file not found: {}", .0.display())]
    AudioFileNotFound(PathBuf),

    /// The tool could not be started.
    #[error("Failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// The tool exited with a non-zero status.
    #[error("{tool} exited with code {exit_code}: {stderr}")]
    ToolFailed {
        tool: String,
        exit_code: i32,
        stderr: String,
    },

    /// The tool did not finish in time and was killed.
    #[error("{tool} timed out after {}s", .timeout.as_secs_f64())]
    TimedOut { tool: String, timeout: Duration },

    /// The timeline file could not be read back.
    #[error("Failed to read timeline '{path}': {source}")]
    OutputRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TimelineError {
    /// Whether the tool itself failed (as opposed to a missing precondition).
    pub fn is_tool_failure(&self) -> bool {
        matches!(
            self,
            TimelineError::Spawn { .. }
                | TimelineError::ToolFailed { .. }
                | TimelineError::TimedOut { .. }
                | TimelineError::OutputRead { .. }
        )
    }
}

/// Result type for timeline operations.
pub type TimelineResult<T> = Result<T, TimelineError>;
