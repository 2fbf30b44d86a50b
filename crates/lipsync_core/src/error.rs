//! Top-level error type for engine operations.
//!
//! Errors from each layer convert into [`LipSyncError`] with `?`:
//! Config / Mapping / Timeline → LipSyncError

use thiserror::Error;

use crate::config::ConfigError;
use crate::mapping::MappingError;
use crate::mode::{InvalidModeError, Mode};
use crate::timeline::{InvalidFormatError, TimelineError};

/// Error returned by [`LipSyncEngine`](crate::LipSyncEngine) operations.
#[derive(Error, Debug)]
pub enum LipSyncError {
    /// Unrecognised mode name.
    #[error(transparent)]
    InvalidMode(#[from] InvalidModeError),

    /// Unrecognised timeline output format.
    #[error(transparent)]
    InvalidFormat(#[from] InvalidFormatError),

    /// Audio processing was requested outside `Rhubarb` mode.
    #[error("Audio file processing requires Rhubarb mode (current mode: {0})")]
    AudioRequiresRhubarb(Mode),

    /// Phoneme mapping was requested in `Rhubarb` mode.
    #[error("Rhubarb mode maps audio files; use process_audio_file instead")]
    RhubarbRequiresAudio,

    /// Viseme map loading failed.
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// Timeline extraction failed.
    #[error("Timeline error: {0}")]
    Timeline(#[from] TimelineError),

    /// Configuration file error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for engine operations.
pub type LipSyncResult<T> = Result<T, LipSyncError>;
