//! Mapping error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading the viseme map.
///
/// Only [`VisemeMap::try_load`](super::VisemeMap::try_load) surfaces these;
/// [`VisemeMap::load`](super::VisemeMap::load) logs them and yields an empty map.
#[derive(Error, Debug)]
pub enum MappingError {
    /// The map file could not be read.
    #[error("Failed to read viseme map '{path}': {source}")]
    MapRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The map file is not a flat JSON object of string → string.
    #[error("Malformed viseme map '{path}': {source}")]
    MapParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for mapping operations.
pub type MappingResult<T> = Result<T, MappingError>;
