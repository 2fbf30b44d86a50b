//! Static phoneme → viseme table.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use super::error::{MappingError, MappingResult};
use crate::models::SILENCE_VISEME;

/// Immutable phoneme → viseme lookup table.
///
/// A missing key is not an error: [`lookup`](Self::lookup) falls back to
/// [`SILENCE_VISEME`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisemeMap {
    entries: HashMap<String, String>,
}

impl VisemeMap {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    /// Parse a flat JSON object (`{"HH": "AA", ...}`).
    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        let entries: HashMap<String, String> = serde_json::from_str(content)?;
        Ok(Self { entries })
    }

    /// Load the map from a JSON file, surfacing read and parse failures.
    pub fn try_load(path: &Path) -> MappingResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| MappingError::MapRead {
            path: path.to_path_buf(),
            source,
        })?;

        let map = Self::from_json_str(&content).map_err(|source| MappingError::MapParse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!(
            "Loaded viseme map from {} ({} phonemes, {} visemes)",
            path.display(),
            map.len(),
            map.visemes().len()
        );
        Ok(map)
    }

    /// Load the map, degrading to an empty table on any failure.
    ///
    /// With an empty table every lookup yields silence, so a misconfigured
    /// map silences the output instead of failing the caller.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(map) => map,
            Err(e) => {
                tracing::error!("Error loading static map: {}", e);
                Self::default()
            }
        }
    }

    /// Viseme for `phoneme`, or `"sil"` when unmapped.
    pub fn lookup(&self, phoneme: &str) -> &str {
        self.get(phoneme).unwrap_or(SILENCE_VISEME)
    }

    /// Viseme for `phoneme` if the table has one.
    pub fn get(&self, phoneme: &str) -> Option<&str> {
        self.entries.get(phoneme).map(String::as_str)
    }

    /// Distinct visemes appearing as values, in sorted order.
    pub fn visemes(&self) -> BTreeSet<&str> {
        self.entries.values().map(String::as_str).collect()
    }

    /// Number of mapped phonemes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for VisemeMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
