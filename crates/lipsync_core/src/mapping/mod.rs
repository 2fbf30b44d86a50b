//! Phoneme → viseme mapping.
//!
//! This module provides:
//! - [`VisemeMap`]: the static lookup table, loaded once with a degrade-to-silence policy
//! - [`TransitionWeightTable`]: pairwise co-articulation weights derived from the map
//! - [`map_simple`]: independent per-symbol lookup
//! - [`map_predictive`]: simple mapping plus one smoothing pass over repeated visemes
//! - [`tokenize_phonemes`]: splits free text into phoneme symbols
//!
//! # Example
//!
//! ```
//! use lipsync_core::mapping::{map_predictive, map_simple, TransitionWeightTable, VisemeMap};
//!
//! let map: VisemeMap = [("HH", "AA"), ("EH", "EE")].into_iter().collect();
//! let weights = TransitionWeightTable::build(&map);
//!
//! assert_eq!(map_simple(&map, &["HH", "HH", "EH"]), ["AA", "AA", "EE"]);
//! assert_eq!(map_predictive(&map, &weights, &["HH", "HH", "EH"]), ["AA", "AA", "EE"]);
//! ```

mod error;
mod predictive;
mod simple;
mod tokenize;
mod transitions;
mod viseme_map;

pub use error::{MappingError, MappingResult};
pub use predictive::{map_predictive, smooth_repeats, REPEAT_DROP_THRESHOLD};
pub use simple::map_simple;
pub use tokenize::tokenize_phonemes;
pub use transitions::{TransitionOverride, TransitionWeightTable, BUILTIN_OVERRIDES, DEFAULT_WEIGHT};
pub use viseme_map::VisemeMap;
