//! Transition weight table.
//!
//! Every ordered pair of visemes present in the map gets a weight, 1.0 by
//! default. A fixed list of overrides raises the weight for pairs that flow
//! naturally into each other (e.g. closed lips into an open vowel). The
//! predictive mapper reads these weights to decide whether a repeated viseme
//! should be collapsed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::viseme_map::VisemeMap;

/// Weight of any pair without an override.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Built-in co-articulation affinities as `(from, to, weight)`.
pub const BUILTIN_OVERRIDES: &[(&str, &str, f64)] = &[
    ("PP", "AA", 2.0),
    ("PP", "EE", 2.0),
    ("KK", "AA", 1.8),
    ("DD", "EE", 1.8),
    ("SS", "DD", 1.5),
    ("TH", "EE", 1.5),
    ("NN", "DD", 1.7),
    ("AX", "NN", 1.6),
];

/// A single weight override, as read from configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionOverride {
    pub from: String,
    pub to: String,
    pub weight: f64,
}

impl TransitionOverride {
    pub fn new(from: impl Into<String>, to: impl Into<String>, weight: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            weight,
        }
    }
}

/// Full pairwise weight matrix over the map's viseme set.
///
/// Invariant: every viseme in the source map is both a row and a column key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionWeightTable {
    weights: HashMap<String, HashMap<String, f64>>,
}

impl TransitionWeightTable {
    /// Build from the map's value set and apply the built-in overrides.
    pub fn build(map: &VisemeMap) -> Self {
        Self::build_with_overrides(map, &[])
    }

    /// Build with the built-in overrides followed by `extra` overrides.
    pub fn build_with_overrides(map: &VisemeMap, extra: &[TransitionOverride]) -> Self {
        let mut table = Self::uniform(map.visemes());

        for &(from, to, weight) in BUILTIN_OVERRIDES {
            table.apply_override(from, to, weight);
        }
        for o in extra {
            table.apply_override(&o.from, &o.to, o.weight);
        }

        tracing::debug!(
            "Built transition table for {} visemes ({} built-in, {} configured overrides)",
            table.len(),
            BUILTIN_OVERRIDES.len(),
            extra.len()
        );
        table
    }

    /// Table over `visemes` with every pair at [`DEFAULT_WEIGHT`].
    pub fn uniform<I, S>(visemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let visemes: Vec<String> = visemes.into_iter().map(Into::into).collect();
        let weights = visemes
            .iter()
            .map(|from| {
                let row = visemes
                    .iter()
                    .map(|to| (to.clone(), DEFAULT_WEIGHT))
                    .collect();
                (from.clone(), row)
            })
            .collect();
        Self { weights }
    }

    /// Set the weight of `from → to`.
    ///
    /// Returns `false` (and leaves the table unchanged) when either endpoint is
    /// not in the viseme set or the weight is not a positive finite number.
    pub fn apply_override(&mut self, from: &str, to: &str, weight: f64) -> bool {
        if !weight.is_finite() || weight <= 0.0 {
            tracing::warn!(
                "Ignoring transition override {} -> {}: weight {} is not positive",
                from,
                to,
                weight
            );
            return false;
        }

        match self.weights.get_mut(from).and_then(|row| row.get_mut(to)) {
            Some(slot) => {
                *slot = weight;
                true
            }
            None => {
                tracing::trace!("Skipping transition override {} -> {}: viseme not in map", from, to);
                false
            }
        }
    }

    /// Weight of `from → to`, [`DEFAULT_WEIGHT`] when either is unknown.
    pub fn weight(&self, from: &str, to: &str) -> f64 {
        self.get(from, to).unwrap_or(DEFAULT_WEIGHT)
    }

    /// Weight of `from → to` if both visemes are in the table.
    pub fn get(&self, from: &str, to: &str) -> Option<f64> {
        self.weights.get(from).and_then(|row| row.get(to)).copied()
    }

    pub fn contains(&self, viseme: &str) -> bool {
        self.weights.contains_key(viseme)
    }

    /// Number of visemes (rows).
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}
