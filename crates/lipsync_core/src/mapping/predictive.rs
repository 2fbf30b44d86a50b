//! Predictive mapping: simple mapping plus a single smoothing pass.
//!
//! The pass walks the simple-mapped sequence left to right. A viseme that
//! repeats the previously emitted one is dropped when the transition from it
//! into the following viseme is strong (weight above [`REPEAT_DROP_THRESHOLD`]):
//! the repeat is treated as an artifact of a mouth shape that is about to
//! move on anyway.
//!
//! ```text
//! weights: AA -> EE = 2.0
//! simple:      AA  AA  EE
//! predictive:  AA      EE
//! ```
//!
//! The first element is always kept, and so is a repeat in the last
//! position, since it has no lookahead.

use super::simple::map_simple;
use super::transitions::TransitionWeightTable;
use super::viseme_map::VisemeMap;
use crate::models::SILENCE_VISEME;

/// A repeat is dropped only when the lookahead weight is strictly above this.
pub const REPEAT_DROP_THRESHOLD: f64 = 1.5;

/// Map phonemes and smooth repeated visemes.
///
/// Output length is at most the input length.
pub fn map_predictive<S: AsRef<str>>(
    map: &VisemeMap,
    weights: &TransitionWeightTable,
    phonemes: &[S],
) -> Vec<String> {
    let visemes = map_simple(map, phonemes);
    smooth_repeats(&visemes, weights)
}

/// The smoothing pass over an already-mapped viseme sequence.
pub fn smooth_repeats<S: AsRef<str>>(visemes: &[S], weights: &TransitionWeightTable) -> Vec<String> {
    let mut smoothed = Vec::with_capacity(visemes.len());
    let mut previous = SILENCE_VISEME;

    for (i, viseme) in visemes.iter().enumerate() {
        let viseme = viseme.as_ref();

        if i > 0 && viseme == previous {
            if let Some(next) = visemes.get(i + 1) {
                let weight = weights.weight(previous, next.as_ref());
                if weight > REPEAT_DROP_THRESHOLD {
                    continue;
                }
            }
        }

        smoothed.push(viseme.to_string());
        previous = viseme;
    }

    smoothed
}
