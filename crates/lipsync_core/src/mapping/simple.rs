//! Direct 1:1 phoneme → viseme substitution.

use super::viseme_map::VisemeMap;

/// Map each phoneme independently; unmapped symbols become `"sil"`.
///
/// The output always has the same length as the input.
pub fn map_simple<S: AsRef<str>>(map: &VisemeMap, phonemes: &[S]) -> Vec<String> {
    phonemes
        .iter()
        .map(|p| map.lookup(p.as_ref()).to_string())
        .collect()
}
