//! Free text → phoneme symbols.

/// Split text into one phoneme symbol per character.
///
/// Every character is kept, whitespace included. IPA affricates such as `ʧ`
/// and `ʤ` are single characters and come out as single symbols.
pub fn tokenize_phonemes(text: &str) -> Vec<String> {
    text.chars().map(String::from).collect()
}
