//! The lip sync engine.
//!
//! [`LipSyncEngine`] owns the viseme map and the transition weight table
//! derived from it. Both are read-only after construction; the per-call
//! [`ModeConfig`] decides which algorithm runs. The engine is `Send + Sync`
//! and can be shared across worker threads as-is.
//!
//! Operations offered to the request-handling layer:
//! - text → visemes ([`process_text`](LipSyncEngine::process_text))
//! - audio → viseme timeline ([`process_audio_file`](LipSyncEngine::process_audio_file))
//! - text → timed phoneme preview ([`generate_phoneme_timing`](LipSyncEngine::generate_phoneme_timing))

use std::path::Path;

use serde::Serialize;

use crate::config::Settings;
use crate::error::{LipSyncError, LipSyncResult};
use crate::mapping::{
    map_predictive, map_simple, tokenize_phonemes, TransitionOverride, TransitionWeightTable,
    VisemeMap,
};
use crate::mode::{Mode, ModeConfig};
use crate::models::{TimedPhonemeEvent, VisemeEvent};
use crate::timeline::TimelineExtractor;
use crate::timing::synthesize_timing;

/// Result of mapping free text: the phoneme tokens and their visemes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextMapping {
    pub phonemes: Vec<String>,
    pub visemes: Vec<String>,
}

/// Phoneme → viseme engine.
#[derive(Debug, Clone, Default)]
pub struct LipSyncEngine {
    map: VisemeMap,
    weights: TransitionWeightTable,
    overrides: Vec<TransitionOverride>,
}

impl LipSyncEngine {
    /// Engine over `map` with the built-in transition overrides.
    pub fn new(map: VisemeMap) -> Self {
        Self::with_overrides(map, Vec::new())
    }

    /// Engine over `map` with extra transition overrides applied after the built-ins.
    pub fn with_overrides(map: VisemeMap, overrides: Vec<TransitionOverride>) -> Self {
        let weights = TransitionWeightTable::build_with_overrides(&map, &overrides);
        Self {
            map,
            weights,
            overrides,
        }
    }

    /// Engine over a map file; an unreadable map yields an engine that maps
    /// everything to silence.
    pub fn load(map_path: impl AsRef<Path>) -> Self {
        Self::new(VisemeMap::load(map_path.as_ref()))
    }

    /// Engine configured from settings (map path and extra overrides).
    pub fn from_settings(settings: &Settings) -> Self {
        let map = VisemeMap::load(Path::new(&settings.paths.viseme_map));
        Self::with_overrides(map, settings.mapping.transition_overrides.clone())
    }

    /// Reload the map and rebuild the weight table from it.
    pub fn reload_map(&mut self, map_path: impl AsRef<Path>) {
        self.map = VisemeMap::load(map_path.as_ref());
        self.weights = TransitionWeightTable::build_with_overrides(&self.map, &self.overrides);
    }

    pub fn map(&self) -> &VisemeMap {
        &self.map
    }

    pub fn weights(&self) -> &TransitionWeightTable {
        &self.weights
    }

    /// Direct 1:1 mapping.
    pub fn map_simple<S: AsRef<str>>(&self, phonemes: &[S]) -> Vec<String> {
        map_simple(&self.map, phonemes)
    }

    /// Mapping with repeat smoothing.
    pub fn map_predictive<S: AsRef<str>>(&self, phonemes: &[S]) -> Vec<String> {
        map_predictive(&self.map, &self.weights, phonemes)
    }

    /// Map phonemes with the algorithm selected by `config`.
    ///
    /// `Rhubarb` mode works on audio, not phonemes, and is rejected here.
    pub fn process_phonemes<S: AsRef<str>>(
        &self,
        phonemes: &[S],
        config: &ModeConfig,
    ) -> LipSyncResult<Vec<String>> {
        match config.mode() {
            Mode::Simple => Ok(self.map_simple(phonemes)),
            Mode::Predictive => Ok(self.map_predictive(phonemes)),
            Mode::Rhubarb => Err(LipSyncError::RhubarbRequiresAudio),
        }
    }

    /// Tokenize free text into phonemes and map them.
    pub fn process_text(&self, text: &str, config: &ModeConfig) -> LipSyncResult<TextMapping> {
        let phonemes = tokenize_phonemes(text);
        let visemes = self.process_phonemes(phonemes.as_slice(), config)?;
        tracing::debug!(
            "Mapped {} phonemes to {} visemes ({} mode)",
            phonemes.len(),
            visemes.len(),
            config.mode()
        );
        Ok(TextMapping { phonemes, visemes })
    }

    /// Extract a timestamped viseme timeline from an audio file.
    ///
    /// Requires `Rhubarb` mode and a configured tool path. `output_path` is
    /// where the tool writes its timeline (defaults next to the audio file).
    pub fn process_audio_file(
        &self,
        audio_path: &Path,
        output_path: Option<&Path>,
        config: &ModeConfig,
    ) -> LipSyncResult<Vec<VisemeEvent>> {
        if config.mode() != Mode::Rhubarb {
            return Err(LipSyncError::AudioRequiresRhubarb(config.mode()));
        }
        let extractor = TimelineExtractor::from_config(config)?;
        Ok(extractor.extract(audio_path, output_path)?)
    }

    /// Low-fidelity timed phoneme preview for text.
    pub fn generate_phoneme_timing(&self, text: &str) -> Vec<TimedPhonemeEvent> {
        synthesize_timing(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::TimelineError;
    use std::fs;
    use tempfile::tempdir;

    fn engine() -> LipSyncEngine {
        LipSyncEngine::new([("HH", "AA"), ("EH", "EE")].into_iter().collect())
    }

    #[test]
    fn engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LipSyncEngine>();
    }

    #[test]
    fn dispatches_on_mode() {
        let engine = LipSyncEngine::with_overrides(
            [("HH", "AA"), ("EH", "EE")].into_iter().collect(),
            vec![TransitionOverride::new("AA", "EE", 2.0)],
        );
        let input = ["HH", "HH", "EH"];

        let simple = engine.process_phonemes(&input, &ModeConfig::new()).unwrap();
        assert_eq!(simple, ["AA", "AA", "EE"]);

        let predictive = engine
            .process_phonemes(&input, &ModeConfig::new().with_mode(Mode::Predictive))
            .unwrap();
        assert_eq!(predictive, ["AA", "EE"]);
    }

    #[test]
    fn rhubarb_mode_rejects_phonemes() {
        let config = ModeConfig::new().with_mode(Mode::Rhubarb);
        let result = engine().process_phonemes(&["HH"], &config);
        assert!(matches!(result, Err(LipSyncError::RhubarbRequiresAudio)));
    }

    #[test]
    fn audio_requires_rhubarb_mode() {
        let config = ModeConfig::new().with_mode(Mode::Predictive);
        let result = engine().process_audio_file(Path::new("speech.wav"), None, &config);
        assert!(matches!(
            result,
            Err(LipSyncError::AudioRequiresRhubarb(Mode::Predictive))
        ));
    }

    #[test]
    fn audio_without_tool_is_not_configured() {
        let config = ModeConfig::new().with_mode(Mode::Rhubarb);
        let result = engine().process_audio_file(Path::new("speech.wav"), None, &config);
        assert!(matches!(
            result,
            Err(LipSyncError::Timeline(TimelineError::ToolNotConfigured))
        ));
    }

    #[test]
    fn text_is_tokenized_per_character() {
        let engine = LipSyncEngine::new([("a", "AA"), ("b", "PP")].into_iter().collect());
        let mapping = engine.process_text("ab c", &ModeConfig::new()).unwrap();
        assert_eq!(mapping.phonemes, ["a", "b", " ", "c"]);
        assert_eq!(mapping.visemes, ["AA", "PP", "sil", "sil"]);
    }

    #[test]
    fn reload_rebuilds_weights() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("map.json");
        fs::write(&path, r#"{"P": "PP", "AA": "AA"}"#).unwrap();

        let mut engine = LipSyncEngine::default();
        assert!(engine.weights().is_empty());

        engine.reload_map(&path);
        assert_eq!(engine.map().len(), 2);
        assert_eq!(engine.weights().weight("PP", "AA"), 2.0);
        assert!(engine.weights().contains("AA"));
    }

    #[test]
    fn unreadable_map_maps_to_silence() {
        let engine = LipSyncEngine::load("/nonexistent/map.json");
        assert_eq!(engine.map_simple(&["HH", "EH"]), ["sil", "sil"]);
    }

    #[test]
    fn timing_preview_delegates() {
        assert_eq!(engine().generate_phoneme_timing("hello").len(), 4);
    }
}
