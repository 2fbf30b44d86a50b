//! Rhubarb Lip Sync invocation.
//!
//! Runs the tool in text export mode and parses the timeline it writes:
//! ```text
//! <tool> -o <output> --exportFormat txt [extra args...] <audio>
//! ```
//! Temporary files (the audio copy, the timeline file) belong to the caller;
//! the extractor only reads and writes the paths it is given.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::error::{TimelineError, TimelineResult};
use super::parser::parse_timeline_file;
use super::runner::run_tool;
use crate::mode::{ModeConfig, DEFAULT_TOOL_TIMEOUT};
use crate::models::VisemeEvent;

/// Export format requested from the tool.
pub const RHUBARB_EXPORT_FORMAT: &str = "txt";

/// Timeline path used when the caller does not supply one: the audio path
/// with its extension replaced by `.txt`.
pub fn default_output_path(audio_path: &Path) -> PathBuf {
    audio_path.with_extension(RHUBARB_EXPORT_FORMAT)
}

/// Configured external analysis tool.
#[derive(Debug, Clone)]
pub struct TimelineExtractor {
    tool_path: PathBuf,
    timeout: Duration,
    extra_args: Vec<String>,
}

impl TimelineExtractor {
    /// Create an extractor for the tool at `tool_path`.
    pub fn new(tool_path: impl Into<PathBuf>) -> Self {
        Self {
            tool_path: tool_path.into(),
            timeout: DEFAULT_TOOL_TIMEOUT,
            extra_args: Vec::new(),
        }
    }

    /// Build from a mode config, failing if no tool path is configured.
    pub fn from_config(config: &ModeConfig) -> TimelineResult<Self> {
        let tool_path = config.tool_path().ok_or(TimelineError::ToolNotConfigured)?;
        Ok(Self::new(tool_path)
            .with_timeout(config.tool_timeout())
            .with_extra_args(config.extra_args().iter().cloned()))
    }

    /// Bound each run; a zero timeout is ignored.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        if timeout.is_zero() {
            tracing::warn!("Ignoring zero timeout for {}", self.tool_path.display());
        } else {
            self.timeout = timeout;
        }
        self
    }

    pub fn with_extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn tool_path(&self) -> &Path {
        &self.tool_path
    }

    /// Arguments for one run, in invocation order.
    pub fn build_args(&self, audio_path: &Path, output_path: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-o".into(),
            output_path.as_os_str().to_os_string(),
            "--exportFormat".into(),
            RHUBARB_EXPORT_FORMAT.into(),
        ];
        args.extend(self.extra_args.iter().map(OsString::from));
        args.push(audio_path.as_os_str().to_os_string());
        args
    }

    /// Analyze `audio_path` and return its viseme timeline.
    ///
    /// `output_path` defaults to [`default_output_path`]. Preconditions are
    /// checked before the tool is started; any failure of the tool itself is
    /// returned as an error rather than an empty timeline.
    pub fn extract(
        &self,
        audio_path: &Path,
        output_path: Option<&Path>,
    ) -> TimelineResult<Vec<VisemeEvent>> {
        if !self.tool_path.exists() {
            return Err(TimelineError::ToolNotFound(self.tool_path.clone()));
        }
        if !audio_path.exists() {
            return Err(TimelineError::AudioFileNotFound(audio_path.to_path_buf()));
        }

        let output_path = output_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| default_output_path(audio_path));

        let args = self.build_args(audio_path, &output_path);
        run_tool(&self.tool_path, &args, self.timeout)?;

        let events = parse_timeline_file(&output_path)?;
        tracing::info!(
            "Extracted {} viseme events from {}",
            events.len(),
            audio_path.display()
        );
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn default_output_replaces_extension() {
        assert_eq!(
            default_output_path(Path::new("/tmp/speech.wav")),
            PathBuf::from("/tmp/speech.txt")
        );
        assert_eq!(
            default_output_path(Path::new("clip")),
            PathBuf::from("clip.txt")
        );
    }

    #[test]
    fn args_order() {
        let extractor = TimelineExtractor::new("rhubarb").with_extra_args(["-r", "phonetic"]);
        let args = extractor.build_args(Path::new("a.wav"), Path::new("a.txt"));
        let args: Vec<String> = args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            ["-o", "a.txt", "--exportFormat", "txt", "-r", "phonetic", "a.wav"]
        );
    }

    #[test]
    fn zero_timeout_keeps_default() {
        let extractor = TimelineExtractor::new("rhubarb").with_timeout(Duration::ZERO);
        assert_eq!(extractor.timeout, DEFAULT_TOOL_TIMEOUT);
    }

    #[test]
    fn requires_configured_tool() {
        let result = TimelineExtractor::from_config(&ModeConfig::new());
        assert!(matches!(result, Err(TimelineError::ToolNotConfigured)));
    }

    #[test]
    fn missing_audio_fails_before_invocation() {
        let tool = NamedTempFile::new().unwrap();
        let extractor = TimelineExtractor::new(tool.path());
        let result = extractor.extract(Path::new("/nonexistent/speech.wav"), None);
        assert!(matches!(result, Err(TimelineError::AudioFileNotFound(_))));
    }

    #[test]
    fn missing_tool_fails_before_invocation() {
        let dir = tempdir().unwrap();
        let audio = dir.path().join("speech.wav");
        std::fs::write(&audio, b"RIFF").unwrap();

        let extractor = TimelineExtractor::new("/nonexistent/rhubarb");
        let result = extractor.extract(&audio, None);
        assert!(matches!(result, Err(TimelineError::ToolNotFound(_))));
    }

    #[cfg(unix)]
    mod fake_tool {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        /// Write an executable shell script standing in for Rhubarb.
        /// `$2` is the output path, the last argument is the audio file.
        fn write_tool(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("fake-rhubarb");
            fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        fn audio_file(dir: &Path) -> PathBuf {
            let audio = dir.join("speech.wav");
            fs::write(&audio, b"RIFF").unwrap();
            audio
        }

        #[test]
        fn parses_tool_output() {
            let dir = tempdir().unwrap();
            let tool = write_tool(
                dir.path(),
                r#"printf '0.00\tX\n0.05\tB\n0.27\tC\n' > "$2""#,
            );
            let audio = audio_file(dir.path());

            let events = TimelineExtractor::new(&tool).extract(&audio, None).unwrap();
            assert_eq!(
                events,
                [
                    VisemeEvent::new(0.0, "X"),
                    VisemeEvent::new(0.05, "B"),
                    VisemeEvent::new(0.27, "C"),
                ]
            );
            assert!(dir.path().join("speech.txt").exists());
        }

        #[test]
        fn writes_to_supplied_output() {
            let dir = tempdir().unwrap();
            let tool = write_tool(dir.path(), r#"echo "1.250 AA" > "$2""#);
            let audio = audio_file(dir.path());
            let output = dir.path().join("timeline.out");

            let events = TimelineExtractor::new(&tool)
                .extract(&audio, Some(&output))
                .unwrap();
            assert_eq!(events, [VisemeEvent::new(1.25, "AA")]);
            assert!(output.exists());
        }

        #[test]
        fn zero_timeout_from_config_still_runs_tool() {
            let dir = tempdir().unwrap();
            let tool = write_tool(dir.path(), r#"echo "0.50 X" > "$2""#);
            let audio = audio_file(dir.path());

            let config = ModeConfig::new()
                .with_tool_path(&tool)
                .unwrap()
                .with_tool_timeout(Duration::ZERO);
            let events = TimelineExtractor::from_config(&config)
                .unwrap()
                .extract(&audio, None)
                .unwrap();
            assert_eq!(events, [VisemeEvent::new(0.5, "X")]);
        }

        #[test]
        fn zero_events_is_success() {
            let dir = tempdir().unwrap();
            let tool = write_tool(dir.path(), r#": > "$2""#);
            let audio = audio_file(dir.path());

            let events = TimelineExtractor::new(&tool).extract(&audio, None).unwrap();
            assert!(events.is_empty());
        }

        #[test]
        fn non_zero_exit_is_an_error() {
            let dir = tempdir().unwrap();
            let tool = write_tool(dir.path(), "echo 'unsupported audio' >&2\nexit 1");
            let audio = audio_file(dir.path());

            let err = TimelineExtractor::new(&tool)
                .extract(&audio, None)
                .unwrap_err();
            assert!(err.is_tool_failure());
            match err {
                TimelineError::ToolFailed { exit_code, stderr, .. } => {
                    assert_eq!(exit_code, 1);
                    assert_eq!(stderr, "unsupported audio");
                }
                other => panic!("expected ToolFailed, got {:?}", other),
            }
        }

        #[test]
        fn missing_timeline_is_an_error() {
            let dir = tempdir().unwrap();
            let tool = write_tool(dir.path(), "exit 0");
            let audio = audio_file(dir.path());

            let err = TimelineExtractor::new(&tool)
                .extract(&audio, None)
                .unwrap_err();
            assert!(matches!(err, TimelineError::OutputRead { .. }));
        }
    }
}
