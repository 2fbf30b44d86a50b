//! Lip Sync command line entry point.
//!
//! Usage:
//!   lipsync text PBMFV --mode predictive
//!   lipsync audio speech.wav --tool /opt/rhubarb/rhubarb --format timeline
//!   lipsync timing "hello how are you"
//!   lipsync init-config --mode predictive --tool /opt/rhubarb/rhubarb

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

use lipsync_core::config::{ConfigManager, ConfigSection};
use lipsync_core::logging::init_tracing;
use lipsync_core::timeline::{render_timeline, TimelineFormat};
use lipsync_core::{LipSyncEngine, Mode};

#[derive(Parser, Debug)]
#[command(name = "lipsync", version, about = "Convert text and audio into viseme sequences")]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, global = true, default_value = "lipsync.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Map a string of phoneme symbols to visemes.
    ///
    /// Every character is looked up as its own phoneme key, so pass
    /// single-letter symbols from the viseme map (e.g. "PBM"), not English
    /// words. Characters with no map entry become "sil".
    Text {
        /// Phoneme symbols, one per character.
        text: String,
        /// Mapping mode: simple or predictive (defaults to the configured mode).
        #[arg(long)]
        mode: Option<String>,
    },
    /// Extract a viseme timeline from an audio file with Rhubarb.
    Audio {
        /// Audio file to analyze.
        audio: PathBuf,
        /// Rhubarb executable (overrides the configured path).
        #[arg(long)]
        tool: Option<PathBuf>,
        /// Where Rhubarb writes its timeline (defaults next to the audio file).
        #[arg(long)]
        output: Option<PathBuf>,
        /// Output format: json, timeline or raw.
        #[arg(long, default_value = "json")]
        format: String,
    },
    /// Generate a low-fidelity timed phoneme preview for text.
    Timing {
        /// Text to time.
        text: String,
    },
    /// Write a default config file if none exists, then persist any given values.
    InitConfig {
        /// Mapping mode to store: simple, predictive or rhubarb.
        #[arg(long)]
        mode: Option<String>,
        /// Rhubarb executable to store.
        #[arg(long)]
        tool: Option<PathBuf>,
        /// Rhubarb timeout to store, in seconds.
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        timeout: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut manager = ConfigManager::new(&cli.config);
    if let Command::InitConfig {
        mode,
        tool,
        timeout,
    } = &cli.command
    {
        init_config(&mut manager, mode.as_deref(), tool.as_deref(), *timeout)
            .with_context(|| format!("Failed to initialize {}", cli.config.display()))?;
    } else if cli.config.exists() {
        manager
            .load()
            .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    }
    let settings = manager.settings();

    let log_dir = (!settings.paths.log_dir.is_empty()).then(|| Path::new(&settings.paths.log_dir));
    let _guard = init_tracing(settings.logging.level, log_dir);

    tracing::info!("Lip Sync v{} starting", lipsync_core::version());

    let engine = LipSyncEngine::from_settings(settings);
    let base_config = settings.mode_config();

    let response = match cli.command {
        Command::Text { text, mode } => {
            let mode: Mode = match mode {
                Some(name) => name.parse()?,
                None => base_config.mode(),
            };
            anyhow::ensure!(
                mode.maps_phonemes(),
                "Invalid mode: {}. Must be 'simple' or 'predictive'",
                mode
            );

            let config = base_config.with_mode(mode);
            let mapping = engine.process_text(&text, &config)?;
            json!({
                "success": true,
                "input_text": text,
                "phonemes": mapping.phonemes,
                "visemes": mapping.visemes,
                "mode": mode,
            })
        }
        Command::Audio {
            audio,
            tool,
            output,
            format,
        } => {
            let format: TimelineFormat = format.parse()?;
            let mut config = base_config;
            if let Some(tool) = tool {
                config = config
                    .with_tool_path(&tool)
                    .with_context(|| format!("Invalid tool path {}", tool.display()))?;
            }
            let config = config.with_mode(Mode::Rhubarb);

            let events = engine
                .process_audio_file(&audio, output.as_deref(), &config)
                .with_context(|| format!("Failed to process {}", audio.display()))?;
            render_timeline(&events, format)
        }
        Command::Timing { text } => {
            let phonemes = engine.generate_phoneme_timing(&text);
            json!({
                "text": text,
                "phonemes": phonemes,
            })
        }
        Command::InitConfig { .. } => json!({
            "success": true,
            "config": manager.path().display().to_string(),
            "mode": settings.mapping.mode,
            "tool_path": settings.rhubarb.tool_path,
            "timeout_secs": settings.rhubarb.timeout_secs,
        }),
    };

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

/// Create the config file if needed and store the given values, touching only
/// the sections that change.
fn init_config(
    manager: &mut ConfigManager,
    mode: Option<&str>,
    tool: Option<&Path>,
    timeout_secs: Option<u64>,
) -> Result<()> {
    manager.load_or_create()?;

    if let Some(mode) = mode {
        manager.settings_mut().mapping.mode = mode.parse::<Mode>()?;
        manager.update_section(ConfigSection::Mapping)?;
    }

    if tool.is_some() || timeout_secs.is_some() {
        let rhubarb = &mut manager.settings_mut().rhubarb;
        if let Some(tool) = tool {
            anyhow::ensure!(
                tool.exists(),
                "Rhubarb executable not found at: {}",
                tool.display()
            );
            rhubarb.tool_path = tool.display().to_string();
        }
        if let Some(secs) = timeout_secs {
            rhubarb.timeout_secs = secs;
        }
        manager.update_section(ConfigSection::Rhubarb)?;
    }

    Ok(())
}
