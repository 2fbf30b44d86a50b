//! Audio timeline extraction through an external analysis tool.
//!
//! This module provides:
//! - [`TimelineExtractor`]: runs the tool (Rhubarb Lip Sync) on an audio file
//!   and parses the text timeline it writes
//! - [`parse_timeline`]: the line parser for `<timestamp> <viseme>` output
//! - [`TimelineFormat`] / [`render_timeline`]: output shapes for callers
//!
//! Tool failures are always reported as [`TimelineError`]; an `Ok` with no
//! events means the tool ran and produced nothing.
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//! use lipsync_core::ModeConfig;
//! use lipsync_core::timeline::TimelineExtractor;
//!
//! let config = ModeConfig::new().with_tool_path("/opt/rhubarb/rhubarb")?;
//! let extractor = TimelineExtractor::from_config(&config)?;
//! let events = extractor.extract(Path::new("speech.wav"), None)?;
//! # Ok::<(), lipsync_core::timeline::TimelineError>(())
//! ```

mod error;
mod extractor;
mod format;
mod parser;
mod runner;

pub use error::{TimelineError, TimelineResult};
pub use extractor::{default_output_path, TimelineExtractor, RHUBARB_EXPORT_FORMAT};
pub use format::{render_timeline, render_timeline_text, InvalidFormatError, TimelineFormat};
pub use parser::{parse_timeline, parse_timeline_file, parse_timeline_line};
