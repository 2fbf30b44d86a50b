//! Logging infrastructure for Lip Sync.
//!
//! This module provides:
//! - Global `tracing` subscriber setup honouring `RUST_LOG`
//! - Optional daily-rolling log files via `tracing-appender`
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use lipsync_core::logging::{init_tracing, LogLevel};
//!
//! // Keep the guard alive for the life of the program so file logs flush.
//! let _guard = init_tracing(LogLevel::Info, Some(Path::new(".logs")));
//! tracing::info!("ready");
//! ```

mod types;

pub use types::LogLevel;

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// File name prefix for rolling log files.
pub const LOG_FILE_PREFIX: &str = "lipsync.log";

/// Initialize global tracing subscriber for application-wide logging.
///
/// This sets up a subscriber that:
/// - Respects RUST_LOG environment variable
/// - Falls back to the provided default level
/// - Outputs to stderr
/// - Also writes to a daily-rolling file in `log_dir`, if given
///
/// Should be called once at application startup. The returned guard must be
/// held until exit when file logging is enabled.
pub fn init_tracing(default_level: LogLevel, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_filter_str()));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}
