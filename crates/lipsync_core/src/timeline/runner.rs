//! Low-level external tool runner with a timeout.

use std::ffi::OsString;
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use super::error::{TimelineError, TimelineResult};

/// How often the child is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Run `program` with `args`, blocking until it exits or `timeout` elapses.
///
/// Stdout is discarded; stderr is captured for the error report. A timed-out
/// child is killed and reaped before returning. Processes the tool leaves
/// behind may keep stderr open; the call still returns by the deadline, with
/// whatever stderr arrived by then.
pub(super) fn run_tool(program: &Path, args: &[OsString], timeout: Duration) -> TimelineResult<()> {
    let tool = tool_name(program);

    tracing::debug!(
        "Running: {} {}",
        program.display(),
        args.iter()
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    );

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| TimelineError::Spawn {
            tool: tool.clone(),
            source,
        })?;

    // Drain stderr on a separate thread so a chatty tool cannot block on a full pipe.
    // The buffer comes back over a channel so waiting for it stays bounded by the deadline.
    let stderr_rx = child.stderr.take().map(|mut stderr| {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = String::new();
            let _ = stderr.read_to_string(&mut buf);
            let _ = tx.send(buf);
        });
        rx
    });

    let start = Instant::now();
    let deadline = start + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                if status.success() {
                    tracing::debug!("{} finished in {:.2}s", tool, start.elapsed().as_secs_f64());
                    return Ok(());
                }

                let stderr = stderr_rx
                    .and_then(|rx| {
                        rx.recv_timeout(deadline.saturating_duration_since(Instant::now()))
                            .ok()
                    })
                    .unwrap_or_default();
                let exit_code = status.code().unwrap_or(-1);
                tracing::error!("{} process error (exit code {})", tool, exit_code);
                if !stderr.trim().is_empty() {
                    tracing::error!("Stderr: {}", stderr.trim());
                }
                return Err(TimelineError::ToolFailed {
                    tool,
                    exit_code,
                    stderr: stderr.trim().to_string(),
                });
            }
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    tracing::error!("{} timed out after {:.1}s", tool, timeout.as_secs_f64());
                    return Err(TimelineError::TimedOut { tool, timeout });
                }
                thread::sleep(POLL_INTERVAL.min(deadline.saturating_duration_since(Instant::now())));
            }
            Err(source) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(TimelineError::Spawn { tool, source });
            }
        }
    }
}

/// File name of the tool for messages, falling back to the full path.
fn tool_name(program: &Path) -> String {
    program
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.display().to_string())
}
