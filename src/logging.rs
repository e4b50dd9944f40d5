//! Structured logging for recalc using the tracing crate.
//!
//! Both tools run full-screen in the terminal, so log output goes to a
//! daily-rotated file under the XDG state directory and never to stdout/stderr.

use crate::paths;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing_appender::rolling;
use tracing_subscriber::prelude::*;

/// File name prefix of every log file, rotated as `recalc.log.YYYY-MM-DD`.
pub const LOG_FILE_PREFIX: &str = "recalc.log";

/// Number of rotated log files kept on disk.
const MAX_LOG_FILES: usize = 7;

/// Keeps the non-blocking writer flushing for the lifetime of the process.
static APPENDER_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// Initializes file logging.
///
/// `RUST_LOG` takes precedence; otherwise `default_level` (from the `[logging]`
/// config section) is used.
///
/// # Errors
/// - If the log directory cannot be determined or created
/// - If logging was already initialized
pub fn init_logging(default_level: &str) -> anyhow::Result<()> {
    let log_dir = paths::log_dir()?;
    fs::create_dir_all(&log_dir)?;

    if let Err(e) = prune_old_logs(&log_dir, MAX_LOG_FILES) {
        eprintln!("Warning: Failed to clean up old logs: {e}");
    }

    let file_appender = rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    APPENDER_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Logging already initialized"))?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_ansi(false),
        )
        .init();

    tracing::debug!("Logging initialized in {}", log_dir.display());
    Ok(())
}

/// Returns true for rotated files like `recalc.log.2026-10-19`.
pub(crate) fn is_rotated_log(file_name: &str) -> bool {
    file_name
        .strip_prefix(LOG_FILE_PREFIX)
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|date| date.len() == 10 && date.matches('-').count() == 2)
}

/// Removes rotated log files beyond the `keep` most recently modified ones.
fn prune_old_logs(log_dir: &Path, keep: usize) -> anyhow::Result<usize> {
    let mut log_files: Vec<_> = fs::read_dir(log_dir)?
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            let file_name = path.file_name()?.to_string_lossy().to_string();
            if !is_rotated_log(&file_name) {
                return None;
            }
            let modified = fs::metadata(&path).ok()?.modified().ok()?;
            Some((path, modified))
        })
        .collect();

    // newest first
    log_files.sort_by(|a, b| b.1.cmp(&a.1));

    let mut removed = 0;
    for (path, _) in log_files.iter().skip(keep) {
        match fs::remove_file(path) {
            Ok(()) => removed += 1,
            Err(e) => tracing::warn!("Failed to delete old log file {}: {}", path.display(), e),
        }
    }

    Ok(removed)
}
