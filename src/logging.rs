//! Console and rolling-file tracing for the presence daemon.
//!
//! Files go to `<data_local_dir>/deadlock-rpc/logs/deadlock-rpc.log.<date>` and are pruned
//! after a week. `RUST_LOG` overrides the built-in filter.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "deadlock-rpc.log";
const LOG_RETENTION: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// The daemon's own modules follow `--verbose`; the IPC and HTTP crates stay quiet unless
/// they have something to warn about.
fn default_filter(verbose: bool) -> String {
    let own = if verbose { "debug" } else { "info" };
    let discord = if verbose { "info" } else { "warn" };
    format!(
        "warn,deadlock_rpc={own},discord_sdk={discord},tiny_http=warn,hyper=warn,reqwest=warn"
    )
}

fn log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("deadlock-rpc")
        .join("logs")
}

/// Installs the global subscriber. The returned guard flushes the file writer on drop and
/// must live as long as `main`.
pub fn init_logging(verbose: bool) -> WorkerGuard {
    let log_dir = log_directory();
    let dir_error = std::fs::create_dir_all(&log_dir).err();

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX));

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(verbose))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_thread_names(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(file_writer),
        )
        .init();

    if let Some(e) = dir_error {
        tracing::warn!("Could not create log directory {}: {}", log_dir.display(), e);
    }
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        dir = %log_dir.display(),
        "deadlock-rpc starting"
    );

    let removed = prune_logs(&log_dir, SystemTime::now(), LOG_RETENTION);
    if removed > 0 {
        tracing::debug!("Pruned {} old log file(s)", removed);
    }

    guard
}

fn is_rotated_log(filename: &str) -> bool {
    filename.starts_with(LOG_FILE_PREFIX) && filename != LOG_FILE_PREFIX
}

/// Deletes dated log files last modified before `now - retention`. Returns how many went.
fn prune_logs(log_dir: &Path, now: SystemTime, retention: Duration) -> usize {
    let Some(cutoff) = now.checked_sub(retention) else {
        return 0;
    };

    let entries = match std::fs::read_dir(log_dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Skipping log cleanup, cannot read {}: {}", log_dir.display(), e);
            return 0;
        }
    };

    entries
        .flatten()
        .filter(|entry| entry.file_name().to_str().is_some_and(is_rotated_log))
        .filter(|entry| {
            entry
                .metadata()
                .and_then(|m| m.modified())
                .is_ok_and(|modified| modified < cutoff)
        })
        .filter(|entry| match std::fs::remove_file(entry.path()) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to remove {}: {}", entry.path().display(), e);
                false
            }
        })
        .count()
}
