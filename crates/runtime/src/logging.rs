//! File logging for embedders.
//!
//! The simulation crates only emit `tracing` events. Hosts call [`init`] once
//! at startup to route them to `shadow.log`; filtering follows `RUST_LOG` with
//! `info` as the floor.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::{Result, RuntimeError};

const LOG_FILE: &str = "shadow.log";

/// Default log directory.
///
/// - Linux: `~/.cache/shadow-pact/logs`
/// - macOS: `~/Library/Caches/shadow-pact/logs`
/// - Windows: `%LOCALAPPDATA%\shadow-pact\cache\logs`
pub fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "shadow-pact")
        .map(|dirs| dirs.cache_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("/tmp/shadow-pact/logs"))
}

/// Installs the global subscriber writing to `dir` (or [`log_dir`]).
///
/// Keep the returned guard alive for as long as logs should be flushed.
pub fn init(dir: Option<&Path>) -> Result<WorkerGuard> {
    let dir = dir.map(Path::to_path_buf).unwrap_or_else(log_dir);
    std::fs::create_dir_all(&dir)
        .map_err(|err| RuntimeError::Logging(format!("{}: {err}", dir.display())))?;

    let file_appender = tracing_appender::rolling::never(&dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .map_err(|err| RuntimeError::Logging(err.to_string()))?;

    tracing::info!(dir = %dir.display(), "logging initialized");
    Ok(guard)
}
