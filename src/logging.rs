use std::fs;
use std::path::Path;

use once_cell::sync::OnceCell;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, EnvFilter};

use crate::errors::{LauncherError, Result};

const LOG_FILE_PREFIX: &str = "ember-launcher.log";

static LOG_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// Installs a daily-rolling file subscriber writing under `log_dir`.
///
/// Convenience for embedders that have no subscriber of their own; the
/// library itself only emits `tracing` events and works under any
/// subscriber the host installs instead.
pub fn init(log_dir: &Path) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,ember_launcher=debug"));
    init_with_filter(log_dir, filter)
}

pub fn init_with_filter(log_dir: &Path, filter: EnvFilter) -> Result<()> {
    fs::create_dir_all(log_dir)?;

    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);

    fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| LauncherError::Config(format!("logging already initialised: {err}")))
}
