//! Tracing subscriber setup shared by the binaries.

use std::fs;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config;

const LOG_DIR: &str = "logs";

/// Installs the global subscriber: a daily rolling file under `logs/` and,
/// when `LOG_TO_STDOUT=true`, a coloured stdout layer.
///
/// The filter comes from `LOG_LEVEL` (e.g. `marker=debug`). Keep the returned
/// guard alive for the lifetime of the process or buffered lines are lost.
pub fn init_logging() -> WorkerGuard {
    fs::create_dir_all(LOG_DIR).ok();

    let file_appender = rolling::daily(LOG_DIR, config::log_file());
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let stdout_layer = config::log_to_stdout().then(|| {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_target(true)
    });

    let env_filter = EnvFilter::try_new(config::log_level())
        .unwrap_or_else(|_| EnvFilter::new("marker=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    guard
}
