use crate::modules::logger::{env_filter, LocalTimer, LoggerError};
use crate::modules::settings::cli::SETTINGS;
use std::sync::OnceLock;
use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;

pub static LOG_WORKER_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

pub fn setup_file_logger(level: Level) -> Result<(), LoggerError> {
    let (server_nonb, server_guard) = server_log_writer().map_err(LoggerError::Appender)?;
    let _ = LOG_WORKER_GUARD.set(server_guard);

    let server_layer = fmt::layer()
        .with_timer(LocalTimer)
        .with_ansi(SETTINGS.forwarder_ansi_logs)
        .with_level(true)
        .with_writer(server_nonb)
        .with_target(true);

    let registry = tracing_subscriber::registry().with(env_filter(level));

    let result = if SETTINGS.forwarder_json_logs {
        tracing::subscriber::set_global_default(registry.with(server_layer.json()))
    } else {
        tracing::subscriber::set_global_default(registry.with(server_layer))
    };
    result.map_err(LoggerError::Subscriber)
}

fn server_log_writer(
) -> Result<(NonBlocking, WorkerGuard), tracing_appender::rolling::InitError> {
    let rolling = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("forwarder")
        .max_log_files(SETTINGS.forwarder_max_server_log_files)
        .build(&SETTINGS.forwarder_log_dir)?;
    Ok(tracing_appender::non_blocking(rolling))
}
