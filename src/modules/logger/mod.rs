// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::logger::file::setup_file_logger;
use crate::modules::settings::cli::SETTINGS;
use chrono::Local;
use std::process;
use tracing::Level;
use tracing_subscriber::fmt::{format::Writer, time::FormatTime};
use tracing_subscriber::EnvFilter;

mod file;

struct LocalTimer;

#[derive(Debug)]
pub enum LoggerError {
    Appender(tracing_appender::rolling::InitError),
    Subscriber(tracing::dispatcher::SetGlobalDefaultError),
}

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z"))
    }
}

pub fn initialize_logging() {
    let level = validate_log_level(&SETTINGS.forwarder_log_level);
    let result = if SETTINGS.forwarder_log_to_file {
        setup_file_logger(level)
    } else {
        setup_stdout_logger(level)
    };
    if let Err(e) = result {
        eprintln!("Failed to initialize logging: {:#?}", e);
        process::exit(1);
    }
}

/// `RUST_LOG` wins over the configured level when it is set.
fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy()
}

fn setup_stdout_logger(level: Level) -> Result<(), LoggerError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_ansi(SETTINGS.forwarder_ansi_logs)
        .with_timer(LocalTimer)
        .with_level(true)
        .with_target(true)
        .with_writer(std::io::stdout);

    let result = if SETTINGS.forwarder_json_logs {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    result.map_err(LoggerError::Subscriber)
}

fn validate_log_level(value: &str) -> Level {
    match value.parse::<Level>() {
        Ok(level) => level,
        Err(_) => {
            eprintln!(
                "Invalid log level specified. Use one of: error, warn, info, debug, trace. 
        The log level you currently specified is 'forwarder_log_level'='{}'",
                value
            );
            process::exit(1);
        }
    }
}
