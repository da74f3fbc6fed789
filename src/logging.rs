//! Structured logging to a file.
//!
//! The terminal belongs to the TUI, so events are written to a log file
//! only. The filter comes from `$COGNITIA_LOG` when set, otherwise from
//! `[logging] level`.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::AppConfig;
use crate::error::{AppError, Result};

pub const LOG_ENV: &str = "COGNITIA_LOG";

/// Install the global subscriber. Does nothing when logging is disabled.
pub fn init_logging(config: &AppConfig) -> Result<()> {
    if !config.logging_enabled() {
        return Ok(());
    }

    let filter = build_env_filter(config.log_level())?;
    let log_file = config.log_file();
    let file = open_log_file(&log_file)?;

    Registry::default()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_timer(ChronoUtc::rfc_3339())
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}

/// `$COGNITIA_LOG` wins over the configured level.
fn build_env_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return Ok(filter);
    }
    EnvFilter::try_new(level)
        .map_err(|e| AppError::Logging(format!("Invalid log level {:?}: {}", level, e)))
}

fn open_log_file(path: &Path) -> Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            AppError::Logging(format!("Failed to create log directory: {}", e))
        })?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| AppError::Logging(format!("Failed to open log file {:?}: {}", path, e)))
}
