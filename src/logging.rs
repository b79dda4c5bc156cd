// src/logging.rs
// The terminal is in raw mode on the alternate screen, so logs go to a file.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::state::{AppConfig, AppError, AppResult};

pub fn init(config: &AppConfig) -> AppResult<()> {
    let file = OpenOptions::new().create(true).append(true).open(&config.log_path)?;
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}
