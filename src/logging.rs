//! Tracing setup. The terminal is owned by the renderer, so output goes to a
//! log file or nowhere.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::{Error, Result};

/// Installs the global subscriber. `RUST_LOG` wins over `config.level`.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let Some(path) = &config.file else {
        return Ok(());
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| Error::Logging(e.to_string()))?;

    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))
}
