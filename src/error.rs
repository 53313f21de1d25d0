//! Crate-wide error type.

use thiserror::Error;

/// Failures outside of gameplay itself. A crash into a pipe is not an error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid configuration: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, Error>;
