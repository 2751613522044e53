//! Error types and error handling for the Mojifinder service.
//!
//! This module defines the process-level error types. Failures inside a
//! single client session are handled by `server::session::SessionError`
//! and never surface here.

use std::net::SocketAddr;
use thiserror::Error;

/// Result type alias for Mojifinder operations
pub type Result<T> = std::result::Result<T, FinderError>;

/// Main error type for the Mojifinder service
#[derive(Error, Debug)]
pub enum FinderError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid index data at line {line}: {message}")]
    IndexData { line: usize, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl FinderError {
    /// Check if the listening endpoint could not be acquired
    pub fn is_bind_error(&self) -> bool {
        matches!(self, FinderError::Bind { .. } | FinderError::InvalidAddress(_))
    }

    /// Check if this is a configuration problem (bad file or bad value)
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            FinderError::ConfigError(_) | FinderError::TomlError(_)
        )
    }
}
