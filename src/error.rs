//! Error handling for zone energy processing operations.
//!
//! Provides error types with context for file loading, CSV parsing,
//! selector parsing and configuration failures. Fill-mode downgrades are
//! not errors; they are reported through [`crate::diagnostics`].

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnergyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("File not found at path: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid measurement file: {path} - {reason}")]
    InvalidFormat { path: PathBuf, reason: String },

    #[error("Unknown aggregation period: {name}")]
    UnknownPeriod { name: String },

    #[error("Unknown fill mode: {name}")]
    UnknownFillMode { name: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl EnergyError {
    /// Create an invalid format error for a file
    pub fn invalid_format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EnergyError>;
