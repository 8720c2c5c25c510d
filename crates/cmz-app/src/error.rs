//! Error types for the cmz-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates and
/// provides a unified error interface for frontends.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Grid error: {0}")]
    Grid(String),

    #[error("Extraction failed: {0}")]
    Extract(String),

    #[error("Table error: {0}")]
    Tables(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for cmz-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<cmz_grid::GridError> for AppError {
    fn from(err: cmz_grid::GridError) -> Self {
        AppError::Grid(err.to_string())
    }
}

impl From<cmz_extract::ExtractError> for AppError {
    fn from(err: cmz_extract::ExtractError) -> Self {
        AppError::Extract(err.to_string())
    }
}

impl From<cmz_tables::TablesError> for AppError {
    fn from(err: cmz_tables::TablesError) -> Self {
        AppError::Tables(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Config(err.to_string())
    }
}
