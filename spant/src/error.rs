//! Error handling module for the spant CLI.
//!
//! This module provides custom error types using `thiserror` for structured
//! error handling throughout the application.

use spangen_core::SizeClassError;
use spangen_emit::EmitError;
use thiserror::Error;

/// Main error type for the spant CLI application.
///
/// Every variant is fatal: the run stops before the output file is touched,
/// or the temporary file is discarded.
#[derive(Error, Debug)]
pub enum SpantError {
    /// Error when the configuration cannot be found or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error when file operations fail.
    #[error("File operation failed: {0}")]
    FileOperation(String),

    /// Error when input validation fails.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Error when IO operations fail.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error when the size-class table cannot be generated.
    #[error("Table generation failed: {0}")]
    Table(#[from] SizeClassError),

    /// Error when the header cannot be rendered.
    #[error("Rendering failed: {0}")]
    Emit(#[from] EmitError),
}

/// Result type alias using SpantError.
pub type Result<T> = std::result::Result<T, SpantError>;
