//! Error types for spangen-emit

use spangen_core::SizeClassError;
use thiserror::Error;

/// Error type for header rendering
#[derive(Debug, Error)]
pub enum EmitError {
    /// A quantity could not be resolved to a literal
    #[error(transparent)]
    Table(#[from] SizeClassError),

    /// A render option would produce an unusable header
    #[error("Invalid render option `{option}`: {reason}")]
    InvalidOption { option: &'static str, reason: String },

    /// Writing into the output buffer failed
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),
}

impl EmitError {
    pub(crate) fn option(option: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option,
            reason: reason.into(),
        }
    }
}

/// Result type alias for rendering operations
pub type Result<T> = std::result::Result<T, EmitError>;
