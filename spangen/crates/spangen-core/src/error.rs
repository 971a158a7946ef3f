//! Error types for spangen-core
//!
//! Every failure the generators can hit is a configuration problem or an
//! arithmetic problem while resolving a span layout. Both are fatal: a table
//! is either produced whole or not at all.

use thiserror::Error;

use crate::expr::Symbol;

/// Error type for size-class generation and validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SizeClassError {
    /// A configuration field holds an unusable value
    #[error("Invalid configuration: `{field}` {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// The coarse object-count table does not cover every coarse class
    #[error("Coarse object table has {found} entries, expected {expected}")]
    CoarseCountMismatch { expected: usize, found: usize },

    /// A span cannot hold a single object after the header is subtracted
    #[error("Empty span: class {index} (size {object_size}) fits no object in {span_size} bytes")]
    EmptySpan {
        index: usize,
        object_size: u64,
        span_size: u64,
    },

    /// Objects plus header exceed the span
    #[error(
        "Overcommitted span: class {index} needs {needed} bytes, span has {span_size}"
    )]
    Overcommit {
        index: usize,
        needed: u64,
        span_size: u64,
    },

    /// Span size is not a whole number of pages
    #[error("Span of class {index} is {span_size} bytes, not a multiple of page size {page_size}")]
    UnalignedSpan {
        index: usize,
        span_size: u64,
        page_size: u64,
    },

    /// Object sizes must grow strictly from index 1 on
    #[error("Object size of class {index} ({object_size}) does not exceed its predecessor ({previous})")]
    NotIncreasing {
        index: usize,
        object_size: u64,
        previous: u64,
    },

    /// Indices must be 0, 1, 2, ... with no gaps
    #[error("Class at position {position} has index {index}")]
    IndexGap { position: usize, index: usize },

    /// The sentinel must be index 0 with every field zero
    #[error("Malformed sentinel class")]
    BadSentinel,

    /// A symbol was referenced without a numeric binding
    #[error("Unbound symbol: {0:?}")]
    UnboundSymbol(Symbol),

    /// Checked arithmetic overflowed or underflowed
    #[error("Arithmetic overflow while evaluating `{0}`")]
    Overflow(String),

    /// Integer division by zero
    #[error("Division by zero while evaluating `{0}`")]
    DivisionByZero(String),
}

impl SizeClassError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type alias for size-class operations
pub type Result<T> = std::result::Result<T, SizeClassError>;
