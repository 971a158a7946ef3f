//! spangen-emit - Size-Class Header Rendering
//!
//! Turns an assembled [`SizeClassTable`](spangen_core::SizeClassTable) into
//! the header an allocator includes: one macro expanding, through line
//! continuations, to a record invocation per class.
//!
//! # Example
//!
//! ```rust
//! use spangen_core::{SizeClassConfig, SizeClassTable};
//! use spangen_emit::{HeaderWriter, RenderOptions};
//!
//! let table = SizeClassTable::default_table(&SizeClassConfig::default()).unwrap();
//! let options = RenderOptions::default();
//! let text = HeaderWriter::new(&options)
//!     .render(&table, "size_classes_raw.h")
//!     .unwrap();
//! assert!(text.contains("#ifndef SIZE_CLASSES_RAW_H_"));
//! assert!(text.contains("  SIZE_CLASS(0, 0, 0, 0) /* NOLINT */ \\"));
//! ```

pub mod error;
pub mod header;
pub mod options;
pub mod render;

pub use error::{EmitError, Result};
pub use header::HeaderWriter;
pub use options::{RenderOptions, RenderStyle, SymbolNames};
pub use render::FieldRenderer;
