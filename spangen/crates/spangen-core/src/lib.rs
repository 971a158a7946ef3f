//! spangen-core - Size-Class Table Generation
//!
//! ============================================================================
//! MODULE OVERVIEW
//! ============================================================================
//!
//! A span-based allocator serves every small request from a pool of
//! fixed-size objects. The size-class table fixes, for each pool, the object
//! size, the size of the span that backs it and how many objects one span
//! holds. This crate computes that table offline; the allocator only indexes
//! into the result.
//!
//! TIERS:
//! ------
//! ```text
//!   index  0        1 ......... F        F+1 ............ F+C
//!        +----+--------------------+---------------------------+
//!        | 0  | 16, 32, ..., 256   | 512, 1K, 2K, ..., 2M      |
//!        +----+--------------------+---------------------------+
//!   sentinel   fine: +align steps   coarse: doubling
//!              fixed span sizes     fixed object counts
//! ```
//!
//! The huge-page table replaces both tiers with an explicit size list sharing
//! a single huge span.
//!
//! INVARIANTS (index >= 1):
//! ------------------------
//! - object sizes strictly increase
//! - `span_size % page_size == 0`
//! - `objects_per_span * object_size + header_size <= span_size`
//!
//! # Example
//!
//! ```rust
//! use spangen_core::{SizeClassConfig, SizeClassTable};
//!
//! let table = SizeClassTable::default_table(&SizeClassConfig::default()).unwrap();
//! assert_eq!(table.len(), 30);
//! assert_eq!(table.class_for(100).map(|c| c.object_size), Some(112));
//! ```

pub mod class;
pub mod config;
pub mod error;
pub mod expr;
pub mod generator;
pub mod lookup;
pub mod span;
pub mod summary;
pub mod table;

pub use class::{SizeClass, Tier};
pub use config::{HugePageConfig, SizeClassConfig};
pub use error::{Result, SizeClassError};
pub use expr::{BinOp, Bindings, Expr, Quantity, Symbol};
pub use generator::{ClassGenerator, CoarseClassGenerator, FineClassGenerator, HugeClassGenerator};
pub use lookup::SizeMap;
pub use span::{SpanLayout, SpanSizer};
pub use summary::TableSummary;
pub use table::{SizeClassTable, TableAssembler, Variant};
