//! Generator Module - Size-Class Tiers
//!
//! Each tier turns its slice of the configuration into a run of classes.
//!
//! ## Tiers
//!
//! - **Fine**: `min_alignment` steps up to `max_fine_size`, fixed spans
//! - **Coarse**: doubling sizes up to `max_small_size`, fixed object counts
//! - **Huge**: an explicit size list sharing one huge-page span
//!
//! Fine and coarse together form the default table. Huge is its own table
//! and is never combined with the other two.

pub mod coarse;
pub mod fine;
pub mod huge;

pub use coarse::CoarseClassGenerator;
pub use fine::FineClassGenerator;
pub use huge::HugeClassGenerator;

use crate::class::{SizeClass, Tier};
use crate::error::Result;

/// A tier of consecutive size classes
pub trait ClassGenerator {
    /// Tier tag stamped on every generated class
    fn tier(&self) -> Tier;

    /// Number of classes the tier produces
    fn len(&self) -> usize;

    /// Whether the tier produces nothing
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Generate the tier, numbering classes from `first_index`.
    fn generate(&self, first_index: usize) -> Result<Vec<SizeClass>>;
}
