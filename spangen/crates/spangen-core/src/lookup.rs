//! Closed-form size lookup for the default scheme
//!
//! The allocator maps a request to a class without searching: fine sizes by
//! dividing by the alignment, coarse sizes by the position of the highest set
//! bit. [`SizeMap`] is that mapping, derived from the same configuration as the
//! table, so the two can be checked against each other.

use crate::config::SizeClassConfig;

/// Request size to class index and rounded block size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeMap {
    min_alignment: u64,
    max_fine_shift: u32,
    max_small_shift: u32,
    fine_classes: usize,
}

impl SizeMap {
    pub fn new(config: &SizeClassConfig) -> Self {
        Self {
            min_alignment: config.min_alignment,
            max_fine_shift: config.max_fine_shift,
            max_small_shift: config.max_small_shift,
            fine_classes: config.fine_classes(),
        }
    }

    /// Class index serving `size`, or `None` past the largest class.
    pub fn class_index(&self, size: u64) -> Option<usize> {
        if size <= 1 << self.max_fine_shift {
            return Some(size.div_ceil(self.min_alignment) as usize);
        }
        if size <= 1 << self.max_small_shift {
            let shift = floor_log2(size - 1) - self.max_fine_shift;
            return Some(shift as usize + self.fine_classes + 1);
        }
        None
    }

    /// Object size a request of `size` bytes is rounded up to.
    pub fn block_size(&self, size: u64) -> Option<u64> {
        if size <= 1 << self.max_fine_shift {
            let mask = self.min_alignment - 1;
            return Some((size + mask) & !mask);
        }
        if size <= 1 << self.max_small_shift {
            return Some(1 << (floor_log2(size - 1) + 1));
        }
        None
    }
}

/// Index of the highest set bit; `value` must be non-zero
fn floor_log2(value: u64) -> u32 {
    debug_assert!(value != 0);
    u64::BITS - 1 - value.leading_zeros()
}
