//! Configuration Module - Size-Class Scheme Parameters
//!
//! Every number that shapes the table lives here and is passed explicitly
//! into the generators. Nothing is read from global state, so alternative
//! schemes can be generated and tested side by side.
//!
//! Both structures load from TOML with per-field defaults, so a config file
//! only needs to name the values it changes.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SizeClassError};
use crate::expr::Bindings;

/// Target object counts for the coarse tier, largest batches first.
pub const DEFAULT_COARSE_OBJECTS: [u64; 13] = [64, 32, 16, 8, 8, 8, 8, 4, 4, 4, 4, 2, 1];

/// Object sizes of the huge-page table, sentinel excluded.
pub const DEFAULT_HUGE_OBJECT_SIZES: [u64; 22] = [
    16, 32, 48, 64, 80, 96, 112, 128, 144, 160, 176, 192, 208, 224, 240, 256, 512, 1024, 2048,
    4096, 8192, 16384,
];

/// Parameters of the default fine + coarse scheme
///
/// # Examples
///
/// ```rust
/// use spangen_core::SizeClassConfig;
///
/// let config = SizeClassConfig::default();
/// assert_eq!(config.max_fine_size(), 256);
/// assert_eq!(config.fine_classes(), 16);
/// assert_eq!(config.coarse_classes(), 13);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeClassConfig {
    /// Increment between fine classes; a power of two
    ///
    /// Default: 16 bytes
    #[serde(default = "default_min_alignment")]
    pub min_alignment: u64,

    /// Largest fine size as a shift (`1 << max_fine_shift`)
    ///
    /// Default: 8 (256 bytes)
    #[serde(default = "default_max_fine_shift")]
    pub max_fine_shift: u32,

    /// Largest coarse size as a shift (`1 << max_small_shift`)
    ///
    /// Default: 21 (2 MiB)
    #[serde(default = "default_max_small_shift")]
    pub max_small_shift: u32,

    /// OS page size in bytes; every span is a multiple of it
    ///
    /// Default: 4096
    #[serde(default = "default_page_size")]
    pub page_size: u64,

    /// Per-span header overhead in bytes
    ///
    /// The span header occupies three cache lines: read-only fields, the
    /// ownership word, and the thread-local free list.
    ///
    /// Default: 192
    #[serde(default = "default_header_size")]
    pub header_size: u64,

    /// Span size for the first half of the fine tier
    ///
    /// Default: 8 KiB
    #[serde(default = "default_fine_small_span")]
    pub fine_small_span: u64,

    /// Span size for the second half of the fine tier
    ///
    /// Default: 16 KiB
    #[serde(default = "default_fine_large_span")]
    pub fine_large_span: u64,

    /// Objects per span for each coarse class, in class order
    #[serde(default = "default_coarse_objects")]
    pub coarse_objects: Vec<u64>,
}

/// Parameters of the huge-page table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HugePageConfig {
    /// Span size shared by every class
    ///
    /// Default: 2 MiB
    #[serde(default = "default_huge_page_size")]
    pub huge_page_size: u64,

    /// Object sizes, strictly increasing, sentinel excluded
    #[serde(default = "default_huge_object_sizes")]
    pub object_sizes: Vec<u64>,
}

fn default_min_alignment() -> u64 {
    16
}

fn default_max_fine_shift() -> u32 {
    8
}

fn default_max_small_shift() -> u32 {
    21
}

fn default_page_size() -> u64 {
    4096
}

fn default_header_size() -> u64 {
    192
}

fn default_fine_small_span() -> u64 {
    1 << 13
}

fn default_fine_large_span() -> u64 {
    1 << 14
}

fn default_coarse_objects() -> Vec<u64> {
    DEFAULT_COARSE_OBJECTS.to_vec()
}

fn default_huge_page_size() -> u64 {
    1 << 21
}

fn default_huge_object_sizes() -> Vec<u64> {
    DEFAULT_HUGE_OBJECT_SIZES.to_vec()
}

impl Default for SizeClassConfig {
    fn default() -> Self {
        Self {
            min_alignment: default_min_alignment(),
            max_fine_shift: default_max_fine_shift(),
            max_small_shift: default_max_small_shift(),
            page_size: default_page_size(),
            header_size: default_header_size(),
            fine_small_span: default_fine_small_span(),
            fine_large_span: default_fine_large_span(),
            coarse_objects: default_coarse_objects(),
        }
    }
}

impl Default for HugePageConfig {
    fn default() -> Self {
        Self {
            huge_page_size: default_huge_page_size(),
            object_sizes: default_huge_object_sizes(),
        }
    }
}

impl SizeClassConfig {
    /// Largest object size served by the fine tier
    pub fn max_fine_size(&self) -> u64 {
        1 << self.max_fine_shift
    }

    /// Largest object size served by the coarse tier
    pub fn max_small_size(&self) -> u64 {
        1 << self.max_small_shift
    }

    /// Number of fine classes, sentinel excluded
    pub fn fine_classes(&self) -> usize {
        (self.max_fine_size() / self.min_alignment) as usize
    }

    /// Number of coarse classes
    pub fn coarse_classes(&self) -> usize {
        (self.max_small_shift - self.max_fine_shift) as usize
    }

    /// Total classes of the default table, sentinel included
    pub fn num_classes(&self) -> usize {
        1 + self.fine_classes() + self.coarse_classes()
    }

    /// First fine index served by `fine_large_span`.
    ///
    /// Half of the fine class count *including* the sentinel, truncated.
    /// With 16 fine classes that is 17 / 2 = 8: indices 1..=7 use the small
    /// span and 8..=16 the large one.
    pub fn fine_split_index(&self) -> usize {
        (self.fine_classes() + 1) / 2
    }

    /// Symbol bindings for resolving expressions of this scheme
    pub fn bindings(&self) -> Bindings {
        Bindings::new(self.header_size, self.page_size)
    }

    /// Check the scheme is internally consistent.
    pub fn validate(&self) -> Result<()> {
        if !self.min_alignment.is_power_of_two() {
            return Err(SizeClassError::invalid(
                "min_alignment",
                format!("must be a non-zero power of two, got {}", self.min_alignment),
            ));
        }
        if !self.page_size.is_power_of_two() {
            return Err(SizeClassError::invalid(
                "page_size",
                format!("must be a non-zero power of two, got {}", self.page_size),
            ));
        }
        if self.max_small_shift >= 64 {
            return Err(SizeClassError::invalid(
                "max_small_shift",
                format!("must be below 64, got {}", self.max_small_shift),
            ));
        }
        if self.max_small_shift <= self.max_fine_shift {
            return Err(SizeClassError::invalid(
                "max_small_shift",
                format!(
                    "must exceed max_fine_shift ({}), got {}",
                    self.max_fine_shift, self.max_small_shift
                ),
            ));
        }
        let max_fine = self.max_fine_size();
        if max_fine % self.min_alignment != 0 || max_fine < 2 * self.min_alignment {
            return Err(SizeClassError::invalid(
                "max_fine_shift",
                format!(
                    "fine size {} must be a multiple of at least twice min_alignment {}",
                    max_fine, self.min_alignment
                ),
            ));
        }
        self.check_span("fine_small_span", self.fine_small_span)?;
        self.check_span("fine_large_span", self.fine_large_span)?;
        self.check_fine_fit("fine_large_span", self.fine_large_span, max_fine)?;
        let last_small = (self.fine_split_index() as u64).saturating_sub(1) * self.min_alignment;
        self.check_fine_fit("fine_small_span", self.fine_small_span, last_small)?;

        if self.coarse_objects.len() != self.coarse_classes() {
            return Err(SizeClassError::CoarseCountMismatch {
                expected: self.coarse_classes(),
                found: self.coarse_objects.len(),
            });
        }
        if self.coarse_objects.contains(&0) {
            return Err(SizeClassError::invalid(
                "coarse_objects",
                "entries must be non-zero",
            ));
        }
        Ok(())
    }

    /// A fixed span must be whole pages and leave room past the header.
    pub(crate) fn check_span(&self, field: &'static str, span: u64) -> Result<()> {
        if span == 0 || span % self.page_size != 0 {
            return Err(SizeClassError::invalid(
                field,
                format!("{} is not a multiple of page size {}", span, self.page_size),
            ));
        }
        if span <= self.header_size {
            return Err(SizeClassError::invalid(
                field,
                format!("{} leaves no room after the {}-byte header", span, self.header_size),
            ));
        }
        Ok(())
    }

    /// The largest fine class served by `span` must fit at least one object.
    fn check_fine_fit(&self, field: &'static str, span: u64, object_size: u64) -> Result<()> {
        if span - self.header_size < object_size {
            return Err(SizeClassError::invalid(
                field,
                format!(
                    "{} holds no {}-byte object after the {}-byte header",
                    span, object_size, self.header_size
                ),
            ));
        }
        Ok(())
    }
}

impl HugePageConfig {
    /// Check the huge table against the page geometry of `classes`.
    pub fn validate(&self, classes: &SizeClassConfig) -> Result<()> {
        classes.check_span("huge_page_size", self.huge_page_size)?;

        if self.object_sizes.is_empty() {
            return Err(SizeClassError::invalid("object_sizes", "must not be empty"));
        }
        if self.object_sizes[0] == 0 {
            return Err(SizeClassError::invalid(
                "object_sizes",
                "sizes must be non-zero; the sentinel is implicit",
            ));
        }
        if let Some(pair) = self.object_sizes.windows(2).find(|w| w[1] <= w[0]) {
            return Err(SizeClassError::invalid(
                "object_sizes",
                format!("must be strictly increasing, found {} then {}", pair[0], pair[1]),
            ));
        }
        Ok(())
    }

    /// Bindings of `classes` extended with the huge span
    pub fn bindings(&self, classes: &SizeClassConfig) -> Bindings {
        classes.bindings().with_huge_span(self.huge_page_size)
    }
}
