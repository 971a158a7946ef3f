//! Table assembly
//!
//! The assembler puts the sentinel first and appends generator output in
//! index order. It computes nothing itself; it only sequences the tiers and
//! checks the result before handing it out. A [`SizeClassTable`] has no
//! mutating API: regenerating is the only way to change it.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::class::{SizeClass, Tier};
use crate::config::{HugePageConfig, SizeClassConfig};
use crate::error::{Result, SizeClassError};
use crate::expr::Bindings;
use crate::generator::{
    ClassGenerator, CoarseClassGenerator, FineClassGenerator, HugeClassGenerator,
};

/// Which table to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Variant {
    /// Fine + coarse tiers
    #[default]
    Default,
    /// Huge-page tier
    Huge,
}

impl Variant {
    /// Command-line keyword selecting the huge-page table
    pub const HUGE_KEYWORD: &'static str = "huge";

    /// Keyword naming this variant on the command line, if any
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Variant::Default => None,
            Variant::Huge => Some(Self::HUGE_KEYWORD),
        }
    }
}

impl FromStr for Variant {
    type Err = SizeClassError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            Self::HUGE_KEYWORD => Ok(Variant::Huge),
            other => Err(SizeClassError::invalid(
                "variant",
                format!("unknown table variant `{}`", other),
            )),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword().unwrap_or("default"))
    }
}

/// Builds one table from the configured tiers
pub struct TableAssembler<'a> {
    classes: &'a SizeClassConfig,
    huge: &'a HugePageConfig,
}

impl<'a> TableAssembler<'a> {
    pub fn new(classes: &'a SizeClassConfig, huge: &'a HugePageConfig) -> Self {
        Self { classes, huge }
    }

    /// Validate the configuration, run the variant's generators and check
    /// the assembled table.
    pub fn assemble(&self, variant: Variant) -> Result<SizeClassTable> {
        self.classes.validate()?;

        let mut tiers: Vec<Box<dyn ClassGenerator + '_>> = Vec::new();
        let bindings = match variant {
            Variant::Default => {
                tiers.push(Box::new(FineClassGenerator::new(self.classes)));
                tiers.push(Box::new(CoarseClassGenerator::after_fine(self.classes)));
                self.classes.bindings()
            }
            Variant::Huge => {
                self.huge.validate(self.classes)?;
                tiers.push(Box::new(HugeClassGenerator::new(self.classes, self.huge)));
                self.huge.bindings(self.classes)
            }
        };

        let mut classes = vec![SizeClass::sentinel()];
        for tier in &tiers {
            let generated = tier.generate(classes.len())?;
            debug!(tier = %tier.tier(), count = generated.len(), "appending tier");
            classes.extend(generated);
        }

        let table = SizeClassTable {
            variant,
            classes,
            bindings,
        };
        table.check()?;
        Ok(table)
    }
}

/// An ordered, validated size-class table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeClassTable {
    variant: Variant,
    classes: Vec<SizeClass>,
    bindings: Bindings,
}

impl SizeClassTable {
    /// Default fine + coarse table for `config`
    pub fn default_table(config: &SizeClassConfig) -> Result<Self> {
        TableAssembler::new(config, &HugePageConfig::default()).assemble(Variant::Default)
    }

    /// Huge-page table for `config` and `huge`
    pub fn huge_table(config: &SizeClassConfig, huge: &HugePageConfig) -> Result<Self> {
        TableAssembler::new(config, huge).assemble(Variant::Huge)
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Symbol values the table's expressions resolve against
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn classes(&self) -> &[SizeClass] {
        &self.classes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SizeClass> {
        self.classes.iter()
    }

    /// Number of classes, sentinel included
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SizeClass> {
        self.classes.get(index)
    }

    /// Classes produced by `tier`
    pub fn tier(&self, tier: Tier) -> impl Iterator<Item = &SizeClass> {
        self.classes.iter().filter(move |class| class.tier == tier)
    }

    /// Largest object size in the table
    pub fn max_object_size(&self) -> u64 {
        self.classes.last().map_or(0, |class| class.object_size)
    }

    /// Smallest class whose objects hold `size` bytes.
    ///
    /// A zero-byte request maps to the sentinel; requests beyond the largest
    /// class have no class.
    pub fn class_for(&self, size: u64) -> Option<&SizeClass> {
        if size == 0 {
            return self.classes.first();
        }
        let real = self.classes.get(1..)?;
        let position = real.partition_point(|class| class.object_size < size);
        real.get(position)
    }

    /// Verify the table invariants.
    ///
    /// - index `i` sits at position `i`
    /// - the sentinel is all zero
    /// - object sizes strictly increase from index 1
    /// - every span is whole pages and holds its objects plus the header
    /// - symbolic fields resolve to the recorded numbers
    pub fn check(&self) -> Result<()> {
        let header_size = self.bindings.header_size;
        let page_size = self.bindings.page_size;

        for (position, class) in self.classes.iter().enumerate() {
            if class.index != position {
                return Err(SizeClassError::IndexGap {
                    position,
                    index: class.index,
                });
            }
        }

        match self.classes.first() {
            Some(sentinel) if *sentinel == SizeClass::sentinel() => {}
            _ => return Err(SizeClassError::BadSentinel),
        }

        let mut previous = 0u64;
        for class in &self.classes[1..] {
            if class.object_size <= previous {
                return Err(SizeClassError::NotIncreasing {
                    index: class.index,
                    object_size: class.object_size,
                    previous,
                });
            }
            previous = class.object_size;

            if class.span_size % page_size != 0 {
                return Err(SizeClassError::UnalignedSpan {
                    index: class.index,
                    span_size: class.span_size,
                    page_size,
                });
            }

            let needed = class
                .objects_per_span
                .checked_mul(class.object_size)
                .and_then(|payload| payload.checked_add(header_size))
                .ok_or_else(|| SizeClassError::Overflow(format!("class {}", class.index)))?;
            if needed > class.span_size {
                return Err(SizeClassError::Overcommit {
                    index: class.index,
                    needed,
                    span_size: class.span_size,
                });
            }

            if class.span.resolve(&self.bindings)? != class.span_size
                || class.objects.resolve(&self.bindings)? != class.objects_per_span
            {
                return Err(SizeClassError::invalid(
                    "table",
                    format!("class {} expressions disagree with its values", class.index),
                ));
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a SizeClassTable {
    type Item = &'a SizeClass;
    type IntoIter = std::slice::Iter<'a, SizeClass>;

    fn into_iter(self) -> Self::IntoIter {
        self.classes.iter()
    }
}
