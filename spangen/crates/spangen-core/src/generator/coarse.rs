//! Coarse tier
//!
//! Sizes double from the last fine size up to `max_small_size`. Each class
//! takes its object count from `coarse_objects` and gets the smallest
//! page-rounded span (plus the guaranteed extra page) that holds them.

use tracing::debug;

use crate::class::{SizeClass, Tier};
use crate::config::SizeClassConfig;
use crate::error::{Result, SizeClassError};
use crate::expr::Quantity;
use crate::generator::ClassGenerator;
use crate::span::SpanSizer;

/// Generator for the geometric classes
pub struct CoarseClassGenerator<'a> {
    config: &'a SizeClassConfig,
    sizer: SpanSizer,
    base_size: u64,
}

impl<'a> CoarseClassGenerator<'a> {
    /// `base_size` is the object size the doubling continues from, normally
    /// the last fine class.
    pub fn new(config: &'a SizeClassConfig, base_size: u64) -> Self {
        Self {
            config,
            sizer: SpanSizer::from_config(config),
            base_size,
        }
    }

    /// Coarse tier continuing from `max_fine_size`
    pub fn after_fine(config: &'a SizeClassConfig) -> Self {
        Self::new(config, config.max_fine_size())
    }
}

impl ClassGenerator for CoarseClassGenerator<'_> {
    fn tier(&self) -> Tier {
        Tier::Coarse
    }

    fn len(&self) -> usize {
        self.config.coarse_classes()
    }

    fn generate(&self, first_index: usize) -> Result<Vec<SizeClass>> {
        if self.config.coarse_objects.len() != self.len() {
            return Err(SizeClassError::CoarseCountMismatch {
                expected: self.len(),
                found: self.config.coarse_objects.len(),
            });
        }

        let mut classes = Vec::with_capacity(self.len());
        let mut object_size = self.base_size;

        for (offset, &objects) in self.config.coarse_objects.iter().enumerate() {
            object_size = object_size
                .checked_mul(2)
                .ok_or_else(|| SizeClassError::Overflow(format!("{} * 2", object_size)))?;
            let layout = self.sizer.fixed_count(object_size, objects)?;

            classes.push(SizeClass {
                index: first_index + offset,
                tier: Tier::Coarse,
                object_size,
                span_size: layout.span_size,
                objects_per_span: layout.objects_per_span,
                span: SpanSizer::fixed_count_span_expr(object_size, objects).into(),
                objects: Quantity::Literal(objects),
            });
        }

        debug!(
            classes = classes.len(),
            largest = object_size,
            "generated coarse tier"
        );
        Ok(classes)
    }
}
