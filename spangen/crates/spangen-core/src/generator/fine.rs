//! Fine tier
//!
//! Object sizes step by `min_alignment` from `min_alignment` to
//! `max_fine_size`. The tier is split by position: positions before
//! `fine_split_index` use `fine_small_span`, the rest `fine_large_span`.

use tracing::debug;

use crate::class::{SizeClass, Tier};
use crate::config::SizeClassConfig;
use crate::error::{Result, SizeClassError};
use crate::expr::Quantity;
use crate::generator::ClassGenerator;
use crate::span::SpanSizer;

/// Generator for the fixed-increment classes
pub struct FineClassGenerator<'a> {
    config: &'a SizeClassConfig,
    sizer: SpanSizer,
}

impl<'a> FineClassGenerator<'a> {
    pub fn new(config: &'a SizeClassConfig) -> Self {
        Self {
            config,
            sizer: SpanSizer::from_config(config),
        }
    }

    /// Span size for the class at 1-based `position` within the tier
    fn span_for(&self, position: usize) -> u64 {
        if position < self.config.fine_split_index() {
            self.config.fine_small_span
        } else {
            self.config.fine_large_span
        }
    }
}

impl ClassGenerator for FineClassGenerator<'_> {
    fn tier(&self) -> Tier {
        Tier::Fine
    }

    fn len(&self) -> usize {
        self.config.fine_classes()
    }

    fn generate(&self, first_index: usize) -> Result<Vec<SizeClass>> {
        let mut classes = Vec::new();
        let mut object_size = 0u64;

        for position in 1..=self.len() {
            object_size += self.config.min_alignment;
            let index = first_index + position - 1;
            let layout = self.sizer.fixed_span(object_size, self.span_for(position))?;
            if layout.objects_per_span == 0 {
                return Err(SizeClassError::EmptySpan {
                    index,
                    object_size,
                    span_size: layout.span_size,
                });
            }

            classes.push(SizeClass {
                index,
                tier: Tier::Fine,
                object_size,
                span_size: layout.span_size,
                objects_per_span: layout.objects_per_span,
                span: Quantity::Literal(layout.span_size),
                objects: SpanSizer::fixed_span_objects_expr(layout.span_size, object_size).into(),
            });
        }

        debug!(
            classes = classes.len(),
            split = self.config.fine_split_index(),
            "generated fine tier"
        );
        Ok(classes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(config: &SizeClassConfig) -> Vec<SizeClass> {
        FineClassGenerator::new(config).generate(1).unwrap()
    }

    #[test]
    fn test_fine_sizes_step_by_alignment() {
        let config = SizeClassConfig::default();
        let classes = generate(&config);
        assert_eq!(classes.len(), 16);
        assert_eq!(classes[0].object_size, 16);
        assert_eq!(classes[15].object_size, 256);
        for pair in classes.windows(2) {
            assert_eq!(pair[1].object_size, pair[0].object_size + 16);
            assert_eq!(pair[1].index, pair[0].index + 1);
        }
    }

    #[test]
    fn test_fine_split_at_midpoint_index() {
        let config = SizeClassConfig::default();
        let classes = generate(&config);
        let class = |index: usize| &classes[index - 1];

        assert_eq!(class(7).object_size, 112);
        assert_eq!(class(7).span_size, 8192);
        assert_eq!(class(8).object_size, 128);
        assert_eq!(class(8).span_size, 16384);
        assert_eq!(class(16).span_size, 16384);
    }

    #[test]
    fn test_fine_objects_fill_span_after_header() {
        let config = SizeClassConfig::default();
        for class in generate(&config) {
            assert_eq!(
                class.objects_per_span,
                (class.span_size - config.header_size) / class.object_size
            );
            assert_eq!(class.tier, Tier::Fine);
            assert_eq!(class.span, Quantity::Literal(class.span_size));
            assert_eq!(
                class.objects.resolve(&config.bindings()),
                Ok(class.objects_per_span)
            );
        }
    }

    #[test]
    fn test_fine_empty_span_is_an_error() {
        let config = SizeClassConfig {
            header_size: 8100,
            ..Default::default()
        };
        assert!(matches!(
            FineClassGenerator::new(&config).generate(1),
            Err(SizeClassError::EmptySpan { index: 6, .. })
        ));
    }

    #[test]
    fn test_fine_honours_first_index() {
        let config = SizeClassConfig::default();
        let classes = FineClassGenerator::new(&config).generate(5).unwrap();
        assert_eq!(classes[0].index, 5);
        // split is positional, not tied to the absolute index
        assert_eq!(classes[6].span_size, 8192);
        assert_eq!(classes[7].span_size, 16384);
    }
}
