//! Huge-page tier
//!
//! An explicit list of object sizes, all backed by one huge page. This tier
//! forms a table of its own and never mixes with fine or coarse classes.

use tracing::debug;

use crate::class::{SizeClass, Tier};
use crate::config::{HugePageConfig, SizeClassConfig};
use crate::error::{Result, SizeClassError};
use crate::expr::{Expr, Symbol};
use crate::generator::ClassGenerator;
use crate::span::SpanSizer;

/// Generator for the huge-page classes
pub struct HugeClassGenerator<'a> {
    huge: &'a HugePageConfig,
    sizer: SpanSizer,
}

impl<'a> HugeClassGenerator<'a> {
    pub fn new(classes: &SizeClassConfig, huge: &'a HugePageConfig) -> Self {
        Self {
            huge,
            sizer: SpanSizer::from_config(classes),
        }
    }
}

impl ClassGenerator for HugeClassGenerator<'_> {
    fn tier(&self) -> Tier {
        Tier::Huge
    }

    fn len(&self) -> usize {
        self.huge.object_sizes.len()
    }

    fn generate(&self, first_index: usize) -> Result<Vec<SizeClass>> {
        let span_size = self.huge.huge_page_size;
        let mut classes = Vec::with_capacity(self.len());

        for (offset, &object_size) in self.huge.object_sizes.iter().enumerate() {
            let index = first_index + offset;
            let layout = self.sizer.fixed_span(object_size, span_size)?;
            if layout.objects_per_span == 0 {
                return Err(SizeClassError::EmptySpan {
                    index,
                    object_size,
                    span_size,
                });
            }

            classes.push(SizeClass {
                index,
                tier: Tier::Huge,
                object_size,
                span_size,
                objects_per_span: layout.objects_per_span,
                span: Expr::Sym(Symbol::HugeSpan).into(),
                objects: SpanSizer::fixed_span_objects_expr(Symbol::HugeSpan, object_size)
                    .group()
                    .into(),
            });
        }

        debug!(classes = classes.len(), span_size, "generated huge tier");
        Ok(classes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_huge_classes_share_span() {
        let classes_config = SizeClassConfig::default();
        let huge = HugePageConfig::default();
        let classes = HugeClassGenerator::new(&classes_config, &huge)
            .generate(1)
            .unwrap();

        assert_eq!(classes.len(), 22);
        assert_eq!(classes[0].object_size, 16);
        assert_eq!(classes[15].object_size, 256);
        assert_eq!(classes[16].object_size, 512);
        assert_eq!(classes[21].object_size, 16384);
        assert!(classes.iter().all(|c| c.span_size == 1 << 21));
    }

    #[test]
    fn test_huge_objects_and_expressions() {
        let classes_config = SizeClassConfig::default();
        let huge = HugePageConfig::default();
        let bindings = huge.bindings(&classes_config);

        for class in HugeClassGenerator::new(&classes_config, &huge)
            .generate(1)
            .unwrap()
        {
            assert_eq!(
                class.objects_per_span,
                ((1 << 21) - 192) / class.object_size
            );
            assert_eq!(class.span.resolve(&bindings), Ok(1 << 21));
            assert_eq!(class.objects.resolve(&bindings), Ok(class.objects_per_span));
            assert!(class.span.references(Symbol::HugeSpan));
        }
    }

    #[test]
    fn test_huge_object_larger_than_page() {
        let classes_config = SizeClassConfig::default();
        let huge = HugePageConfig {
            huge_page_size: 8192,
            object_sizes: vec![16, 16384],
        };
        assert!(matches!(
            HugeClassGenerator::new(&classes_config, &huge).generate(1),
            Err(SizeClassError::EmptySpan { index: 2, .. })
        ));
    }
}
