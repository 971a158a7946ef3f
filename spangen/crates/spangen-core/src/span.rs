//! Span sizing
//!
//! Two ways to tie an object size to a span:
//!
//! - **fixed span**: the span size is given, the object count is whatever
//!   fits after the header: `(span - header) / size`.
//! - **fixed count**: the object count is given, the span is the bytes needed
//!   for objects plus header, rounded to pages:
//!   `((count * size + header) / page + 1) * page`.
//!
//! The fixed-count rounding is "floor, then one more page", not a ceiling.
//! When the exact need lands on a page boundary the span still gets a whole
//! extra page.
//!
//! ```text
//!   |<------------------------- span_size ------------------------->|
//!   +--------+--------+--------+--------+-- ... --+--------+--------+
//!   | header |  obj 0 |  obj 1 |  obj 2 |         | obj n-1| slack  |
//!   +--------+--------+--------+--------+-- ... --+--------+--------+
//! ```

use crate::config::SizeClassConfig;
use crate::error::{Result, SizeClassError};
use crate::expr::{Expr, Symbol};

/// Span size and object count for one class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanLayout {
    pub span_size: u64,
    pub objects_per_span: u64,
}

/// Computes span layouts for a fixed header size and page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanSizer {
    header_size: u64,
    page_size: u64,
}

impl SpanSizer {
    pub fn new(header_size: u64, page_size: u64) -> Self {
        Self {
            header_size,
            page_size,
        }
    }

    pub fn from_config(config: &SizeClassConfig) -> Self {
        Self::new(config.header_size, config.page_size)
    }

    /// Objects that fit in a span of `span_size` bytes.
    pub fn fixed_span(&self, object_size: u64, span_size: u64) -> Result<SpanLayout> {
        Self::check_object_size(object_size)?;
        let usable = span_size.checked_sub(self.header_size).ok_or_else(|| {
            SizeClassError::invalid(
                "span_size",
                format!("{} is smaller than the {}-byte header", span_size, self.header_size),
            )
        })?;
        Ok(SpanLayout {
            span_size,
            objects_per_span: usable / object_size,
        })
    }

    /// Page-rounded span holding `objects` objects plus the header.
    pub fn fixed_count(&self, object_size: u64, objects: u64) -> Result<SpanLayout> {
        Self::check_object_size(object_size)?;
        if objects == 0 {
            return Err(SizeClassError::invalid("objects", "count must be non-zero"));
        }
        if self.page_size == 0 {
            return Err(SizeClassError::invalid("page_size", "must be non-zero"));
        }
        let overflow = || SizeClassError::Overflow(format!("{} * {}", objects, object_size));
        let needed = objects
            .checked_mul(object_size)
            .and_then(|payload| payload.checked_add(self.header_size))
            .ok_or_else(overflow)?;
        let span_size = (needed / self.page_size + 1)
            .checked_mul(self.page_size)
            .ok_or_else(overflow)?;
        Ok(SpanLayout {
            span_size,
            objects_per_span: objects,
        })
    }

    /// `(span - header) / size`
    pub fn fixed_span_objects_expr(span: impl Into<Expr>, object_size: u64) -> Expr {
        let span: Expr = span.into();
        (span - Symbol::HeaderSize) / object_size
    }

    /// `((objects * size + header) / page + 1) * page`
    pub fn fixed_count_span_expr(object_size: u64, objects: u64) -> Expr {
        ((Expr::Lit(objects) * object_size + Symbol::HeaderSize) / Symbol::PageSize + 1u64)
            * Symbol::PageSize
    }

    fn check_object_size(object_size: u64) -> Result<()> {
        if object_size == 0 {
            return Err(SizeClassError::invalid("object_size", "must be non-zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Bindings;

    fn sizer() -> SpanSizer {
        SpanSizer::new(192, 4096)
    }

    #[test]
    fn test_fixed_span_floors_object_count() {
        let layout = sizer().fixed_span(48, 8192).unwrap();
        assert_eq!(layout.span_size, 8192);
        assert_eq!(layout.objects_per_span, (8192 - 192) / 48);
    }

    #[test]
    fn test_fixed_span_smaller_than_header() {
        assert!(sizer().fixed_span(16, 128).is_err());
    }

    #[test]
    fn test_fixed_count_rounds_to_next_page() {
        // 64 * 512 + 192 = 32960 -> 8 whole pages, plus one
        let layout = sizer().fixed_count(512, 64).unwrap();
        assert_eq!(layout.span_size, 9 * 4096);
        assert_eq!(layout.objects_per_span, 64);
    }

    #[test]
    fn test_fixed_count_adds_page_on_exact_boundary() {
        // 3904 + 192 = 4096 exactly; still two pages
        let layout = sizer().fixed_count(3904, 1).unwrap();
        assert_eq!(layout.span_size, 2 * 4096);
    }

    #[test]
    fn test_fixed_count_rejects_zero() {
        assert!(sizer().fixed_count(0, 4).is_err());
        assert!(sizer().fixed_count(512, 0).is_err());
    }

    #[test]
    fn test_fixed_count_overflow() {
        assert!(matches!(
            sizer().fixed_count(u64::MAX / 2, 4),
            Err(SizeClassError::Overflow(_))
        ));
    }

    #[test]
    fn test_expressions_agree_with_numbers() {
        let bindings = Bindings::new(192, 4096);
        for (size, count) in [(512u64, 64u64), (4096, 8), (1 << 21, 1), (3904, 1)] {
            let layout = sizer().fixed_count(size, count).unwrap();
            let expr = SpanSizer::fixed_count_span_expr(size, count);
            assert_eq!(expr.eval(&bindings).unwrap(), layout.span_size);
        }
        for size in [16u64, 112, 128, 256] {
            let layout = sizer().fixed_span(size, 16384).unwrap();
            let expr = SpanSizer::fixed_span_objects_expr(16384u64, size);
            assert_eq!(expr.eval(&bindings).unwrap(), layout.objects_per_span);
        }
    }
}
