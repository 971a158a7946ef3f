//! Property-based tests for span sizing and generated schemes.

mod common;

use common::{assert_ordering, assert_span_invariants};
use proptest::prelude::*;
use spangen_core::{HugePageConfig, SizeClassConfig, SizeClassTable, SpanSizer};

// ============================================================================
// SPAN SIZER
// ============================================================================

proptest! {
    #[test]
    fn fixed_count_fits_and_is_tight(
        object_size in 1u64..=(1 << 21),
        objects in 1u64..=128,
        header_size in 0u64..=512,
    ) {
        let sizer = SpanSizer::new(header_size, 4096);
        let layout = sizer.fixed_count(object_size, objects).unwrap();
        let needed = objects * object_size + header_size;

        prop_assert_eq!(layout.span_size % 4096, 0);
        prop_assert!(needed <= layout.span_size);
        // never more than one spare page
        prop_assert!(layout.span_size - needed <= 4096);
    }

    #[test]
    fn fixed_span_is_maximal(
        object_size in 1u64..=4096,
        pages in 1u64..=16,
    ) {
        let sizer = SpanSizer::new(192, 4096);
        let span_size = pages * 4096;
        let layout = sizer.fixed_span(object_size, span_size).unwrap();

        prop_assert!(layout.objects_per_span * object_size + 192 <= span_size);
        prop_assert!((layout.objects_per_span + 1) * object_size + 192 > span_size);
    }

    #[test]
    fn span_expressions_agree_with_numbers(
        object_size in 1u64..=(1 << 20),
        objects in 1u64..=64,
    ) {
        let config = SizeClassConfig::default();
        let sizer = SpanSizer::from_config(&config);
        let bindings = config.bindings();

        let layout = sizer.fixed_count(object_size, objects).unwrap();
        let expr = SpanSizer::fixed_count_span_expr(object_size, objects);
        prop_assert_eq!(expr.eval(&bindings).unwrap(), layout.span_size);
    }
}

// ============================================================================
// ALTERNATIVE SCHEMES
// ============================================================================

proptest! {
    #[test]
    fn generated_schemes_hold_invariants(
        alignment_shift in 3u32..=5,
        fine_extra in 1u32..=4,
        coarse_len in 1u32..=10,
        header_size in 0u64..=1024,
    ) {
        let min_alignment = 1u64 << alignment_shift;
        let max_fine_shift = alignment_shift + fine_extra;
        let config = SizeClassConfig {
            min_alignment,
            max_fine_shift,
            max_small_shift: max_fine_shift + coarse_len,
            header_size,
            coarse_objects: vec![4; coarse_len as usize],
            ..Default::default()
        };

        let table = SizeClassTable::default_table(&config).unwrap();
        prop_assert_eq!(table.len(), config.num_classes());
        assert_ordering(&table);
        assert_span_invariants(&table);
    }

    #[test]
    fn huge_tables_hold_invariants(
        sizes in proptest::collection::btree_set(1u64..=(1 << 16), 1..32),
    ) {
        // a BTreeSet iterates in increasing order
        let object_sizes: Vec<u64> = sizes.into_iter().collect();
        let huge = HugePageConfig {
            object_sizes: object_sizes.clone(),
            ..Default::default()
        };

        let table = SizeClassTable::huge_table(&SizeClassConfig::default(), &huge).unwrap();
        prop_assert_eq!(table.len(), object_sizes.len() + 1);
        assert_ordering(&table);
        assert_span_invariants(&table);
    }
}
