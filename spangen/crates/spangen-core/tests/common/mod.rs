//! Shared helpers for the table integration tests.

#![allow(dead_code)]

use spangen_core::{HugePageConfig, SizeClassConfig, SizeClassTable};

/// Page size of the default scheme
pub const PAGE_SIZE: u64 = 4096;

/// Span header size of the default scheme
pub const HEADER_SIZE: u64 = 192;

/// Default fine + coarse table
pub fn default_table() -> SizeClassTable {
    SizeClassTable::default_table(&SizeClassConfig::default())
        .expect("default configuration must produce a table")
}

/// Default huge-page table
pub fn huge_table() -> SizeClassTable {
    SizeClassTable::huge_table(&SizeClassConfig::default(), &HugePageConfig::default())
        .expect("default huge configuration must produce a table")
}

/// Assert the no-overcommit and page-multiple invariants on every real class.
pub fn assert_span_invariants(table: &SizeClassTable) {
    let header = table.bindings().header_size;
    let page = table.bindings().page_size;
    for class in table.iter().skip(1) {
        assert!(
            class.objects_per_span * class.object_size + header <= class.span_size,
            "class {} overcommits its span",
            class.index
        );
        assert_eq!(
            class.span_size % page,
            0,
            "class {} span is not whole pages",
            class.index
        );
        assert!(class.objects_per_span > 0, "class {} is empty", class.index);
    }
}

/// Assert sentinel-first, contiguous indices and strictly increasing sizes.
pub fn assert_ordering(table: &SizeClassTable) {
    let classes = table.classes();
    assert_eq!(classes[0].object_size, 0);
    for (position, class) in classes.iter().enumerate() {
        assert_eq!(class.index, position);
    }
    for pair in classes[1..].windows(2) {
        assert!(pair[1].object_size > pair[0].object_size);
    }
}
