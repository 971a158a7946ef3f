//! Human-readable table summary.

use std::fmt;

use crate::table::SizeClassTable;

/// Column view of a table, one row per class
pub struct TableSummary<'a> {
    table: &'a SizeClassTable,
}

impl<'a> TableSummary<'a> {
    pub fn new(table: &'a SizeClassTable) -> Self {
        Self { table }
    }

    /// Span bytes unused across all classes, header excluded
    pub fn total_slack(&self) -> u64 {
        let header_size = self.table.bindings().header_size;
        self.table
            .iter()
            .skip(1)
            .map(|class| class.slack(header_size))
            .sum()
    }
}

impl fmt::Display for TableSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_size = self.table.bindings().header_size;
        writeln!(
            f,
            "{} table: {} classes (header {} B, page {} B)",
            self.table.variant(),
            self.table.len(),
            header_size,
            self.table.bindings().page_size
        )?;
        writeln!(
            f,
            "{:>5}  {:<8}  {:>10}  {:>8}  {:>10}  {:>8}",
            "class", "tier", "size", "objects", "span", "slack"
        )?;
        for class in self.table {
            writeln!(
                f,
                "{:>5}  {:<8}  {:>10}  {:>8}  {:>10}  {:>8}",
                class.index,
                class.tier.to_string(),
                class.object_size,
                class.objects_per_span,
                class.span_size,
                class.slack(header_size)
            )?;
        }
        Ok(())
    }
}
