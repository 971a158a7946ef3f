//! Header writer
//!
//! Produces the complete header text for one table:
//!
//! ```text
//! // <banner>
//! //
//! // This file is auto-generated by `spant`. Do not edit.
//!
//! #ifndef SIZE_CLASSES_RAW_H_
//! #define SIZE_CLASSES_RAW_H_
//!
//! #define SIZE_CLASSES \
//!   SIZE_CLASS(0, 0, 0, 0) /* NOLINT */ \
//!   ...
//!   SIZE_CLASS(29, 2097152, ..., 1) /* NOLINT */
//!
//! #endif  // SIZE_CLASSES_RAW_H_
//! ```
//!
//! The text depends only on the table and the options, never on the clock or
//! the environment, so regenerating an unchanged table yields identical bytes.

use std::fmt::Write;
use std::path::Path;

use spangen_core::{SizeClass, SizeClassTable, Symbol};
use tracing::debug;

use crate::error::Result;
use crate::options::{RenderOptions, RenderStyle};
use crate::render::FieldRenderer;

/// Renders a [`SizeClassTable`] as a header-guarded macro definition
#[derive(Debug, Clone)]
pub struct HeaderWriter<'a> {
    options: &'a RenderOptions,
    command: Option<String>,
}

impl<'a> HeaderWriter<'a> {
    pub fn new(options: &'a RenderOptions) -> Self {
        Self {
            options,
            command: None,
        }
    }

    /// Name the command that regenerates the file in the notice line.
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Include guard for `file_name`: the configured prefix, then the base
    /// name upper-cased with every other character mapped to `_`, then `_`.
    pub fn guard(&self, file_name: &str) -> String {
        let base = Path::new(file_name)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(file_name);

        let mut guard = self.options.guard_prefix.clone();
        if guard.is_empty() && base.starts_with(|c: char| c.is_ascii_digit()) {
            guard.push('_');
        }
        guard.extend(base.chars().map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        }));
        guard.push('_');
        guard
    }

    /// Render `table` as the contents of `file_name`.
    pub fn render(&self, table: &SizeClassTable, file_name: &str) -> Result<String> {
        self.options.validate()?;

        let guard = self.guard(file_name);
        let renderer =
            FieldRenderer::new(&self.options.symbols, self.options.style, table.bindings());
        let mut out = String::new();

        self.write_notice(&mut out)?;
        writeln!(out)?;
        writeln!(out, "#ifndef {}", guard)?;
        writeln!(out, "#define {}", guard)?;
        writeln!(out)?;

        if self.needs_huge_define(table) {
            let span = table.bindings().get(Symbol::HugeSpan)?;
            writeln!(
                out,
                "#define {} {}",
                self.options.symbols.huge_span,
                huge_span_literal(span)
            )?;
            writeln!(out)?;
        }

        writeln!(out, "#define {} \\", self.options.macro_name)?;
        let last = table.len().saturating_sub(1);
        for (position, class) in table.iter().enumerate() {
            self.write_row(&mut out, &renderer, class, position == last)?;
        }
        writeln!(out)?;
        writeln!(out, "#endif  // {}", guard)?;

        debug!(guard = %guard, rows = table.len(), "rendered header");
        Ok(out)
    }

    fn write_notice(&self, out: &mut String) -> Result<()> {
        for line in &self.options.banner {
            if line.is_empty() {
                writeln!(out, "//")?;
            } else {
                writeln!(out, "// {}", line)?;
            }
        }
        if !self.options.banner.is_empty() {
            writeln!(out, "//")?;
        }
        match &self.command {
            Some(command) => writeln!(
                out,
                "// This file is auto-generated by `{}`. Do not edit.",
                command
            )?,
            None => writeln!(out, "// This file is auto-generated. Do not edit.")?,
        }
        Ok(())
    }

    fn write_row(
        &self,
        out: &mut String,
        renderer: &FieldRenderer<'_>,
        class: &SizeClass,
        last: bool,
    ) -> Result<()> {
        write!(
            out,
            "  {}({}, {}, {}, {})",
            self.options.record_name,
            class.index,
            class.object_size,
            renderer.quantity(&class.span)?,
            renderer.quantity(&class.objects)?
        )?;
        if !self.options.lint_marker.is_empty() {
            write!(out, " /* {} */", self.options.lint_marker)?;
        }
        if !last {
            out.push_str(" \\");
        }
        out.push('\n');
        Ok(())
    }

    /// The huge span symbol is defined in the header itself, and only when a
    /// rendered field refers to it.
    fn needs_huge_define(&self, table: &SizeClassTable) -> bool {
        self.options.style == RenderStyle::Symbolic
            && table.iter().any(|class| {
                class.span.references(Symbol::HugeSpan)
                    || class.objects.references(Symbol::HugeSpan)
            })
    }
}

/// `(1UL << k)` for powers of two, a plain unsigned long literal otherwise
fn huge_span_literal(span: u64) -> String {
    if span.is_power_of_two() {
        format!("(1UL << {})", span.trailing_zeros())
    } else {
        format!("{}UL", span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spangen_core::{HugePageConfig, SizeClassConfig};

    #[test]
    fn test_guard_from_file_name() {
        let options = RenderOptions::default();
        let writer = HeaderWriter::new(&options);
        assert_eq!(writer.guard("size_classes_raw.h"), "SIZE_CLASSES_RAW_H_");
        assert_eq!(
            writer.guard("src/size_classes_raw_hugepage.h"),
            "SIZE_CLASSES_RAW_HUGEPAGE_H_"
        );
        assert_eq!(writer.guard("2mb-table.h"), "_2MB_TABLE_H_");
    }

    #[test]
    fn test_guard_prefix() {
        let options = RenderOptions {
            guard_prefix: "SCALLOC_".to_string(),
            ..Default::default()
        };
        let writer = HeaderWriter::new(&options);
        assert_eq!(writer.guard("size_classes_raw.h"), "SCALLOC_SIZE_CLASSES_RAW_H_");
    }

    #[test]
    fn test_huge_span_literal() {
        assert_eq!(huge_span_literal(1 << 21), "(1UL << 21)");
        assert_eq!(huge_span_literal(65536), "(1UL << 16)");
        assert_eq!(huge_span_literal(3 << 20), "3145728UL");
    }

    #[test]
    fn test_last_row_has_no_continuation() {
        let table = SizeClassTable::default_table(&SizeClassConfig::default()).unwrap();
        let options = RenderOptions::default();
        let text = HeaderWriter::new(&options)
            .render(&table, "size_classes_raw.h")
            .unwrap();
        let rows: Vec<&str> = text.lines().filter(|l| l.starts_with("  SIZE_CLASS(")).collect();
        assert_eq!(rows.len(), 30);
        assert!(rows[..29].iter().all(|row| row.ends_with(" \\")));
        assert!(!rows[29].ends_with('\\'));
    }

    #[test]
    fn test_literal_style_omits_huge_define() {
        let table =
            SizeClassTable::huge_table(&SizeClassConfig::default(), &HugePageConfig::default())
                .unwrap();
        let options = RenderOptions::literal();
        let text = HeaderWriter::new(&options)
            .render(&table, "size_classes_raw_hugepage.h")
            .unwrap();
        assert!(!text.contains("RSPAN_SIZE"));
        assert!(text.contains("  SIZE_CLASS(1, 16, 2097152, 131060) /* NOLINT */ \\\n"));
    }

    #[test]
    fn test_empty_lint_marker() {
        let table = SizeClassTable::default_table(&SizeClassConfig::default()).unwrap();
        let options = RenderOptions {
            lint_marker: String::new(),
            ..Default::default()
        };
        let text = HeaderWriter::new(&options).render(&table, "t.h").unwrap();
        assert!(!text.contains("/*"));
        assert!(text.contains("  SIZE_CLASS(0, 0, 0, 0) \\\n"));
    }

    #[test]
    fn test_invalid_options_are_rejected() {
        let table = SizeClassTable::default_table(&SizeClassConfig::default()).unwrap();
        let options = RenderOptions {
            record_name: "SIZE CLASS".to_string(),
            ..Default::default()
        };
        assert!(HeaderWriter::new(&options).render(&table, "t.h").is_err());
    }
}
