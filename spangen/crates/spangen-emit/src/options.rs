//! Render options
//!
//! The consuming allocator decides how the header must be spelled: which
//! names its constants carry, what the table macro is called, which lint
//! suppression each line needs. All of it is configurable and loads from the
//! `[render]` table of a config file with per-field defaults.

use serde::{Deserialize, Serialize};
use spangen_core::Symbol;

use crate::error::{EmitError, Result};

/// How span sizes and object counts are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderStyle {
    /// Expressions over the consumer's constants, resolved by its compiler
    #[default]
    Symbolic,
    /// Every field resolved to an integer
    Literal,
}

/// Spelling of each symbol in the generated header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolNames {
    /// Default: `sizeof(SpanHeader)`
    #[serde(default = "default_header_size")]
    pub header_size: String,

    /// Default: `kPageSize`
    #[serde(default = "default_page_size")]
    pub page_size: String,

    /// Default: `RSPAN_SIZE`; also the name of the emitted `#define`
    #[serde(default = "default_huge_span")]
    pub huge_span: String,
}

fn default_header_size() -> String {
    "sizeof(SpanHeader)".to_string()
}

fn default_page_size() -> String {
    "kPageSize".to_string()
}

fn default_huge_span() -> String {
    "RSPAN_SIZE".to_string()
}

impl Default for SymbolNames {
    fn default() -> Self {
        Self {
            header_size: default_header_size(),
            page_size: default_page_size(),
            huge_span: default_huge_span(),
        }
    }
}

impl SymbolNames {
    pub fn get(&self, symbol: Symbol) -> &str {
        match symbol {
            Symbol::HeaderSize => &self.header_size,
            Symbol::PageSize => &self.page_size,
            Symbol::HugeSpan => &self.huge_span,
        }
    }
}

/// Header rendering configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Symbolic or literal fields
    #[serde(default)]
    pub style: RenderStyle,

    #[serde(default)]
    pub symbols: SymbolNames,

    /// Name of the table macro
    ///
    /// Default: `SIZE_CLASSES`
    #[serde(default = "default_macro_name")]
    pub macro_name: String,

    /// Name of the per-class record macro
    ///
    /// Default: `SIZE_CLASS`
    #[serde(default = "default_record_name")]
    pub record_name: String,

    /// Lint suppression appended to every row; empty disables it
    ///
    /// Default: `NOLINT`
    #[serde(default = "default_lint_marker")]
    pub lint_marker: String,

    /// Prepended to the include guard derived from the file name
    #[serde(default)]
    pub guard_prefix: String,

    /// Comment lines written above the generated-file notice
    #[serde(default)]
    pub banner: Vec<String>,
}

fn default_macro_name() -> String {
    "SIZE_CLASSES".to_string()
}

fn default_record_name() -> String {
    "SIZE_CLASS".to_string()
}

fn default_lint_marker() -> String {
    "NOLINT".to_string()
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            style: RenderStyle::default(),
            symbols: SymbolNames::default(),
            macro_name: default_macro_name(),
            record_name: default_record_name(),
            lint_marker: default_lint_marker(),
            guard_prefix: String::new(),
            banner: Vec::new(),
        }
    }
}

impl RenderOptions {
    /// Options with every field resolved to an integer
    pub fn literal() -> Self {
        Self {
            style: RenderStyle::Literal,
            ..Self::default()
        }
    }

    /// Reject options that would produce a header the preprocessor rejects.
    pub fn validate(&self) -> Result<()> {
        check_identifier("macro_name", &self.macro_name)?;
        check_identifier("record_name", &self.record_name)?;
        check_identifier("symbols.huge_span", &self.symbols.huge_span)?;
        if !self.guard_prefix.is_empty() {
            check_identifier("guard_prefix", &self.guard_prefix)?;
        }
        if self.symbols.header_size.trim().is_empty() {
            return Err(EmitError::option("symbols.header_size", "must not be empty"));
        }
        if self.symbols.page_size.trim().is_empty() {
            return Err(EmitError::option("symbols.page_size", "must not be empty"));
        }
        if self.lint_marker.contains("*/") {
            return Err(EmitError::option("lint_marker", "must not close the comment"));
        }
        if self.banner.iter().any(|line| line.contains('\n')) {
            return Err(EmitError::option("banner", "lines must not contain newlines"));
        }
        Ok(())
    }
}

fn check_identifier(option: &'static str, name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(EmitError::option(
            option,
            format!("`{}` is not a C identifier", name),
        ))
    }
}
