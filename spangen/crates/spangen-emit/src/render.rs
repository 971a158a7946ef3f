//! Expression and field rendering
//!
//! Parentheses follow C precedence: a left operand is wrapped only when it
//! binds looser than its parent, a right operand also when it binds equally
//! (every operator here is left-associative). `Group` nodes always keep
//! their parentheses. Division is written without surrounding spaces.

use spangen_core::{BinOp, Bindings, Expr, Quantity};

use crate::error::Result;
use crate::options::{RenderStyle, SymbolNames};

/// Renders quantities with a given symbol spelling and style
#[derive(Debug, Clone, Copy)]
pub struct FieldRenderer<'a> {
    names: &'a SymbolNames,
    style: RenderStyle,
    bindings: &'a Bindings,
}

impl<'a> FieldRenderer<'a> {
    pub fn new(names: &'a SymbolNames, style: RenderStyle, bindings: &'a Bindings) -> Self {
        Self {
            names,
            style,
            bindings,
        }
    }

    /// Text of one table field.
    ///
    /// Literal style resolves expressions against the table's bindings;
    /// symbolic style writes them out.
    pub fn quantity(&self, quantity: &Quantity) -> Result<String> {
        match (self.style, quantity) {
            (_, Quantity::Literal(value)) => Ok(value.to_string()),
            (RenderStyle::Literal, Quantity::Expr(expr)) => {
                Ok(expr.eval(self.bindings)?.to_string())
            }
            (RenderStyle::Symbolic, Quantity::Expr(expr)) => Ok(self.expr(expr)),
        }
    }

    /// C source text of `expr`
    pub fn expr(&self, expr: &Expr) -> String {
        let mut out = String::new();
        self.write_expr(&mut out, expr);
        out
    }

    fn write_expr(&self, out: &mut String, expr: &Expr) {
        match expr {
            Expr::Lit(value) => out.push_str(&value.to_string()),
            Expr::Sym(symbol) => out.push_str(self.names.get(*symbol)),
            Expr::Group(inner) => {
                out.push('(');
                self.write_expr(out, inner);
                out.push(')');
            }
            Expr::Binary { op, lhs, rhs } => {
                self.write_operand(out, lhs, |inner| inner < op.precedence());
                if *op == BinOp::Div {
                    out.push_str(op.token());
                } else {
                    out.push(' ');
                    out.push_str(op.token());
                    out.push(' ');
                }
                self.write_operand(out, rhs, |inner| inner <= op.precedence());
            }
        }
    }

    fn write_operand(&self, out: &mut String, operand: &Expr, needs_parens: impl Fn(u8) -> bool) {
        match operand {
            Expr::Binary { op, .. } if needs_parens(op.precedence()) => {
                out.push('(');
                self.write_expr(out, operand);
                out.push(')');
            }
            _ => self.write_expr(out, operand),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spangen_core::{SpanSizer, Symbol};

    fn render(expr: &Expr) -> String {
        let names = SymbolNames::default();
        let bindings = Bindings::new(192, 4096);
        FieldRenderer::new(&names, RenderStyle::Symbolic, &bindings).expr(expr)
    }

    #[test]
    fn test_fine_objects_expression() {
        let expr = SpanSizer::fixed_span_objects_expr(8192u64, 16);
        assert_eq!(render(&expr), "(8192 - sizeof(SpanHeader))/16");
    }

    #[test]
    fn test_coarse_span_expression() {
        let expr = SpanSizer::fixed_count_span_expr(512, 64);
        assert_eq!(
            render(&expr),
            "((64 * 512 + sizeof(SpanHeader))/kPageSize + 1) * kPageSize"
        );
    }

    #[test]
    fn test_group_keeps_parentheses() {
        let expr = SpanSizer::fixed_span_objects_expr(Symbol::HugeSpan, 48).group();
        assert_eq!(render(&expr), "((RSPAN_SIZE - sizeof(SpanHeader))/48)");
    }

    #[test]
    fn test_right_operand_of_equal_precedence() {
        // 10 - (4 - 1) must keep its parentheses, (10 - 4) - 1 must not
        let right = Expr::Lit(10) - (Expr::Lit(4) - 1u64);
        let left = Expr::Lit(10) - 4u64 - 1u64;
        assert_eq!(render(&right), "10 - (4 - 1)");
        assert_eq!(render(&left), "10 - 4 - 1");
    }

    #[test]
    fn test_tighter_operand_needs_no_parentheses() {
        let expr = Expr::Lit(2) * 3u64 + Expr::Lit(8) / Symbol::PageSize;
        assert_eq!(render(&expr), "2 * 3 + 8/kPageSize");
    }

    #[test]
    fn test_literal_style_resolves() {
        let names = SymbolNames::default();
        let bindings = Bindings::new(192, 4096);
        let renderer = FieldRenderer::new(&names, RenderStyle::Literal, &bindings);
        let objects = Quantity::Expr(SpanSizer::fixed_span_objects_expr(8192u64, 16));
        assert_eq!(renderer.quantity(&objects).unwrap(), "500");
        assert_eq!(renderer.quantity(&Quantity::Literal(8192)).unwrap(), "8192");
    }

    #[test]
    fn test_literal_style_needs_bindings() {
        let names = SymbolNames::default();
        let bindings = Bindings::new(192, 4096);
        let renderer = FieldRenderer::new(&names, RenderStyle::Literal, &bindings);
        let span = Quantity::Expr(Expr::Sym(Symbol::HugeSpan));
        assert!(renderer.quantity(&span).is_err());
    }
}
