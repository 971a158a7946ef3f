//! Symbolic quantities
//!
//! A size class records its span size and object count twice: once as a
//! resolved number and once as a [`Quantity`], which is either that number or
//! an arithmetic [`Expr`] over constants the consuming allocator defines
//! itself (its span header size, its page size, its huge span size).
//! Keeping the expression as data lets the emitter choose the output syntax
//! while the generators stay purely numeric.

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

use crate::error::{Result, SizeClassError};

/// A constant resolved by the consumer of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    /// Size of the per-span header
    HeaderSize,
    /// OS page size
    PageSize,
    /// Span size shared by every huge-page class
    HugeSpan,
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Symbol::HeaderSize => "header_size",
            Symbol::PageSize => "page_size",
            Symbol::HugeSpan => "huge_span",
        };
        f.write_str(name)
    }
}

/// Integer binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    /// Truncating division
    Div,
}

impl BinOp {
    /// Binding strength; higher binds tighter
    pub fn precedence(self) -> u8 {
        match self {
            BinOp::Add | BinOp::Sub => 1,
            BinOp::Mul | BinOp::Div => 2,
        }
    }

    /// Operator token
    pub fn token(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }

    fn apply(self, lhs: u64, rhs: u64) -> Option<u64> {
        match self {
            BinOp::Add => lhs.checked_add(rhs),
            BinOp::Sub => lhs.checked_sub(rhs),
            BinOp::Mul => lhs.checked_mul(rhs),
            BinOp::Div => lhs.checked_div(rhs),
        }
    }
}

/// Arithmetic expression over literals and symbols
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Lit(u64),
    Sym(Symbol),
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Parentheses the renderer keeps even where precedence makes them redundant
    Group(Box<Expr>),
}

impl Expr {
    fn binary(self, op: BinOp, rhs: impl Into<Expr>) -> Expr {
        Expr::Binary {
            op,
            lhs: Box::new(self),
            rhs: Box::new(rhs.into()),
        }
    }

    /// Wrap in explicit parentheses
    pub fn group(self) -> Expr {
        Expr::Group(Box::new(self))
    }

    /// Evaluate with checked integer arithmetic.
    pub fn eval(&self, bindings: &Bindings) -> Result<u64> {
        match self {
            Expr::Lit(value) => Ok(*value),
            Expr::Sym(symbol) => bindings.get(*symbol),
            Expr::Group(inner) => inner.eval(bindings),
            Expr::Binary { op, lhs, rhs } => {
                let l = lhs.eval(bindings)?;
                let r = rhs.eval(bindings)?;
                if *op == BinOp::Div && r == 0 {
                    return Err(SizeClassError::DivisionByZero(format!("{:?}", self)));
                }
                op.apply(l, r)
                    .ok_or_else(|| SizeClassError::Overflow(format!("{:?}", self)))
            }
        }
    }

    /// Whether `symbol` occurs anywhere in the expression
    pub fn references(&self, symbol: Symbol) -> bool {
        match self {
            Expr::Lit(_) => false,
            Expr::Sym(s) => *s == symbol,
            Expr::Group(inner) => inner.references(symbol),
            Expr::Binary { lhs, rhs, .. } => lhs.references(symbol) || rhs.references(symbol),
        }
    }
}

impl<R: Into<Expr>> Add<R> for Expr {
    type Output = Expr;

    fn add(self, rhs: R) -> Expr {
        self.binary(BinOp::Add, rhs)
    }
}

impl<R: Into<Expr>> Sub<R> for Expr {
    type Output = Expr;

    fn sub(self, rhs: R) -> Expr {
        self.binary(BinOp::Sub, rhs)
    }
}

impl<R: Into<Expr>> Mul<R> for Expr {
    type Output = Expr;

    fn mul(self, rhs: R) -> Expr {
        self.binary(BinOp::Mul, rhs)
    }
}

impl<R: Into<Expr>> Div<R> for Expr {
    type Output = Expr;

    fn div(self, rhs: R) -> Expr {
        self.binary(BinOp::Div, rhs)
    }
}

impl From<u64> for Expr {
    fn from(value: u64) -> Self {
        Expr::Lit(value)
    }
}

impl From<Symbol> for Expr {
    fn from(symbol: Symbol) -> Self {
        Expr::Sym(symbol)
    }
}

/// A table field: a plain number or an expression the consumer evaluates
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Quantity {
    Literal(u64),
    Expr(Expr),
}

impl Quantity {
    pub fn resolve(&self, bindings: &Bindings) -> Result<u64> {
        match self {
            Quantity::Literal(value) => Ok(*value),
            Quantity::Expr(expr) => expr.eval(bindings),
        }
    }

    pub fn references(&self, symbol: Symbol) -> bool {
        match self {
            Quantity::Literal(_) => false,
            Quantity::Expr(expr) => expr.references(symbol),
        }
    }
}

impl From<Expr> for Quantity {
    fn from(expr: Expr) -> Self {
        Quantity::Expr(expr)
    }
}

/// Numeric values for the symbols a table may reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bindings {
    pub header_size: u64,
    pub page_size: u64,
    pub huge_span: Option<u64>,
}

impl Bindings {
    pub fn new(header_size: u64, page_size: u64) -> Self {
        Self {
            header_size,
            page_size,
            huge_span: None,
        }
    }

    pub fn with_huge_span(mut self, huge_span: u64) -> Self {
        self.huge_span = Some(huge_span);
        self
    }

    pub fn get(&self, symbol: Symbol) -> Result<u64> {
        match symbol {
            Symbol::HeaderSize => Ok(self.header_size),
            Symbol::PageSize => Ok(self.page_size),
            Symbol::HugeSpan => self.huge_span.ok_or(SizeClassError::UnboundSymbol(symbol)),
        }
    }
}
