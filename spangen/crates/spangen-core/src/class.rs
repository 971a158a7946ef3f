//! The size-class record.

use std::fmt;

use crate::expr::Quantity;

/// Which generator produced a class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Sentinel,
    Fine,
    Coarse,
    Huge,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::Sentinel => "sentinel",
            Tier::Fine => "fine",
            Tier::Coarse => "coarse",
            Tier::Huge => "huge",
        };
        f.write_str(name)
    }
}

/// One table entry
///
/// `span_size` and `objects_per_span` are the resolved numbers used for
/// validation and lookup. `span` and `objects` are the same values as the
/// consumer will see them, possibly as expressions over its own constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeClass {
    pub index: usize,
    pub tier: Tier,
    pub object_size: u64,
    pub span_size: u64,
    pub objects_per_span: u64,
    pub span: Quantity,
    pub objects: Quantity,
}

impl SizeClass {
    /// The reserved index-0 entry
    pub fn sentinel() -> Self {
        Self {
            index: 0,
            tier: Tier::Sentinel,
            object_size: 0,
            span_size: 0,
            objects_per_span: 0,
            span: Quantity::Literal(0),
            objects: Quantity::Literal(0),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.index == 0
    }

    /// Bytes of payload the objects occupy
    pub fn payload(&self) -> u64 {
        self.objects_per_span * self.object_size
    }

    /// Span bytes left unused after the header and all objects.
    pub fn slack(&self, header_size: u64) -> u64 {
        self.span_size
            .saturating_sub(header_size)
            .saturating_sub(self.payload())
    }
}
