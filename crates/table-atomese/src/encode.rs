// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Header and row encoders.
//!
//! `i1,i2,o` becomes `(ListLink (SchemaNode "i1") (SchemaNode "i2") (SchemaNode "o"))`
//! and data row 1 `0,1,1` becomes
//! `(ListLink (Node "r1") (ListLink (NumberNode "0") (NumberNode "1") (NumberNode "1")))`.
//! Both are pure: same input, same structure.

use std::fmt;
use std::num::NonZeroU64;

use atomese_graph::{AtomFactory, Handle, LinkType, NodeType};

/// 1-based position of a data row (the header is not numbered).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowIndex(NonZeroU64);

impl RowIndex {
    /// Index of the first data row.
    pub const FIRST: Self = Self(NonZeroU64::MIN);

    /// `None` for zero.
    pub const fn new(n: u64) -> Option<Self> {
        match NonZeroU64::new(n) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// Numeric value (always ≥ 1).
    pub const fn get(self) -> u64 {
        self.0.get()
    }

    /// Index of the following row.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Row label text, `r{n}`.
    pub fn label(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RowIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Encode header fields as an ordered list of schema nodes.
///
/// Labels are taken verbatim; duplicates are kept.
pub fn encode_header<F, S>(factory: &F, fields: &[S]) -> Handle
where
    F: AtomFactory + ?Sized,
    S: AsRef<str>,
{
    let columns = fields
        .iter()
        .map(|field| factory.make_node(NodeType::SchemaNode, field.as_ref()))
        .collect();
    factory.make_link(LinkType::ListLink, columns)
}

/// Encode one data row as `(row label, value tuple)`.
///
/// Values are not parsed; each field's raw text becomes a number node.
pub fn encode_row<F, S>(factory: &F, fields: &[S], index: RowIndex) -> Handle
where
    F: AtomFactory + ?Sized,
    S: AsRef<str>,
{
    let values = fields
        .iter()
        .map(|field| factory.make_node(NodeType::NumberNode, field.as_ref()))
        .collect();
    let label = factory.make_node(NodeType::Node, &index.label());
    let tuple = factory.make_link(LinkType::ListLink, values);
    factory.make_link(LinkType::ListLink, vec![label, tuple])
}
