// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Typed hypergraph primitive shared by the table converters.
//!
//! An [`Atom`] is either a node (type + name) or a link (type + ordered
//! outgoing set + truth value). Atoms are immutable once built and are passed
//! around as [`Handle`]s. Construction goes through an [`AtomFactory`]; the
//! crate ships a stateless [`TreeFactory`] and an interning [`AtomTable`].
//!
//! # Textual forms
//!
//! [`Display`](std::fmt::Display) renders the reasoning engine's multi-line
//! s-expression layout:
//!
//! ```text
//! (ListLink
//!   (SchemaNode "i1")
//!   (SchemaNode "o")
//! )
//! ```
//!
//! [`Atom::to_short_string`] renders the same tree on one line.
//!
//! # Canonical bytes
//!
//! [`Atom::to_canonical_bytes`] is the CBOR encoding of the serde form and
//! [`Atom::content_hash`] is BLAKE3 over those bytes. Structural equality
//! implies hash equality regardless of which factory built the atom.
#![forbid(unsafe_code)]

mod factory;

pub use factory::{AtomFactory, AtomTable, TreeFactory};

use ciborium::ser::into_writer;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Node classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// Untyped node (row identifiers).
    Node,
    /// Names a column/schema element.
    SchemaNode,
    /// Carries a number in its name. The name is stored verbatim.
    NumberNode,
}

impl NodeType {
    /// Engine-facing type name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Node => "Node",
            Self::SchemaNode => "SchemaNode",
            Self::NumberNode => "NumberNode",
        }
    }
}

/// Whether a link's outgoing set is semantically ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    /// Position is meaningful.
    Ordered,
    /// Position is not meaningful; insertion order is still preserved.
    Unordered,
}

/// Link classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum LinkType {
    /// Ordered sequence.
    ListLink,
    /// Unordered collection.
    SetLink,
    /// Symmetric binary relation.
    SimilarityLink,
}

impl LinkType {
    /// Engine-facing type name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ListLink => "ListLink",
            Self::SetLink => "SetLink",
            Self::SimilarityLink => "SimilarityLink",
        }
    }

    /// Ordering semantics of this link type.
    pub const fn ordering(self) -> Ordering {
        match self {
            Self::ListLink => Ordering::Ordered,
            Self::SetLink | Self::SimilarityLink => Ordering::Unordered,
        }
    }
}

/// Simple truth value: strength and confidence in `[0, 1]`.
///
/// Equality and hashing use the bit patterns of both components so the type
/// can key hash maps.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TruthValue {
    /// Probability-like strength.
    pub strength: f64,
    /// Confidence in the strength.
    pub confidence: f64,
}

impl TruthValue {
    /// Value attached when none is given: full strength, no confidence.
    pub const DEFAULT: Self = Self::new(1.0, 0.0);
    /// Fully true, fully confident.
    pub const TRUE: Self = Self::new(1.0, 1.0);

    /// Build a truth value.
    pub const fn new(strength: f64, confidence: f64) -> Self {
        Self {
            strength,
            confidence,
        }
    }

    /// True when this equals [`TruthValue::DEFAULT`].
    pub fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }
}

impl Default for TruthValue {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl PartialEq for TruthValue {
    fn eq(&self, other: &Self) -> bool {
        self.strength.to_bits() == other.strength.to_bits()
            && self.confidence.to_bits() == other.confidence.to_bits()
    }
}

impl Eq for TruthValue {}

impl Hash for TruthValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.strength.to_bits().hash(state);
        self.confidence.to_bits().hash(state);
    }
}

impl fmt::Display for TruthValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(stv {:.6} {:.6})", self.strength, self.confidence)
    }
}

/// A hypergraph element.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Atom {
    /// Leaf element.
    Node {
        /// Node classification.
        #[serde(rename = "type")]
        ty: NodeType,
        /// Label, stored verbatim.
        name: String,
    },
    /// Composite element over other atoms.
    Link {
        /// Link classification.
        #[serde(rename = "type")]
        ty: LinkType,
        /// Children in insertion order.
        outgoing: Vec<Handle>,
        /// Attached truth value.
        #[serde(default, skip_serializing_if = "TruthValue::is_default")]
        tv: TruthValue,
    },
}

impl Atom {
    /// Engine-facing type name (`SchemaNode`, `ListLink`, ...).
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Node { ty, .. } => ty.name(),
            Self::Link { ty, .. } => ty.name(),
        }
    }

    /// True for leaf atoms.
    pub const fn is_node(&self) -> bool {
        matches!(self, Self::Node { .. })
    }

    /// True for composite atoms.
    pub const fn is_link(&self) -> bool {
        matches!(self, Self::Link { .. })
    }

    /// Node type, if this is a node.
    pub const fn node_type(&self) -> Option<NodeType> {
        match self {
            Self::Node { ty, .. } => Some(*ty),
            Self::Link { .. } => None,
        }
    }

    /// Link type, if this is a link.
    pub const fn link_type(&self) -> Option<LinkType> {
        match self {
            Self::Link { ty, .. } => Some(*ty),
            Self::Node { .. } => None,
        }
    }

    /// Node label; `None` for links.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Node { name, .. } => Some(name),
            Self::Link { .. } => None,
        }
    }

    /// Outgoing set; empty for nodes.
    pub fn outgoing(&self) -> &[Handle] {
        match self {
            Self::Node { .. } => &[],
            Self::Link { outgoing, .. } => outgoing,
        }
    }

    /// Number of outgoing atoms.
    pub fn arity(&self) -> usize {
        self.outgoing().len()
    }

    /// Attached truth value ([`TruthValue::DEFAULT`] for nodes).
    pub fn tv(&self) -> TruthValue {
        match self {
            Self::Node { .. } => TruthValue::DEFAULT,
            Self::Link { tv, .. } => *tv,
        }
    }

    /// Multi-line s-expression (same as `to_string()`).
    pub fn to_indented_string(&self) -> String {
        self.to_string()
    }

    /// Single-line s-expression.
    pub fn to_short_string(&self) -> String {
        Short(self).to_string()
    }

    /// Canonical CBOR encoding used for hashing and comparison.
    pub fn to_canonical_bytes(&self) -> Result<Vec<u8>, AtomError> {
        let mut bytes = Vec::new();
        into_writer(self, &mut bytes).map_err(|err| AtomError::Encode(err.to_string()))?;
        Ok(bytes)
    }

    /// BLAKE3 hash of the canonical encoding.
    pub fn content_hash(&self) -> Result<AtomHash, AtomError> {
        let bytes = self.to_canonical_bytes()?;
        Ok(AtomHash(*blake3::hash(&bytes).as_bytes()))
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = depth * INDENT;
        write!(f, "{:pad$}({}", "", self.type_name())?;
        match self {
            Self::Node { name, .. } => {
                f.write_str(" ")?;
                write_quoted(f, name)?;
                writeln!(f, ")")
            }
            Self::Link { outgoing, tv, .. } => {
                if !tv.is_default() {
                    write!(f, " {tv}")?;
                }
                writeln!(f)?;
                for child in outgoing {
                    child.fmt_indented(f, depth + 1)?;
                }
                writeln!(f, "{:pad$})", "")
            }
        }
    }

    fn fmt_short(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.type_name())?;
        match self {
            Self::Node { name, .. } => {
                f.write_str(" ")?;
                write_quoted(f, name)?;
            }
            Self::Link { outgoing, tv, .. } => {
                if !tv.is_default() {
                    write!(f, " {tv}")?;
                }
                for child in outgoing {
                    f.write_str(" ")?;
                    child.fmt_short(f)?;
                }
            }
        }
        f.write_str(")")
    }
}

const INDENT: usize = 2;

fn write_quoted(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in name.chars() {
        if matches!(c, '"' | '\\') {
            f.write_str("\\")?;
        }
        write!(f, "{c}")?;
    }
    f.write_str("\"")
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

struct Short<'a>(&'a Atom);

impl fmt::Display for Short<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_short(f)
    }
}

/// Shared reference to an immutable [`Atom`].
///
/// Cloning is cheap. Equality and hashing are structural; use
/// [`Handle::ptr_eq`] to test identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Handle(Arc<Atom>);

impl Handle {
    /// Wrap an atom.
    pub fn new(atom: Atom) -> Self {
        Self(Arc::new(atom))
    }

    /// True when both handles point at the same allocation.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Borrow the underlying atom.
    pub fn atom(&self) -> &Atom {
        &self.0
    }
}

impl Deref for Handle {
    type Target = Atom;

    fn deref(&self) -> &Atom {
        &self.0
    }
}

impl Borrow<Atom> for Handle {
    fn borrow(&self) -> &Atom {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

/// 32-byte BLAKE3 digest of an atom's canonical bytes.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct AtomHash(pub [u8; 32]);

impl AtomHash {
    /// View the hash as a byte array.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for AtomHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Errors raised by atom encoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AtomError {
    /// CBOR serialization failed.
    #[error("canonical encoding failed: {0}")]
    Encode(String),
}
