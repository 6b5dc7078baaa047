// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Atom construction port and its two stock implementations.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use crate::{Atom, Handle, LinkType, NodeType, TruthValue};

/// Constructs atoms.
///
/// Implementations take `&self` so one factory can serve several conversions,
/// possibly on several threads; any state they keep must be internally
/// synchronized.
pub trait AtomFactory: Send + Sync {
    /// Build a leaf atom carrying `name` verbatim.
    fn make_node(&self, ty: NodeType, name: &str) -> Handle;

    /// Build a link over `outgoing` with an explicit truth value.
    fn make_link_with_tv(&self, ty: LinkType, outgoing: Vec<Handle>, tv: TruthValue) -> Handle;

    /// Build a link over `outgoing` with the default truth value.
    fn make_link(&self, ty: LinkType, outgoing: Vec<Handle>) -> Handle {
        self.make_link_with_tv(ty, outgoing, TruthValue::DEFAULT)
    }
}

impl<F: AtomFactory + ?Sized> AtomFactory for &F {
    fn make_node(&self, ty: NodeType, name: &str) -> Handle {
        (**self).make_node(ty, name)
    }

    fn make_link_with_tv(&self, ty: LinkType, outgoing: Vec<Handle>, tv: TruthValue) -> Handle {
        (**self).make_link_with_tv(ty, outgoing, tv)
    }
}

/// Stateless factory: every call allocates a fresh atom.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeFactory;

impl AtomFactory for TreeFactory {
    fn make_node(&self, ty: NodeType, name: &str) -> Handle {
        Handle::new(Atom::Node {
            ty,
            name: name.to_owned(),
        })
    }

    fn make_link_with_tv(&self, ty: LinkType, outgoing: Vec<Handle>, tv: TruthValue) -> Handle {
        Handle::new(Atom::Link { ty, outgoing, tv })
    }
}

/// Interning factory: structurally equal atoms share one allocation.
///
/// Links keep the insertion order of their outgoing set, so two sets with the
/// same members in a different order are distinct entries.
#[derive(Debug, Default)]
pub struct AtomTable {
    atoms: Mutex<HashSet<Handle>>,
}

impl AtomTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct atoms held.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when no atom has been built yet.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Return the shared handle for `atom`, inserting it if absent.
    pub fn intern(&self, atom: Atom) -> Handle {
        let mut atoms = self.lock();
        if let Some(existing) = atoms.get(&atom) {
            return existing.clone();
        }
        let handle = Handle::new(atom);
        atoms.insert(handle.clone());
        handle
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<Handle>> {
        // Entries are inserted whole, so a poisoned set is still consistent.
        self.atoms.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AtomFactory for AtomTable {
    fn make_node(&self, ty: NodeType, name: &str) -> Handle {
        self.intern(Atom::Node {
            ty,
            name: name.to_owned(),
        })
    }

    fn make_link_with_tv(&self, ty: LinkType, outgoing: Vec<Handle>, tv: TruthValue) -> Handle {
        self.intern(Atom::Link { ty, outgoing, tv })
    }
}
