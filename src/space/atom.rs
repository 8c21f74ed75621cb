//! Atoms — nodes and links in the knowledge hypergraph
//!
//! Atoms live in an arena owned by the [`AtomSpace`](super::AtomSpace) and are
//! shared out as `Arc<Atom>`. Links reference other atoms by plain handle, not
//! by pointer, so ownership stays with the store and the "never destroyed
//! individually" invariant holds trivially.

use parking_lot::RwLock;

use super::AtomSpace;
use super::truth::TruthValue;
use crate::embedding::Embedding;

/// Opaque atom identifier. Assigned once by the store, starts at 1,
/// monotonically increasing, never reused until a store-wide clear.
pub type AtomHandle = u64;

/// The immutable variant-specific part of an atom.
pub enum AtomBody {
    /// Concept node with an optional embedding slot
    Node {
        embedding: RwLock<Option<Embedding>>,
    },
    /// Hyperedge over an ordered, fixed-arity list of atoms
    Link { outgoing: Vec<AtomHandle> },
}

/// Mutable fields shared by all atoms, guarded per-atom.
struct AtomState {
    name: String,
    truth: TruthValue,
}

/// A node or link in the hypergraph.
///
/// The handle and body shape are immutable; name, truth value and (for nodes)
/// the embedding are mutable behind this atom's own lock. Holding an
/// `Arc<Atom>` obtained from the store does not protect against concurrent
/// mutation of those fields.
pub struct Atom {
    handle: AtomHandle,
    state: RwLock<AtomState>,
    body: AtomBody,
}

impl Atom {
    pub(super) fn node(handle: AtomHandle, name: &str, embedding: Option<Embedding>) -> Self {
        Self {
            handle,
            state: RwLock::new(AtomState {
                name: name.to_string(),
                truth: TruthValue::certain(),
            }),
            body: AtomBody::Node {
                embedding: RwLock::new(embedding),
            },
        }
    }

    pub(super) fn link(handle: AtomHandle, link_type: &str, outgoing: Vec<AtomHandle>) -> Self {
        Self {
            handle,
            state: RwLock::new(AtomState {
                name: link_type.to_string(),
                truth: TruthValue::certain(),
            }),
            body: AtomBody::Link { outgoing },
        }
    }

    pub fn handle(&self) -> AtomHandle {
        self.handle
    }

    /// Node name, or link type for links
    pub fn name(&self) -> String {
        self.state.read().name.clone()
    }

    pub fn set_name(&self, name: &str) {
        self.state.write().name = name.to_string();
    }

    pub fn truth_value(&self) -> TruthValue {
        self.state.read().truth
    }

    pub fn set_truth_value(&self, truth: TruthValue) {
        self.state.write().truth = truth;
    }

    pub fn body(&self) -> &AtomBody {
        &self.body
    }

    pub fn is_node(&self) -> bool {
        matches!(self.body, AtomBody::Node { .. })
    }

    pub fn is_link(&self) -> bool {
        matches!(self.body, AtomBody::Link { .. })
    }

    /// Embedding snapshot. `None` for links and for nodes without one.
    pub fn embedding(&self) -> Option<Embedding> {
        match &self.body {
            AtomBody::Node { embedding } => embedding.read().clone(),
            AtomBody::Link { .. } => None,
        }
    }

    pub fn has_embedding(&self) -> bool {
        match &self.body {
            AtomBody::Node { embedding } => embedding.read().is_some(),
            AtomBody::Link { .. } => false,
        }
    }

    /// Replace a node's embedding wholesale. No-op for links.
    pub fn set_embedding(&self, new: Embedding) {
        if let AtomBody::Node { embedding } = &self.body {
            *embedding.write() = Some(new);
        }
    }

    /// Outgoing handles for links; empty for nodes.
    pub fn outgoing(&self) -> &[AtomHandle] {
        match &self.body {
            AtomBody::Link { outgoing } => outgoing,
            AtomBody::Node { .. } => &[],
        }
    }

    pub fn arity(&self) -> usize {
        self.outgoing().len()
    }

    /// Human-readable rendering: `Node("cat")` or `InheritanceLink(cat, animal)`.
    ///
    /// Link targets are resolved through the store since links hold handles;
    /// a dangling handle (only possible after a store clear) renders as `?`.
    pub fn to_display(&self, space: &AtomSpace) -> String {
        match &self.body {
            AtomBody::Node { .. } => format!("Node(\"{}\")", self.name()),
            AtomBody::Link { outgoing } => {
                let targets: Vec<String> = outgoing
                    .iter()
                    .map(|h| {
                        space
                            .get_atom(*h)
                            .map(|a| a.name())
                            .unwrap_or_else(|| "?".to_string())
                    })
                    .collect();
                format!("{}({})", self.name(), targets.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_embedding_lifecycle() {
        let atom = Atom::node(1, "cat", None);
        assert!(atom.is_node());
        assert!(!atom.has_embedding());

        atom.set_embedding(Embedding::from(vec![1.0, 0.0]));
        assert!(atom.has_embedding());

        // Replaced wholesale
        atom.set_embedding(Embedding::from(vec![0.0, 1.0]));
        assert_eq!(atom.embedding().unwrap()[1], 1.0);
    }

    #[test]
    fn test_link_arity_and_outgoing() {
        let link = Atom::link(3, "InheritanceLink", vec![1, 2]);
        assert!(link.is_link());
        assert!(!link.has_embedding());
        assert_eq!(link.arity(), 2);
        assert_eq!(link.outgoing(), &[1, 2]);
    }

    #[test]
    fn test_mutable_name_and_truth() {
        let atom = Atom::node(1, "cat", None);
        atom.set_name("feline");
        assert_eq!(atom.name(), "feline");

        atom.set_truth_value(TruthValue::new(0.9, 0.5));
        assert!((atom.truth_value().expectation() - 0.45).abs() < 1e-6);
    }
}
