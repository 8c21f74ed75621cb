//! AtomSpace — the hypergraph knowledge store

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::atom::{Atom, AtomHandle};
use crate::embedding::Embedding;

struct SpaceMaps {
    atoms: HashMap<AtomHandle, Arc<Atom>>,
    name_index: HashMap<String, Vec<AtomHandle>>,
    next_handle: AtomHandle,
}

/// Hypergraph knowledge store.
///
/// Owns the handle → atom arena and a secondary name → handles index (link
/// types are indexed under their type name). One coarse lock serializes every
/// store operation; each atom's mutable fields carry their own lock (see
/// [`Atom`]).
///
/// Atoms are never destroyed individually. [`AtomSpace::clear`] empties both
/// maps and resets the handle counter atomically with respect to concurrent
/// readers.
pub struct AtomSpace {
    inner: Mutex<SpaceMaps>,
}

impl AtomSpace {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SpaceMaps {
                atoms: HashMap::new(),
                name_index: HashMap::new(),
                next_handle: 0,
            }),
        }
    }

    /// Add a concept node, deduplicating by name.
    ///
    /// If a node with this name already exists, the existing node is returned
    /// and the embedding argument is ignored. Only nodes deduplicate; a link
    /// type sharing the name does not count as a match.
    pub fn add_node(&self, name: &str, embedding: Option<Embedding>) -> Arc<Atom> {
        let mut maps = self.inner.lock();

        if let Some(handles) = maps.name_index.get(name) {
            for handle in handles {
                if let Some(existing) = maps.atoms.get(handle) {
                    if existing.is_node() {
                        return Arc::clone(existing);
                    }
                }
            }
        }

        maps.next_handle += 1;
        let handle = maps.next_handle;
        let node = Arc::new(Atom::node(handle, name, embedding));
        maps.atoms.insert(handle, Arc::clone(&node));
        maps.name_index
            .entry(name.to_string())
            .or_default()
            .push(handle);
        node
    }

    /// Add a link over an ordered list of atom handles. Links always create a
    /// fresh atom, even for an identical type + outgoing list.
    pub fn add_link(&self, link_type: &str, outgoing: Vec<AtomHandle>) -> Arc<Atom> {
        let mut maps = self.inner.lock();

        maps.next_handle += 1;
        let handle = maps.next_handle;
        let link = Arc::new(Atom::link(handle, link_type, outgoing));
        maps.atoms.insert(handle, Arc::clone(&link));
        maps.name_index
            .entry(link_type.to_string())
            .or_default()
            .push(handle);
        link
    }

    pub fn get_atom(&self, handle: AtomHandle) -> Option<Arc<Atom>> {
        self.inner.lock().atoms.get(&handle).cloned()
    }

    pub fn get_atoms_by_name(&self, name: &str) -> Vec<Arc<Atom>> {
        let maps = self.inner.lock();
        match maps.name_index.get(name) {
            Some(handles) => handles
                .iter()
                .filter_map(|h| maps.atoms.get(h).cloned())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Snapshot copy of every atom, in no particular order.
    pub fn get_all_atoms(&self) -> Vec<Arc<Atom>> {
        self.inner.lock().atoms.values().cloned().collect()
    }

    /// Scan every node carrying an embedding and rank by cosine similarity.
    ///
    /// Results are filtered by `threshold`, sorted descending, truncated to
    /// `k`. Dimension mismatches and zero-norm vectors score 0.0 rather than
    /// erroring; the query engine treats degenerate input as "not similar".
    pub fn query_similar(
        &self,
        query: &Embedding,
        k: usize,
        threshold: f32,
    ) -> Vec<(Arc<Atom>, f32)> {
        let maps = self.inner.lock();

        let mut scored: Vec<(Arc<Atom>, f32)> = maps
            .atoms
            .values()
            .filter_map(|atom| {
                let embedding = atom.embedding()?;
                let sim = query.cosine_similarity(&embedding);
                (sim >= threshold).then(|| (Arc::clone(atom), sim))
            })
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
    }

    pub fn size(&self) -> usize {
        self.inner.lock().atoms.len()
    }

    /// Empty both maps and reset the handle counter to 0.
    pub fn clear(&self) {
        let mut maps = self.inner.lock();
        maps.atoms.clear();
        maps.name_index.clear();
        maps.next_handle = 0;
    }

    // === Well-known link constructors ===

    /// `InheritanceLink(child, parent)`
    pub fn inheritance(&self, child: AtomHandle, parent: AtomHandle) -> Arc<Atom> {
        self.add_link("InheritanceLink", vec![child, parent])
    }

    /// `SimilarityLink(a, b)`
    pub fn similarity(&self, a: AtomHandle, b: AtomHandle) -> Arc<Atom> {
        self.add_link("SimilarityLink", vec![a, b])
    }

    /// `EvaluationLink(predicate, args...)`
    pub fn evaluation(&self, predicate: AtomHandle, args: &[AtomHandle]) -> Arc<Atom> {
        let mut outgoing = Vec::with_capacity(args.len() + 1);
        outgoing.push(predicate);
        outgoing.extend_from_slice(args);
        self.add_link("EvaluationLink", outgoing)
    }
}

impl Default for AtomSpace {
    fn default() -> Self {
        Self::new()
    }
}
