//! Knowledge space — hypergraph of typed atoms
//!
//! An [`AtomSpace`] owns an arena of [`Atom`]s indexed by dense, monotonically
//! increasing handles. Nodes carry an optional embedding; links carry an
//! ordered, fixed-arity list of outgoing handles (hyperedges). Nodes are
//! deduplicated by name; links never are.
//!
//! Locking is two-level: one coarse lock over the handle map and name index,
//! plus one lock per atom for its mutable fields (name, truth value,
//! embedding). A store-wide iteration can therefore race with a single-atom
//! mutation; each reader sees a locally consistent value.

mod atom;
mod store;
mod truth;

pub use atom::{Atom, AtomBody, AtomHandle};
pub use store::AtomSpace;
pub use truth::TruthValue;
