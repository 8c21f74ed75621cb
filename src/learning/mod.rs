//! Learning layer — manual feed-forward network and embedding learner
//!
//! [`NeuralLayer`] and [`LearnableNetwork`] implement dense layers with
//! hand-written forward/backward passes and plain SGD (no momentum, no
//! regularization). [`EmbeddingLearner`] wraps a fixed two-layer transform
//! (`dim → 2·dim → dim`) and trains it from similarity feedback via a
//! documented heuristic proxy gradient.
//!
//! Nothing here synchronizes internally; confine to one thread or serialize
//! externally.

mod layer;
mod learner;
mod network;

pub use layer::{Activation, NeuralLayer};
pub use learner::EmbeddingLearner;
pub use network::LearnableNetwork;
