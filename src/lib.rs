//! # Fusion Reactor
//!
//! In-process cognitive fusion core: hypergraph knowledge + learned embeddings
//! + attention allocation + multi-agent orchestration.
//!
//! ## Quick Start
//! ```rust
//! use fusion_reactor::{Agent, AgentMessage, Embedding, FusionReactor};
//!
//! // 4-dimensional embedding space, learning rate 0.01
//! let reactor = FusionReactor::new(4, 0.01);
//!
//! // Knowledge ingestion
//! let cat = reactor.add_concept("cat", Some(Embedding::from(vec![0.8, 0.2, 0.9, 0.1])));
//! let animal = reactor.add_concept("animal", None);
//! reactor.add_inheritance(cat.handle(), animal.handle());
//!
//! // Semantic query
//! let hits = reactor.query_similar(&Embedding::from(vec![0.8, 0.2, 0.9, 0.1]), 5, 0.0).unwrap();
//! assert_eq!(hits[0].0, "cat");
//!
//! // Agents
//! let alice = reactor.create_agent("a1", "alice");
//! let bob = reactor.create_agent("a2", "bob");
//! reactor.send_message(AgentMessage::new("a1", "a2", "greeting", "hello"));
//! assert!(bob.has_messages());
//! # let _ = alice;
//! ```
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      FUSION REACTOR                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │   space         → hypergraph of typed atoms + truth values  │
//! │   embedding     → named vectors, cosine k-NN                │
//! │   learning      → manual feed-forward net + proxy-gradient  │
//! │                   similarity learner                        │
//! │   orchestration → agents, FIFO message queues, sequential   │
//! │                   or one-thread-per-agent scheduling        │
//! │   reactor       → facade + relevance/attention side-tables  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency model
//!
//! The store is coarse-locked with per-atom locks for mutable fields. The
//! embedding space and the learner are unsynchronized internally and are
//! serialized behind facade-boundary locks. Relevance and attention tables
//! each have their own lock; there is no atomic snapshot across tables.

// === Core modules ===
pub mod embedding;
pub mod learning;
pub mod orchestration;
pub mod space;

mod reactor;

// === Re-exports ===
pub use embedding::{Embedding, EmbeddingSpace};
pub use learning::{Activation, EmbeddingLearner, LearnableNetwork, NeuralLayer};
pub use orchestration::{
    Agent, AgentCore, AgentMessage, AgentOrchestrator, AgentState, CognitiveAgent, Strategy,
};
pub use reactor::{AttentionValue, FusionReactor, SystemStats};
pub use space::{Atom, AtomHandle, AtomSpace, TruthValue};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// === Error types ===

/// Crate-level error type
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("no messages queued for agent {0}")]
    NoMessages(String),
}

pub type Result<T> = std::result::Result<T, Error>;
