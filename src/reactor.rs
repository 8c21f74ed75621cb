//! FusionReactor — facade composing the knowledge store, embedding space,
//! learner, and orchestrator, plus relevance/attention bookkeeping

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::embedding::{Embedding, EmbeddingSpace};
use crate::learning::EmbeddingLearner;
use crate::orchestration::{Agent, AgentMessage, AgentOrchestrator, CognitiveAgent, Strategy};
use crate::space::{Atom, AtomHandle, AtomSpace};
use crate::Result;

/// Attention triple per atom: short-, long-, and very-long-term importance.
///
/// Conventionally each component stays in [0, 1], but writes are not clamped.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttentionValue {
    pub sti: f32,
    pub lti: f32,
    pub vlti: f32,
}

impl AttentionValue {
    /// Spread target for handles that never had attention set
    pub const ZERO: Self = Self {
        sti: 0.0,
        lti: 0.0,
        vlti: 0.0,
    };

    pub fn new(sti: f32, lti: f32, vlti: f32) -> Self {
        Self { sti, lti, vlti }
    }
}

impl Default for AttentionValue {
    fn default() -> Self {
        Self {
            sti: 0.5,
            lti: 0.5,
            vlti: 0.5,
        }
    }
}

/// Point-in-time system counters.
///
/// Read from three independently locked sources without a shared snapshot
/// lock; under concurrent mutation the fields may be mutually inconsistent.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SystemStats {
    pub atom_count: usize,
    pub embedding_count: usize,
    pub agent_count: usize,
    pub orchestration_running: bool,
}

/// The cognitive fusion core.
///
/// Composes one [`AtomSpace`], one [`EmbeddingSpace`], one
/// [`EmbeddingLearner`], one [`AgentOrchestrator`], and two side-tables
/// (relevance, attention), each under its own lock. The embedding space and
/// the learner are unsynchronized internally and are serialized here at the
/// facade boundary.
///
/// Lock discipline: no two side-table locks are ever held together except in
/// [`FusionReactor::spread_attention`], which holds the attention lock while
/// taking the store lock — nothing acquires those two in the other order.
/// There is deliberately no atomicity across the store, the side-tables and
/// the embedding space: `add_concept` is three independent locked writes.
///
/// Note that [`AtomSpace::clear`] (reachable via [`FusionReactor::atomspace`])
/// does not reset the relevance/attention tables; entries for cleared atoms
/// linger and apply to handles reissued after the clear.
pub struct FusionReactor {
    atomspace: AtomSpace,
    embeddings: Mutex<EmbeddingSpace>,
    learner: Mutex<EmbeddingLearner>,
    orchestrator: Arc<AgentOrchestrator>,
    relevance: Mutex<HashMap<AtomHandle, f32>>,
    attention: Mutex<HashMap<AtomHandle, AttentionValue>>,
    embedding_dims: usize,
    learning_rate: Mutex<f32>,
}

impl FusionReactor {
    pub fn new(embedding_dims: usize, learning_rate: f32) -> Self {
        Self {
            atomspace: AtomSpace::new(),
            embeddings: Mutex::new(EmbeddingSpace::new(embedding_dims)),
            learner: Mutex::new(EmbeddingLearner::new(embedding_dims, learning_rate)),
            orchestrator: AgentOrchestrator::new(),
            relevance: Mutex::new(HashMap::new()),
            attention: Mutex::new(HashMap::new()),
            embedding_dims,
            learning_rate: Mutex::new(learning_rate),
        }
    }

    // === Knowledge management ===

    /// Create (or reuse) a concept node.
    ///
    /// The embedding also enters the embedding space under the concept's
    /// name, but only when present and of the configured dimensionality; a
    /// mismatched embedding is skipped silently (it still lands on the node
    /// itself, where the store is permissive). Relevance and attention start
    /// neutral.
    pub fn add_concept(&self, name: &str, embedding: Option<Embedding>) -> Arc<Atom> {
        let node = self.atomspace.add_node(name, embedding.clone());

        if let Some(e) = embedding {
            if e.dimensions() == self.embedding_dims {
                // Infallible: dimensionality checked above
                let _ = self.embeddings.lock().add(name, e);
            }
        }

        self.set_relevance(node.handle(), 0.5);
        self.set_attention(node.handle(), AttentionValue::default());

        node
    }

    /// Create a relation link. Initializes relevance only; links get no
    /// attention entry until one is set explicitly.
    pub fn add_relation(&self, link_type: &str, outgoing: Vec<AtomHandle>) -> Arc<Atom> {
        let link = self.atomspace.add_link(link_type, outgoing);
        self.set_relevance(link.handle(), 0.5);
        link
    }

    /// `InheritanceLink(child, parent)`
    pub fn add_inheritance(&self, child: AtomHandle, parent: AtomHandle) -> Arc<Atom> {
        self.add_relation("InheritanceLink", vec![child, parent])
    }

    /// `SimilarityLink(a, b)`
    pub fn add_similarity(&self, a: AtomHandle, b: AtomHandle) -> Arc<Atom> {
        self.add_relation("SimilarityLink", vec![a, b])
    }

    /// `EvaluationLink(predicate, args...)`
    pub fn add_evaluation(&self, predicate: AtomHandle, args: &[AtomHandle]) -> Arc<Atom> {
        let mut outgoing = Vec::with_capacity(args.len() + 1);
        outgoing.push(predicate);
        outgoing.extend_from_slice(args);
        self.add_relation("EvaluationLink", outgoing)
    }

    /// k-NN over the named embedding space. A query of the wrong
    /// dimensionality is a hard error.
    pub fn query_similar(
        &self,
        query: &Embedding,
        k: usize,
        threshold: f32,
    ) -> Result<Vec<(String, f32)>> {
        self.embeddings.lock().find_nearest(query, k, threshold)
    }

    // === Relevance realization ===

    /// Set an atom's salience, clamped to [0, 1]
    pub fn set_relevance(&self, handle: AtomHandle, relevance: f32) {
        self.relevance
            .lock()
            .insert(handle, relevance.clamp(0.0, 1.0));
    }

    /// Salience for `handle`; 0.5 before any write
    pub fn get_relevance(&self, handle: AtomHandle) -> f32 {
        self.relevance.lock().get(&handle).copied().unwrap_or(0.5)
    }

    /// Shift relevance by `delta`, clamped to [0, 1]. A handle never written
    /// before starts from 0.0 on this path (unlike the getter's 0.5 default).
    ///
    /// A positive delta also raises the handle's short-term importance by
    /// half the delta, capped at 1.0 — but only when an attention entry
    /// already exists.
    pub fn update_relevance(&self, handle: AtomHandle, delta: f32) {
        {
            let mut table = self.relevance.lock();
            let relevance = table.entry(handle).or_insert(0.0);
            *relevance = (*relevance + delta).clamp(0.0, 1.0);
        }

        if delta > 0.0 {
            if let Some(attention) = self.attention.lock().get_mut(&handle) {
                attention.sti = (attention.sti + delta * 0.5).min(1.0);
            }
        }
    }

    // === Attention allocation ===

    /// Set an atom's attention triple. Not clamped.
    pub fn set_attention(&self, handle: AtomHandle, attention: AttentionValue) {
        self.attention.lock().insert(handle, attention);
    }

    /// Attention for `handle`; (0.5, 0.5, 0.5) before any write
    pub fn get_attention(&self, handle: AtomHandle) -> AttentionValue {
        self.attention
            .lock()
            .get(&handle)
            .copied()
            .unwrap_or_default()
    }

    /// One hop of importance spreading.
    ///
    /// Every entry with sti > 0.7 that resolves to a link raises the sti of
    /// each atom in its outgoing list by 0.1, capped at 1.0 (targets without
    /// an entry start from zero). Source stis are unchanged. Single pass, not
    /// a fixed point: call repeatedly for multi-hop spread.
    pub fn spread_attention(&self) {
        let mut attention = self.attention.lock();

        let focused: Vec<AtomHandle> = attention
            .iter()
            .filter(|(_, value)| value.sti > 0.7)
            .map(|(handle, _)| *handle)
            .collect();

        for handle in focused {
            let Some(atom) = self.atomspace.get_atom(handle) else {
                continue;
            };
            if !atom.is_link() {
                continue;
            }
            for target in atom.outgoing() {
                let entry = attention.entry(*target).or_insert(AttentionValue::ZERO);
                entry.sti = (entry.sti + 0.1).min(1.0);
            }
        }
    }

    // === Neural learning ===

    /// Learn from similarity feedback between two named concepts.
    ///
    /// Returns the sentinel `-1.0` (network untouched) when either name has
    /// no stored embedding; a legitimate loss is always ≥ 0.
    pub fn learn_similarity(&self, name1: &str, name2: &str, target: f32) -> Result<f32> {
        let (e1, e2) = {
            let embeddings = self.embeddings.lock();
            match (embeddings.get(name1), embeddings.get(name2)) {
                (Some(a), Some(b)) => (a.clone(), b.clone()),
                _ => {
                    trace!(name1, name2, "similarity feedback for unknown embedding");
                    return Ok(-1.0);
                }
            }
        };

        self.learner.lock().learn_from_similarity(&e1, &e2, target)
    }

    /// Run the learned embedding transform
    pub fn transform_embedding(&self, embedding: &Embedding) -> Result<Embedding> {
        self.learner.lock().transform(embedding)
    }

    // === Agent orchestration ===

    pub fn register_agent(&self, agent: Arc<dyn Agent>) {
        self.orchestrator.register_agent(agent);
    }

    /// Build a [`CognitiveAgent`] and register it in one step
    pub fn create_agent(&self, id: &str, name: &str) -> Arc<CognitiveAgent> {
        let agent = Arc::new(CognitiveAgent::new(id, name));
        self.orchestrator
            .register_agent(Arc::clone(&agent) as Arc<dyn Agent>);
        agent
    }

    pub fn start_orchestration(&self) {
        self.orchestrator.start();
    }

    pub fn stop_orchestration(&self) {
        self.orchestrator.stop();
    }

    pub fn run_orchestration_cycle(&self) {
        self.orchestrator.run_cycle();
    }

    pub fn set_orchestration_strategy(&self, strategy: Strategy) {
        self.orchestrator.set_strategy(strategy);
    }

    pub fn send_message(&self, message: AgentMessage) {
        self.orchestrator.send_message(message);
    }

    pub fn broadcast(&self, message: AgentMessage) {
        self.orchestrator.broadcast(message);
    }

    // === Component access & configuration ===

    pub fn atomspace(&self) -> &AtomSpace {
        &self.atomspace
    }

    pub fn orchestrator(&self) -> &Arc<AgentOrchestrator> {
        &self.orchestrator
    }

    pub fn embedding_dims(&self) -> usize {
        self.embedding_dims
    }

    pub fn learning_rate(&self) -> f32 {
        *self.learning_rate.lock()
    }

    pub fn set_learning_rate(&self, rate: f32) {
        *self.learning_rate.lock() = rate;
        self.learner.lock().set_learning_rate(rate);
    }

    // === System state ===

    pub fn get_system_stats(&self) -> SystemStats {
        SystemStats {
            atom_count: self.atomspace.size(),
            embedding_count: self.embeddings.lock().len(),
            agent_count: self.orchestrator.agent_count(),
            orchestration_running: self.orchestrator.is_running(),
        }
    }
}
