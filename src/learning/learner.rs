//! Embedding learner — fixed two-layer transform trained from similarity
//! feedback

use rand::Rng;

use super::layer::Activation;
use super::network::LearnableNetwork;
use crate::embedding::Embedding;
use crate::Result;

/// Learned embedding transform: a `dim → 2·dim → dim` ReLU network adapted
/// from (concept, concept, target-similarity) feedback.
///
/// The similarity update is a heuristic proxy gradient, not an exact
/// derivative of the cosine objective: the network is nudged toward a
/// synthetic target built from the gap between current and desired
/// similarity. Kept as-is deliberately; exact backpropagation through the
/// cosine would change the learning dynamics.
pub struct EmbeddingLearner {
    dimensions: usize,
    network: LearnableNetwork,
}

impl EmbeddingLearner {
    pub fn new(dimensions: usize, learning_rate: f32) -> Self {
        let mut network = LearnableNetwork::new(learning_rate);
        network.add_layer(dimensions, dimensions * 2, Activation::Relu);
        network.add_layer(dimensions * 2, dimensions, Activation::Relu);
        Self {
            dimensions,
            network,
        }
    }

    pub fn with_rng<R: Rng>(dimensions: usize, learning_rate: f32, rng: &mut R) -> Self {
        let mut network = LearnableNetwork::new(learning_rate);
        network.add_layer_with_rng(dimensions, dimensions * 2, Activation::Relu, rng);
        network.add_layer_with_rng(dimensions * 2, dimensions, Activation::Relu, rng);
        Self {
            dimensions,
            network,
        }
    }

    /// Run the learned transform. Fails on input dimension mismatch.
    pub fn transform(&mut self, input: &Embedding) -> Result<Embedding> {
        let output = self.network.forward(input.as_slice())?;
        Ok(Embedding::from(output))
    }

    /// One similarity-feedback step.
    ///
    /// Transforms both inputs, measures their cosine similarity, and reports
    /// `(current − target)²` as the loss — computed before any weight update.
    /// A synthetic target for `e1` is built by nudging each component toward
    /// the transform of `e2`, scaled by `0.1·(target − current)`, and exactly
    /// one SGD step is taken on `(e1, synthetic)`. Only `e1`'s pathway is
    /// trained directly; `e2` moves via the shared weights.
    pub fn learn_from_similarity(
        &mut self,
        e1: &Embedding,
        e2: &Embedding,
        target_similarity: f32,
    ) -> Result<f32> {
        let t1 = self.transform(e1)?;
        let t2 = self.transform(e2)?;

        let current_similarity = t1.cosine_similarity(&t2);
        let loss = (current_similarity - target_similarity).powi(2);

        let adjustment = (target_similarity - current_similarity) * 0.1;
        let synthetic: Vec<f32> = (0..self.dimensions)
            .map(|i| e1[i] + adjustment * (t2[i] - t1[i]))
            .collect();

        self.network.train(e1.as_slice(), &synthetic)?;

        Ok(loss)
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn set_learning_rate(&mut self, rate: f32) {
        self.network.set_learning_rate(rate);
    }

    pub fn learning_rate(&self) -> f32 {
        self.network.learning_rate()
    }
}
