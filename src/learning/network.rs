//! Layer chains with an MSE training step

use rand::Rng;

use super::layer::{Activation, NeuralLayer};
use crate::Result;

/// Ordered list of dense layers trained with plain SGD.
pub struct LearnableNetwork {
    layers: Vec<NeuralLayer>,
    learning_rate: f32,
}

impl LearnableNetwork {
    pub fn new(learning_rate: f32) -> Self {
        Self {
            layers: Vec::new(),
            learning_rate,
        }
    }

    pub fn add_layer(&mut self, input_size: usize, output_size: usize, activation: Activation) {
        self.layers
            .push(NeuralLayer::new(input_size, output_size, activation));
    }

    pub fn add_layer_with_rng<R: Rng>(
        &mut self,
        input_size: usize,
        output_size: usize,
        activation: Activation,
        rng: &mut R,
    ) {
        self.layers
            .push(NeuralLayer::with_rng(input_size, output_size, activation, rng));
    }

    /// Forward pass through every layer in order
    pub fn forward(&mut self, input: &[f32]) -> Result<Vec<f32>> {
        let mut current = input.to_vec();
        for layer in &mut self.layers {
            current = layer.forward(&current)?;
        }
        Ok(current)
    }

    /// Backpropagate `output_gradient` through the layers in reverse,
    /// updating each in place
    pub fn backward(&mut self, output_gradient: &[f32]) {
        let mut current = output_gradient.to_vec();
        for layer in self.layers.iter_mut().rev() {
            current = layer.backward(&current, self.learning_rate);
        }
    }

    /// One SGD step against `target`. Returns the pre-update MSE loss.
    pub fn train(&mut self, input: &[f32], target: &[f32]) -> Result<f32> {
        let output = self.forward(input)?;

        let n = output.len() as f32;
        let mut loss = 0.0;
        let gradient: Vec<f32> = output
            .iter()
            .zip(target)
            .map(|(o, t)| {
                let error = o - t;
                loss += error * error;
                2.0 * error / n
            })
            .collect();
        loss /= n;

        self.backward(&gradient);
        Ok(loss)
    }

    pub fn set_learning_rate(&mut self, rate: f32) {
        self.learning_rate = rate;
    }

    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Input size of the first layer; 0 for an empty network
    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, |l| l.input_size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn seeded(dim: usize, lr: f32, seed: u64) -> LearnableNetwork {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut net = LearnableNetwork::new(lr);
        net.add_layer_with_rng(dim, dim * 2, Activation::Relu, &mut rng);
        net.add_layer_with_rng(dim * 2, dim, Activation::Relu, &mut rng);
        net
    }

    #[test]
    fn test_forward_chains_layers() {
        let mut net = seeded(4, 0.01, 1);
        assert_eq!(net.layer_count(), 2);
        assert_eq!(net.input_size(), 4);
        let out = net.forward(&[0.1, 0.2, 0.3, 0.4]).unwrap();
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn test_forward_rejects_wrong_input_size() {
        let mut net = seeded(4, 0.01, 1);
        assert!(net.forward(&[0.1, 0.2]).is_err());
        assert!(net.train(&[0.1, 0.2], &[0.0; 4]).is_err());
    }

    #[test]
    fn test_train_returns_nonnegative_loss_and_learns() {
        let mut net = seeded(3, 0.05, 9);
        let input = [0.2, 0.4, 0.6];
        let target = [0.5, 0.5, 0.5];

        let first = net.train(&input, &target).unwrap();
        assert!(first >= 0.0);

        let mut last = first;
        for _ in 0..100 {
            last = net.train(&input, &target).unwrap();
        }
        assert!(last <= first);
    }
}
