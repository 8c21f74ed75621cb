//! Dense layers with hand-written forward/backward passes

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::{Error, Result};

/// Activation function paired with its derivative
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    Relu,
    Sigmoid,
    Tanh,
}

impl Activation {
    pub fn apply(&self, x: f32) -> f32 {
        match self {
            Self::Relu => x.max(0.0),
            Self::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Self::Tanh => x.tanh(),
        }
    }

    /// Derivative evaluated at the pre-activation `x`
    pub fn derivative(&self, x: f32) -> f32 {
        match self {
            Self::Relu => {
                if x > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Sigmoid => {
                let s = self.apply(x);
                s * (1.0 - s)
            }
            Self::Tanh => {
                let t = x.tanh();
                1.0 - t * t
            }
        }
    }
}

/// One dense layer: `[outputs][inputs]` weights, a bias vector, and cached
/// forward-pass values for the backward pass.
///
/// Weights are He-initialized (`Normal(0, sqrt(2/inputs))`); biases start at
/// a small positive constant.
pub struct NeuralLayer {
    input_size: usize,
    output_size: usize,
    weights: Vec<Vec<f32>>,
    biases: Vec<f32>,
    activation: Activation,

    // Cached by forward() for backward()
    last_input: Vec<f32>,
    last_preactivation: Vec<f32>,
    last_output: Vec<f32>,
}

impl NeuralLayer {
    pub fn new(input_size: usize, output_size: usize, activation: Activation) -> Self {
        let mut rng = rand::thread_rng();
        Self::with_rng(input_size, output_size, activation, &mut rng)
    }

    pub fn with_rng<R: Rng>(
        input_size: usize,
        output_size: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Self {
        let std_dev = (2.0 / input_size as f32).sqrt();
        let dist = Normal::new(0.0, std_dev).expect("std-dev is finite and non-negative");

        let weights = (0..output_size)
            .map(|_| (0..input_size).map(|_| dist.sample(rng)).collect())
            .collect();

        Self {
            input_size,
            output_size,
            weights,
            biases: vec![0.01; output_size],
            activation,
            last_input: Vec::new(),
            last_preactivation: Vec::new(),
            last_output: Vec::new(),
        }
    }

    /// Forward pass; caches input, pre-activation and output
    pub fn forward(&mut self, input: &[f32]) -> Result<Vec<f32>> {
        if input.len() != self.input_size {
            return Err(Error::DimensionMismatch {
                expected: self.input_size,
                got: input.len(),
            });
        }

        self.last_input = input.to_vec();
        self.last_preactivation.clear();
        self.last_output.clear();

        for i in 0..self.output_size {
            let mut sum = self.biases[i];
            for (j, x) in input.iter().enumerate() {
                sum += self.weights[i][j] * x;
            }
            self.last_preactivation.push(sum);
            self.last_output.push(self.activation.apply(sum));
        }

        Ok(self.last_output.clone())
    }

    /// SGD backward pass: updates weights and biases in place and returns the
    /// gradient with respect to this layer's input. Must follow a `forward`.
    pub fn backward(&mut self, output_gradient: &[f32], learning_rate: f32) -> Vec<f32> {
        let mut input_gradient = vec![0.0; self.input_size];

        let preact_gradient: Vec<f32> = output_gradient
            .iter()
            .zip(&self.last_preactivation)
            .map(|(g, pre)| g * self.activation.derivative(*pre))
            .collect();

        for i in 0..self.output_size {
            for j in 0..self.input_size {
                input_gradient[j] += preact_gradient[i] * self.weights[i][j];
                self.weights[i][j] -= learning_rate * preact_gradient[i] * self.last_input[j];
            }
            self.biases[i] -= learning_rate * preact_gradient[i];
        }

        input_gradient
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }
}
