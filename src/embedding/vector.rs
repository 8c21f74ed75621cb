//! Embedding vectors and their algebra

use std::ops::{Index, IndexMut};

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Guard against division by near-zero norms in cosine similarity
const NORM_EPSILON: f32 = 1e-8;

/// Fixed-length float vector representing a semantic position.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    data: Vec<f32>,
}

impl Embedding {
    /// Zero vector of the given dimensionality
    pub fn zeros(dims: usize) -> Self {
        Self {
            data: vec![0.0; dims],
        }
    }

    /// Xavier-style random vector: Gaussian with std-dev `scale / sqrt(dims)`
    pub fn random(dims: usize, scale: f32) -> Self {
        let mut rng = rand::thread_rng();
        Self::random_with(dims, scale, &mut rng)
    }

    pub fn random_with<R: Rng>(dims: usize, scale: f32, rng: &mut R) -> Self {
        let std_dev = scale / (dims as f32).sqrt();
        let dist = Normal::new(0.0, std_dev).expect("std-dev is finite and non-negative");
        Self {
            data: (0..dims).map(|_| dist.sample(rng)).collect(),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.data.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Cosine similarity, permissive: a dimension mismatch or a zero-norm
    /// operand yields 0.0 rather than an error.
    pub fn cosine_similarity(&self, other: &Self) -> f32 {
        if self.data.len() != other.data.len() || self.data.is_empty() {
            return 0.0;
        }

        let mut dot = 0.0f32;
        let mut norm_a = 0.0f32;
        let mut norm_b = 0.0f32;
        for (a, b) in self.data.iter().zip(&other.data) {
            dot += a * b;
            norm_a += a * a;
            norm_b += b * b;
        }

        let denom = norm_a.sqrt() * norm_b.sqrt();
        if denom < NORM_EPSILON {
            return 0.0;
        }
        dot / denom
    }

    /// Euclidean distance; `f32::MAX` on dimension mismatch
    pub fn euclidean_distance(&self, other: &Self) -> f32 {
        if self.data.len() != other.data.len() {
            return f32::MAX;
        }
        self.data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f32>()
            .sqrt()
    }

    /// Scale in place to unit length; zero-norm vectors are left untouched
    pub fn normalize(&mut self) {
        let norm = self.data.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > NORM_EPSILON {
            for v in &mut self.data {
                *v /= norm;
            }
        }
    }

    pub fn normalized(&self) -> Self {
        let mut out = self.clone();
        out.normalize();
        out
    }

    pub fn add(&self, other: &Self) -> Result<Self> {
        self.check_dims(other)?;
        Ok(Self {
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| a + b)
                .collect(),
        })
    }

    pub fn sub(&self, other: &Self) -> Result<Self> {
        self.check_dims(other)?;
        Ok(Self {
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| a - b)
                .collect(),
        })
    }

    pub fn scale(&self, scalar: f32) -> Self {
        Self {
            data: self.data.iter().map(|v| v * scalar).collect(),
        }
    }

    pub fn dot(&self, other: &Self) -> Result<f32> {
        self.check_dims(other)?;
        Ok(self.data.iter().zip(&other.data).map(|(a, b)| a * b).sum())
    }

    fn check_dims(&self, other: &Self) -> Result<()> {
        if self.data.len() != other.data.len() {
            return Err(Error::DimensionMismatch {
                expected: self.data.len(),
                got: other.data.len(),
            });
        }
        Ok(())
    }
}

impl From<Vec<f32>> for Embedding {
    fn from(data: Vec<f32>) -> Self {
        Self { data }
    }
}

impl From<&[f32]> for Embedding {
    fn from(data: &[f32]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }
}

impl Index<usize> for Embedding {
    type Output = f32;

    fn index(&self, i: usize) -> &f32 {
        &self.data[i]
    }
}

impl IndexMut<usize> for Embedding {
    fn index_mut(&mut self, i: usize) -> &mut f32 {
        &mut self.data[i]
    }
}
