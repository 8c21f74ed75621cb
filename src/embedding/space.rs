//! Named embedding collections with k-NN lookup

use super::vector::Embedding;
use crate::{Error, Result};

/// Insertion-ordered collection of named vectors, all of one dimensionality.
///
/// Names are not deduplicated: adding the same name twice stores a second
/// entry, and lookup returns the first match. Unlike the store's permissive
/// scan, a query whose dimensionality does not match the space is a hard
/// error.
///
/// Not internally synchronized.
pub struct EmbeddingSpace {
    dimensions: usize,
    embeddings: Vec<(String, Embedding)>,
}

impl EmbeddingSpace {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            embeddings: Vec::new(),
        }
    }

    /// Store a named vector. Fails if its length differs from the space's
    /// dimensionality.
    pub fn add(&mut self, name: &str, embedding: Embedding) -> Result<()> {
        if embedding.dimensions() != self.dimensions {
            return Err(Error::DimensionMismatch {
                expected: self.dimensions,
                got: embedding.dimensions(),
            });
        }
        self.embeddings.push((name.to_string(), embedding));
        Ok(())
    }

    /// Rank every stored vector by cosine similarity against `query`, filter
    /// by `threshold`, sort descending, truncate to `k`.
    pub fn find_nearest(
        &self,
        query: &Embedding,
        k: usize,
        threshold: f32,
    ) -> Result<Vec<(String, f32)>> {
        if query.dimensions() != self.dimensions {
            return Err(Error::DimensionMismatch {
                expected: self.dimensions,
                got: query.dimensions(),
            });
        }

        let mut scored: Vec<(String, f32)> = self
            .embeddings
            .iter()
            .filter_map(|(name, embedding)| {
                let sim = query.cosine_similarity(embedding);
                (sim >= threshold).then(|| (name.clone(), sim))
            })
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }

    /// First stored vector under `name`, if any
    pub fn get(&self, name: &str) -> Option<&Embedding> {
        self.embeddings
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, e)| e)
    }

    pub fn all(&self) -> &[(String, Embedding)] {
        &self.embeddings
    }

    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}
