//! Embedding layer — fixed-length float vectors and similarity search
//!
//! [`Embedding`] is the vector value type (cosine similarity, distance,
//! normalization, checked arithmetic). [`EmbeddingSpace`] holds named vectors
//! of a fixed dimensionality and answers k-nearest-neighbor queries.
//!
//! Neither type synchronizes internally; callers confine them to one thread
//! or serialize access externally (the facade wraps its space in a lock).

mod space;
mod vector;

pub use space::EmbeddingSpace;
pub use vector::Embedding;
