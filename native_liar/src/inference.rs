//! Embedding contract and the secret-word inference predictor.

pub mod embedding;
pub mod predictor;

pub use embedding::{cosine_similarity, EmbedError, Embedder, HashEmbedder, HttpEmbedder};
pub use predictor::InferencePredictor;
