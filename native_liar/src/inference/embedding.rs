//! Embedding backends.
//!
//! The engine only requires determinism within a process (same input, same
//! vector) and a similarity that totally orders candidates. Cosine similarity
//! is used for both precomputed vocabulary vectors and query vectors.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbedError {
    /// The backing service could not be reached or answered with garbage.
    /// Recoverable: hints are simply unavailable for the round.
    #[error("embedding service unavailable: {0}")]
    Unavailable(String),

    #[error("embedding service returned {got} vectors for {want} inputs")]
    ShapeMismatch { want: usize, got: usize },
}

/// Maps words or free text to vectors comparable under [`cosine_similarity`].
pub trait Embedder: Send + Sync {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError>;

    fn embed_one(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let mut vs = self.embed(std::slice::from_ref(&text.to_string()))?;
        vs.pop()
            .ok_or(EmbedError::ShapeMismatch { want: 1, got: 0 })
    }
}

/// Cosine similarity; defined as 0.0 whenever either vector has zero norm
/// (the empty-text degenerate case).
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut na = 0.0f32;
    let mut nb = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot / (na.sqrt() * nb.sqrt())
}

/// Deterministic in-process embedder: token and character-trigram features
/// hashed into a fixed number of buckets, L2-normalized.
///
/// Not a language model; shared tokens and subword overlap between a
/// description and a candidate word still move its cosine score, which is all
/// the ranking contract needs. The empty string embeds to the zero vector.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dims: usize,
}

pub const DEFAULT_EMBEDDING_DIMS: usize = 256;

impl HashEmbedder {
    pub fn new(dims: usize) -> Self {
        Self {
            dims: dims.max(8),
        }
    }

    fn bucket(&self, feature: &str, salt: u64) -> usize {
        let mut hasher = DefaultHasher::new();
        salt.hash(&mut hasher);
        feature.hash(&mut hasher);
        (hasher.finish() % self.dims as u64) as usize
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dims];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let token = token.to_lowercase();
            v[self.bucket(&token, 0x746f6b)] += 1.0;
            let chars: Vec<char> = token.chars().collect();
            if chars.len() >= 3 {
                for w in chars.windows(3) {
                    let tri: String = w.iter().collect();
                    v[self.bucket(&tri, 0x747269)] += 0.5;
                }
            }
        }
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }
        v
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_EMBEDDING_DIMS)
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

/// Remote embedder for OpenAI-compatible `/embeddings` endpoints.
///
/// Uses a blocking client: the state machine treats embedding calls as
/// synchronous, and the server wraps the call sites in `block_in_place`.
pub struct HttpEmbedder {
    client: reqwest::blocking::Client,
    url: String,
    model: String,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingsDatum>,
}

#[derive(Deserialize)]
struct EmbeddingsDatum {
    embedding: Vec<f32>,
}

impl HttpEmbedder {
    pub fn new(url: impl Into<String>, model: impl Into<String>) -> Result<Self, EmbedError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(20))
            .build()
            .map_err(|e| EmbedError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
            model: model.into(),
        })
    }
}

impl Embedder for HttpEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        let body = serde_json::json!({
            "model": self.model,
            "input": texts,
        });
        let resp = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .map_err(|e| EmbedError::Unavailable(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(EmbedError::Unavailable(format!(
                "HTTP {} from {}",
                resp.status(),
                self.url
            )));
        }
        let parsed: EmbeddingsResponse = resp
            .json()
            .map_err(|e| EmbedError::Unavailable(e.to_string()))?;
        if parsed.data.len() != texts.len() {
            return Err(EmbedError::ShapeMismatch {
                want: texts.len(),
                got: parsed.data.len(),
            });
        }
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}
