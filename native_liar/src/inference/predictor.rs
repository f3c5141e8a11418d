//! Secret-word inference: ranks a topic's vocabulary against accumulated
//! player descriptions.

use std::collections::HashMap;

use liar_shared::HintEntry;

use super::embedding::{cosine_similarity, EmbedError, Embedder, HashEmbedder};
use crate::topics::TopicBook;

struct TopicVectors {
    words: Vec<String>,
    vectors: Vec<Vec<f32>>,
}

/// Ranks candidate words by semantic closeness to free text.
///
/// Vocabulary embeddings are precomputed once per round (`precompute_topics`)
/// so a ranking costs O(V) cached lookups plus a single text embedding. Text
/// embeddings are never cached: the aggregated description string grows with
/// every turn, so each call sees a new query.
pub struct InferencePredictor {
    embedder: Box<dyn Embedder>,
    vocab_cache: HashMap<String, TopicVectors>,
}

impl InferencePredictor {
    pub fn new(embedder: Box<dyn Embedder>) -> Self {
        Self {
            embedder,
            vocab_cache: HashMap::new(),
        }
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    /// Eagerly embed every topic's vocabulary. Called on round entry; on
    /// failure the cache is left empty and hint computation degrades to
    /// "unavailable" for the round.
    pub fn precompute_topics(&mut self, topics: &TopicBook) -> Result<(), EmbedError> {
        self.vocab_cache.clear();
        for entry in topics.entries() {
            let vectors = self.embedder.embed(&entry.words)?;
            self.vocab_cache.insert(
                entry.name.clone(),
                TopicVectors {
                    words: entry.words.clone(),
                    vectors,
                },
            );
        }
        Ok(())
    }

    pub fn has_topic(&self, topic: &str) -> bool {
        self.vocab_cache.contains_key(topic)
    }

    /// Rank a topic's precomputed vocabulary against `text`.
    pub fn rank_topic(&self, text: &str, topic: &str) -> Result<Vec<HintEntry>, EmbedError> {
        let cached = self.vocab_cache.get(topic).ok_or_else(|| {
            EmbedError::Unavailable(format!("vocabulary for topic '{}' not precomputed", topic))
        })?;
        self.rank_vectors(text, &cached.words, &cached.vectors)
    }

    /// Contract entry point: rank an arbitrary vocabulary against `text`.
    /// The vocabulary is embedded on the fly and never mutated.
    pub fn rank(&self, text: &str, vocabulary: &[String]) -> Result<Vec<HintEntry>, EmbedError> {
        let vectors = self.embedder.embed(vocabulary)?;
        self.rank_vectors(text, vocabulary, &vectors)
    }

    /// Best single candidate for `text`, if a ranking is possible.
    pub fn guess_from(&self, text: &str, topic: &str) -> Option<String> {
        self.rank_topic(text, topic)
            .ok()?
            .first()
            .map(|h| h.word.clone())
    }

    fn rank_vectors(
        &self,
        text: &str,
        words: &[String],
        vectors: &[Vec<f32>],
    ) -> Result<Vec<HintEntry>, EmbedError> {
        if words.len() != vectors.len() {
            return Err(EmbedError::ShapeMismatch {
                want: words.len(),
                got: vectors.len(),
            });
        }
        let query = self.embedder.embed_one(text)?;
        let mut entries: Vec<HintEntry> = words
            .iter()
            .zip(vectors.iter())
            .map(|(word, v)| {
                let raw = cosine_similarity(&query, v);
                HintEntry {
                    word: word.clone(),
                    // scores must be finite for a total order
                    score: if raw.is_finite() { raw } else { 0.0 },
                }
            })
            .collect();
        // stable sort: ties keep original vocabulary order
        entries.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(entries)
    }
}

impl Default for InferencePredictor {
    fn default() -> Self {
        Self::new(Box::new(HashEmbedder::default()))
    }
}
