//! Topic -> vocabulary book.
//!
//! Loaded once per process (built-in defaults or a TOML file) and treated as
//! read-only afterwards. Topic and word order is preserved: the predictor's
//! tie-breaking is defined in terms of vocabulary order.

use anyhow::{Context, Result};
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TopicEntry {
    pub name: String,
    pub words: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TopicBook {
    #[serde(rename = "topic")]
    topics: Vec<TopicEntry>,
}

impl TopicBook {
    /// The default topic set. Mirrors the five categories of the original
    /// game plus an `animal` topic.
    pub fn builtin() -> Self {
        fn entry(name: &str, words: &[&str]) -> TopicEntry {
            TopicEntry {
                name: name.to_string(),
                words: words.iter().map(|w| w.to_string()).collect(),
            }
        }
        TopicBook {
            topics: vec![
                entry(
                    "animal",
                    &[
                        "cat", "dog", "lion", "elephant", "penguin", "rabbit", "eagle", "dolphin",
                    ],
                ),
                entry(
                    "object",
                    &[
                        "umbrella",
                        "scissors",
                        "mirror",
                        "backpack",
                        "candle",
                        "ladder",
                        "wallet",
                        "pillow",
                    ],
                ),
                entry(
                    "food",
                    &[
                        "pizza",
                        "sushi",
                        "pancake",
                        "dumpling",
                        "watermelon",
                        "chocolate",
                        "noodles",
                        "cheese",
                    ],
                ),
                entry(
                    "job",
                    &[
                        "firefighter",
                        "teacher",
                        "pilot",
                        "chef",
                        "nurse",
                        "carpenter",
                        "lawyer",
                        "farmer",
                    ],
                ),
                entry(
                    "place",
                    &[
                        "library", "beach", "airport", "hospital", "stadium", "bakery", "museum",
                        "subway",
                    ],
                ),
                entry(
                    "character",
                    &[
                        "Sherlock Holmes",
                        "Cinderella",
                        "Dracula",
                        "Peter Pan",
                        "Hercules",
                        "Robin Hood",
                        "Pinocchio",
                        "Mulan",
                    ],
                ),
            ],
        }
    }

    /// Build a book from explicit entries. Used by tests and tools.
    pub fn from_entries(entries: Vec<(String, Vec<String>)>) -> Result<Self> {
        let book = TopicBook {
            topics: entries
                .into_iter()
                .map(|(name, words)| TopicEntry { name, words })
                .collect(),
        };
        book.validate()?;
        Ok(book)
    }

    /// Load a book from a TOML file of `[[topic]]` tables:
    ///
    /// ```toml
    /// [[topic]]
    /// name = "animal"
    /// words = ["cat", "dog", "lion"]
    /// ```
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading topics file '{}'", path.display()))?;
        let book: TopicBook = toml::from_str(&text)
            .with_context(|| format!("parsing topics file '{}'", path.display()))?;
        book.validate()
            .with_context(|| format!("validating topics file '{}'", path.display()))?;
        Ok(book)
    }

    fn validate(&self) -> Result<()> {
        if self.topics.is_empty() {
            anyhow::bail!("topic book contains no topics");
        }
        for t in &self.topics {
            if t.name.trim().is_empty() {
                anyhow::bail!("topic with empty name");
            }
            if t.words.is_empty() {
                anyhow::bail!("topic '{}' has an empty vocabulary", t.name);
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn entries(&self) -> &[TopicEntry] {
        &self.topics
    }

    pub fn vocabulary(&self, name: &str) -> Option<&[String]> {
        self.topics
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.words.as_slice())
    }

    /// Pick a uniformly random topic and a uniformly random word from it.
    pub fn choose<R: Rng>(&self, rng: &mut R) -> (String, String) {
        // validate() guarantees both levels are non-empty
        let entry = self
            .topics
            .choose(rng)
            .expect("topic book is never empty");
        let word = entry
            .words
            .choose(rng)
            .expect("vocabularies are never empty");
        (entry.name.clone(), word.clone())
    }
}

impl Default for TopicBook {
    fn default() -> Self {
        Self::builtin()
    }
}
