use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::inference::{HashEmbedder, HttpEmbedder, InferencePredictor};

/// Server configuration persisted as TOML.
///
/// Fields:
/// - bots: number of AI players to seat next to the single human
/// - rounds: rounds per session
/// - turn_timeout_secs: optional deadline for a human description turn;
///   expiry triggers the auto-accuse fast path
/// - topics_file: optional TOML topic book replacing the built-in one
/// - embedding: which embedding backend the predictor uses
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_bots")]
    pub bots: usize,
    #[serde(default = "default_rounds")]
    pub rounds: u32,
    #[serde(default)]
    pub turn_timeout_secs: Option<u64>,
    #[serde(default)]
    pub topics_file: Option<PathBuf>,
    #[serde(default = "default_bot_delay_min_ms")]
    pub bot_delay_min_ms: u64,
    #[serde(default = "default_bot_delay_max_ms")]
    pub bot_delay_max_ms: u64,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

fn default_bots() -> usize {
    2
}
fn default_rounds() -> u32 {
    crate::game::DEFAULT_TOTAL_ROUNDS
}
fn default_bot_delay_min_ms() -> u64 {
    500
}
fn default_bot_delay_max_ms() -> u64 {
    1500
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Deterministic in-process feature hashing (no network).
    Hash,
    /// OpenAI-compatible `/embeddings` endpoint.
    Http,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EmbeddingConfig {
    #[serde(default = "default_backend")]
    pub backend: EmbeddingBackend,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "default_dims")]
    pub dims: usize,
}

fn default_backend() -> EmbeddingBackend {
    EmbeddingBackend::Hash
}
fn default_dims() -> usize {
    crate::inference::embedding::DEFAULT_EMBEDDING_DIMS
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        EmbeddingConfig {
            backend: EmbeddingBackend::Hash,
            url: None,
            model: None,
            dims: default_dims(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bots: default_bots(),
            rounds: default_rounds(),
            turn_timeout_secs: None,
            topics_file: None,
            bot_delay_min_ms: default_bot_delay_min_ms(),
            bot_delay_max_ms: default_bot_delay_max_ms(),
            embedding: EmbeddingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from `path`. If the file does not exist, create it
    /// with reasonable defaults and return the default config.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let s = fs::read_to_string(path)
                .with_context(|| format!("reading config file '{}'", path.display()))?;
            let cfg: Config = toml::from_str(&s)
                .with_context(|| format!("parsing TOML config '{}'", path.display()))?;
            Ok(cfg)
        } else {
            if let Some(parent) = path.parent() {
                if !parent.exists() && !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("creating config directory '{}'", parent.display())
                    })?;
                }
            }
            let cfg = Config::default();
            let toml_text = toml::to_string_pretty(&cfg)
                .with_context(|| "serializing default config to TOML")?;
            fs::write(path, toml_text)
                .with_context(|| format!("writing default config to '{}'", path.display()))?;
            Ok(cfg)
        }
    }

    /// Save the current config state back to the provided path (overwrites).
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() && !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating config directory '{}'", parent.display()))?;
            }
        }
        let toml_text =
            toml::to_string_pretty(&self).with_context(|| "serializing config to TOML")?;
        fs::write(path, toml_text)
            .with_context(|| format!("writing config to '{}'", path.display()))?;
        Ok(())
    }

    /// Load (or create) config and apply CLI-provided overrides in memory.
    /// If an override is applied, the config file is updated on disk.
    pub fn load_or_create_with_override(
        path: &Path,
        cli_bots: Option<usize>,
        cli_rounds: Option<u32>,
    ) -> Result<Self> {
        let mut cfg = Self::load_or_create(path)?;
        let mut changed = false;
        if let Some(b) = cli_bots {
            cfg.bots = b;
            changed = true;
        }
        if let Some(r) = cli_rounds {
            cfg.rounds = r;
            changed = true;
        }
        if changed {
            cfg.save(path)?;
        }
        Ok(cfg)
    }

    /// Delay window between driven AI actions, for a human-paced game.
    pub fn bot_delay_range(&self) -> (u64, u64) {
        let min = self.bot_delay_min_ms;
        (min, self.bot_delay_max_ms.max(min))
    }

    /// Build the predictor for the configured embedding backend.
    ///
    /// An unusable HTTP configuration degrades to the hash backend with a
    /// warning instead of refusing to start: hints are best-effort.
    pub fn build_predictor(&self) -> InferencePredictor {
        match self.embedding.backend {
            EmbeddingBackend::Hash => {
                InferencePredictor::new(Box::new(HashEmbedder::new(self.embedding.dims)))
            }
            EmbeddingBackend::Http => {
                let url = self.embedding.url.clone().unwrap_or_default();
                if url.is_empty() {
                    tracing::warn!("embedding.backend = \"http\" but no url set; using hash backend");
                    return InferencePredictor::new(Box::new(HashEmbedder::new(
                        self.embedding.dims,
                    )));
                }
                let model = self
                    .embedding
                    .model
                    .clone()
                    .unwrap_or_else(|| "text-embedding-3-small".to_string());
                match HttpEmbedder::new(url, model) {
                    Ok(embedder) => InferencePredictor::new(Box::new(embedder)),
                    Err(e) => {
                        tracing::warn!(error = %e, "HTTP embedder unavailable; using hash backend");
                        InferencePredictor::new(Box::new(HashEmbedder::new(self.embedding.dims)))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("liar-config-test-{}-{}", std::process::id(), name));
        p
    }

    #[test]
    fn creates_default_file_then_reloads_it() {
        let path = scratch_path("create.toml");
        let _ = fs::remove_file(&path);
        let created = Config::load_or_create(&path).unwrap();
        assert_eq!(created.bots, 2);
        assert_eq!(created.rounds, 3);
        let reloaded = Config::load_or_create(&path).unwrap();
        assert_eq!(reloaded.bots, created.bots);
        assert_eq!(reloaded.embedding.backend, EmbeddingBackend::Hash);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn cli_overrides_are_persisted() {
        let path = scratch_path("override.toml");
        let _ = fs::remove_file(&path);
        let cfg = Config::load_or_create_with_override(&path, Some(4), Some(5)).unwrap();
        assert_eq!(cfg.bots, 4);
        assert_eq!(cfg.rounds, 5);
        let reloaded = Config::load_or_create(&path).unwrap();
        assert_eq!(reloaded.bots, 4);
        assert_eq!(reloaded.rounds, 5);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let cfg: Config = toml::from_str("bots = 5\n").unwrap();
        assert_eq!(cfg.bots, 5);
        assert_eq!(cfg.rounds, 3);
        assert_eq!(cfg.embedding.backend, EmbeddingBackend::Hash);
    }
}
