//! TOML configuration
//!
//! All knobs the examples need: which backend to talk to, which pope to
//! search for, how many follow-up searches to run, and where the prompt
//! templates and corpus live. CLI arguments override file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub qdrant: QdrantConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub resources: ResourcesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// "ollama" or "mistral"
    pub provider: String,
    pub ollama_url: String,
    pub model: String,
    pub embed_model: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            ollama_url: crate::chat::ollama::DEFAULT_OLLAMA_URL.to_string(),
            model: crate::chat::ollama::DEFAULT_CHAT_MODEL.to_string(),
            embed_model: crate::chat::ollama::DEFAULT_EMBED_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// "qdrant" or "memory"
    pub kind: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            kind: "qdrant".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QdrantConfig {
    pub url: String,
    pub collection: String,
    pub embedding_dim: u64,
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6334".to_string(),
            collection: "popes".to_string(),
            embedding_dim: crate::store::qdrant::DEFAULT_EMBEDDING_DIM,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Pontiff number of the pope to search for
    pub searched_pope_pontiff_number: u32,
    /// How many additional sequential searches to run in the same session
    pub next_searched_popes_number: u32,
    pub top_k: usize,
    pub threshold: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            searched_pope_pontiff_number: 267,
            next_searched_popes_number: 0,
            top_k: 4,
            threshold: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcesConfig {
    pub corpus: PathBuf,
    pub system_prompt: PathBuf,
    pub templated_user_prompt: PathBuf,
    pub user_prompt: PathBuf,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            corpus: PathBuf::from("data/popes.json"),
            system_prompt: PathBuf::from("prompts/system-prompt.txt"),
            templated_user_prompt: PathBuf::from("prompts/templated-user-prompt.txt"),
            user_prompt: PathBuf::from("prompts/user-prompt.txt"),
        }
    }
}

impl Config {
    /// Load from a TOML file, falling back to defaults when the file does
    /// not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Save to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_string = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, toml_string)
            .with_context(|| format!("Failed to write config file {}", path.display()))
    }
}
