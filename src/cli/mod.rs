//! Command-line argument parsing
//!
//! Clap-based CLI. File-based configuration provides the defaults; any
//! argument given here wins.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Ask an LLM about popes and get typed answers back
#[derive(Parser, Debug)]
#[command(name = "popefinder")]
#[command(version)]
#[command(about = "RAG chat pipeline demo: structured pope lookups over Ollama or Mistral")]
pub struct Args {
    /// Chat backend to use (config file value when omitted)
    #[arg(long, value_enum)]
    pub provider: Option<Provider>,

    /// Chat model identifier
    #[arg(short, long)]
    pub model: Option<String>,

    /// Ollama base URL
    #[arg(long)]
    pub ollama_url: Option<String>,

    /// Vector store to use (config file value when omitted)
    #[arg(long, value_enum)]
    pub store: Option<Store>,

    /// Qdrant base URL
    #[arg(long)]
    pub qdrant_url: Option<String>,

    /// Pontiff number of the pope to search for
    #[arg(short = 'n', long)]
    pub pontiff_number: Option<u32>,

    /// How many additional "next pope" searches to run
    #[arg(long)]
    pub next_popes: Option<u32>,

    /// Corpus file with pope records
    #[arg(long)]
    pub corpus: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "popefinder.toml")]
    pub config: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Provider {
    Ollama,
    Mistral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Store {
    Qdrant,
    Memory,
}

impl Args {
    /// Fold CLI overrides into a loaded configuration. Arguments left
    /// unset keep the file's values.
    pub fn apply_to(&self, config: &mut crate::config::Config) {
        if let Some(provider) = self.provider {
            config.backend.provider = match provider {
                Provider::Ollama => "ollama".to_string(),
                Provider::Mistral => "mistral".to_string(),
            };
        }
        if let Some(store) = self.store {
            config.store.kind = match store {
                Store::Qdrant => "qdrant".to_string(),
                Store::Memory => "memory".to_string(),
            };
        }
        if let Some(model) = &self.model {
            config.backend.model = model.clone();
        }
        if let Some(url) = &self.ollama_url {
            config.backend.ollama_url = url.clone();
        }
        if let Some(url) = &self.qdrant_url {
            config.qdrant.url = url.clone();
        }
        if let Some(number) = self.pontiff_number {
            config.search.searched_pope_pontiff_number = number;
        }
        if let Some(next) = self.next_popes {
            config.search.next_searched_popes_number = next;
        }
        if let Some(corpus) = &self.corpus {
            config.resources.corpus = corpus.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_defaults_parse() {
        let args = Args::parse_from(["popefinder"]);
        assert!(args.provider.is_none());
        assert!(args.store.is_none());
        assert!(args.pontiff_number.is_none());
    }

    #[test]
    fn test_overrides_apply() {
        let args = Args::parse_from([
            "popefinder",
            "--provider",
            "mistral",
            "-n",
            "266",
            "--next-popes",
            "2",
        ]);

        let mut config = Config::default();
        args.apply_to(&mut config);

        assert_eq!(config.backend.provider, "mistral");
        assert_eq!(config.search.searched_pope_pontiff_number, 266);
        assert_eq!(config.search.next_searched_popes_number, 2);
    }

    #[test]
    fn test_unset_args_keep_config_values() {
        let args = Args::parse_from(["popefinder"]);
        let mut config = Config::default();
        config.backend.model = "custom:model".to_string();
        args.apply_to(&mut config);
        assert_eq!(config.backend.model, "custom:model");
    }

    #[test]
    fn test_file_provider_survives_bare_invocation() {
        let args = Args::parse_from(["popefinder"]);
        let mut config = Config::default();
        config.backend.provider = "mistral".to_string();
        config.store.kind = "memory".to_string();

        args.apply_to(&mut config);

        assert_eq!(config.backend.provider, "mistral");
        assert_eq!(config.store.kind, "memory");
    }

    #[test]
    fn test_store_flag_overrides_file() {
        let args = Args::parse_from(["popefinder", "--store", "memory"]);
        let mut config = Config::default();
        args.apply_to(&mut config);
        assert_eq!(config.store.kind, "memory");
    }
}
