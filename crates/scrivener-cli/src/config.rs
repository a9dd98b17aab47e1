//! Configuration management for the CLI.

use std::fs;
use std::path::{Path, PathBuf};

use scrivener_pipeline::PipelineConfig;
use serde::{Deserialize, Serialize};

use crate::error::{CliError, Result};

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Page store database path
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Model passed to the Ollama provider
    #[serde(default = "default_model")]
    pub model: String,

    /// Ollama API endpoint
    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,

    /// Pipeline knobs
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

fn default_db_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".scrivener")
        .join("pages.db")
}

fn default_model() -> String {
    "llama3".to_string()
}

fn default_ollama_url() -> String {
    scrivener_llm::ollama::DEFAULT_ENDPOINT.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            model: default_model(),
            ollama_url: default_ollama_url(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl Config {
    /// Default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".scrivener").join("config.toml"))
    }

    /// Load configuration from the given file, or the default location,
    /// falling back to defaults when no file exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::path()?,
        };

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&contents)?;
            config
                .pipeline
                .validate()
                .map_err(CliError::Config)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, contents)?;
        Ok(())
    }
}
