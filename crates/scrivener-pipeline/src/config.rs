//! Configuration for pipeline runs

use std::time::Duration;

use scrivener_llm::RetryPolicy;
use serde::{Deserialize, Serialize};

/// Knobs a run consumes as input, never as global state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Hard ceiling on window-chunk size, in tokens
    pub token_limit: usize,

    /// Token count at which a chunk is full enough to emit
    pub min_tokens: usize,

    /// Pages fetched per pagination batch
    pub page_batch_limit: u32,

    /// Attempts per LLM call, first try included
    pub max_attempts: u32,

    /// Fixed pause between attempts (seconds)
    pub retry_delay_secs: u64,

    /// Pages sampled for schema and pattern inference
    pub sample_pages: usize,

    /// Gate inferred patterns behind a second model call
    pub validate_patterns: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            token_limit: 3000,
            min_tokens: 1000,
            page_batch_limit: 10,
            max_attempts: 2,
            retry_delay_secs: 3,
            sample_pages: 3,
            validate_patterns: false,
        }
    }
}

impl PipelineConfig {
    /// Default knobs with zero retry delay, for tests
    pub fn immediate() -> Self {
        Self {
            retry_delay_secs: 0,
            ..Self::default()
        }
    }

    /// The retry policy every LLM call in the run uses
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_secs(self.retry_delay_secs))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.token_limit == 0 {
            return Err("token_limit must be greater than 0".to_string());
        }
        if self.min_tokens > self.token_limit {
            return Err("min_tokens cannot exceed token_limit".to_string());
        }
        if self.page_batch_limit == 0 {
            return Err("page_batch_limit must be greater than 0".to_string());
        }
        if self.max_attempts == 0 {
            return Err("max_attempts must be greater than 0".to_string());
        }
        if self.sample_pages == 0 {
            return Err("sample_pages must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
