//! Error types for inference

use thiserror::Error;

/// Errors that can occur while inferring schemas and split patterns
#[derive(Error, Debug)]
pub enum InferenceError {
    /// LLM provider error that survived retries
    #[error("LLM error: {0}")]
    Llm(String),

    /// Page store error while sampling
    #[error("Store error: {0}")]
    Store(String),

    /// No sample produced a usable schema
    #[error("Schema inference failed: {0}")]
    Schema(String),

    /// No sample produced a usable split pattern
    #[error("Pattern inference failed: {0}")]
    Pattern(String),
}
