//! Error types for extraction

use thiserror::Error;

/// Errors that can occur while splitting and extracting
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// The split pattern did not compile
    #[error("Invalid split pattern: {0}")]
    InvalidPattern(String),
}
