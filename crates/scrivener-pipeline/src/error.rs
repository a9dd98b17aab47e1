//! Error taxonomy for pipeline runs
//!
//! Component crates carry their own error enums; everything that reaches the
//! run loop is folded into [`PipelineError`] so a stage failure always maps
//! to one of the documented outcomes: escalate after retries, skip and
//! continue, or end the run.

use scrivener_extractor::ExtractorError;
use scrivener_inference::InferenceError;
use scrivener_llm::LlmError;
use thiserror::Error;

/// Why a pipeline stage could not produce its required output
#[derive(Error, Debug)]
pub enum PipelineError {
    /// An LLM or store call kept failing after the configured retries
    #[error("Call failed after retries: {0}")]
    TransientCall(String),

    /// Model output never parsed into what the stage needed
    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    /// A parsed object failed schema validation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The source has no pages at all
    #[error("No Data Found.")]
    DataExhausted,

    /// A stop was requested; not a failure
    #[error("Stop requested")]
    Cancelled,

    /// Page store operation failed
    #[error("Store error: {0}")]
    Store(String),

    /// Stage sequencing reached a state its inputs rule out
    #[error("Internal pipeline error: {0}")]
    Internal(String),
}

impl From<InferenceError> for PipelineError {
    fn from(err: InferenceError) -> Self {
        match err {
            InferenceError::Llm(msg) => Self::TransientCall(msg),
            InferenceError::Store(msg) => Self::Store(msg),
            InferenceError::Schema(msg) | InferenceError::Pattern(msg) => {
                Self::MalformedResponse(msg)
            }
        }
    }
}

impl From<ExtractorError> for PipelineError {
    fn from(err: ExtractorError) -> Self {
        match err {
            ExtractorError::InvalidPattern(msg) => Self::MalformedResponse(msg),
        }
    }
}

impl From<LlmError> for PipelineError {
    fn from(err: LlmError) -> Self {
        Self::TransientCall(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_exhausted_message() {
        assert_eq!(PipelineError::DataExhausted.to_string(), "No Data Found.");
    }

    #[test]
    fn test_inference_error_mapping() {
        let err: PipelineError = InferenceError::Llm("timeout".to_string()).into();
        assert!(matches!(err, PipelineError::TransientCall(_)));

        let err: PipelineError = InferenceError::Schema("no JSON".to_string()).into();
        assert!(matches!(err, PipelineError::MalformedResponse(_)));

        let err: PipelineError = InferenceError::Store("locked".to_string()).into();
        assert!(matches!(err, PipelineError::Store(_)));
    }

    #[test]
    fn test_extractor_error_mapping() {
        let err: PipelineError = ExtractorError::InvalidPattern("(".to_string()).into();
        assert!(matches!(err, PipelineError::MalformedResponse(_)));
    }
}
