//! Scrivener Inference
//!
//! LLM-assisted discovery of what to extract and where records begin. Two
//! inferrers run before any extraction work: [`SchemaInferrer`] decides the
//! shape of the records, [`PatternInferrer`] finds the regular expression
//! whose matches mark record boundaries inside a window.
//!
//! Both work the same way: sample a few pages from the source, ask the model
//! once per sample, and feed earlier output back into later prompts. The
//! answer from the last productive sample wins; the loop refines rather than
//! converges. When no sample produces anything usable the run cannot
//! proceed, so the caller gets a fatal error instead of a guess.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use scrivener_domain::Page;
//! use scrivener_inference::SchemaInferrer;
//! use scrivener_llm::{MockProvider, RetryPolicy};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = Arc::new(MockProvider::new(
//!     r#"{"name": "Case", "structure": {"case_number": "string"}}"#,
//! ));
//! let inferrer = SchemaInferrer::new(provider, RetryPolicy::immediate(2));
//!
//! let samples = vec![Page::new(0, "Case No. 101 Smith v. Jones")];
//! let schema = inferrer.infer(&samples).await?;
//! assert_eq!(schema.name, "Case");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod pattern;
pub mod prompt;
pub mod sampler;
pub mod schema;

pub use error::InferenceError;
pub use pattern::PatternInferrer;
pub use sampler::{sample_indexes, sample_pages};
pub use schema::SchemaInferrer;
