//! Scrivener Extractor
//!
//! Turns window chunks into schema-validated records. The splitter cuts a
//! chunk into per-record spans wherever the boundary pattern matches, and
//! [`RecordExtractor`] prompts the model once per span, validating every
//! element of the response against the schema.
//!
//! # Architecture
//!
//! ```text
//! Window chunk → split_spans → spans → RecordExtractor → LLM → records
//! ```
//!
//! Extraction never aborts a batch: a span the model mangles is skipped, a
//! record that fails validation is skipped, and the rest continues.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use scrivener_domain::{FieldType, Schema, SplitPattern};
//! use scrivener_extractor::{split_spans, RecordExtractor};
//! use scrivener_llm::{MockProvider, RetryPolicy};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = Schema::new("Case").with_field("case_number", FieldType::String);
//! let pattern = SplitPattern::new(r"^Case No\. \d+");
//!
//! let spans = split_spans("Case No. 101\nSmith v. Jones", &pattern)?;
//!
//! let provider = Arc::new(MockProvider::new(r#"[{"case_number": "101"}]"#));
//! let extractor = RecordExtractor::new(provider, RetryPolicy::immediate(2));
//! let outcome = extractor.extract(&spans, &schema).await;
//! assert_eq!(outcome.records.len(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod extractor;
pub mod prompt;
pub mod splitter;

pub use error::ExtractorError;
pub use extractor::{ExtractionOutcome, RecordExtractor};
pub use prompt::PromptBuilder;
pub use splitter::split_spans;
