//! Scrivener Pipeline
//!
//! The run driver that turns a paginated corpus into structured records.
//! One run moves through a fixed sequence of stages: discover (or generate)
//! the record schema, infer the record-boundary pattern, then loop batch by
//! batch fetching pages, windowing them into token-bounded chunks, splitting
//! chunks into record spans, and extracting validated records, streaming
//! accumulated progress after every batch.
//!
//! The sequencing lives in a pure transition function
//! ([`machine::next_stage`]); [`Pipeline`] supplies the side effects through
//! four injected seams: a page store, an LLM provider, an event sink, and a
//! cancellation store. Stop requests are honored cooperatively at stage
//! boundaries, and every run ends with exactly one terminal event whichever
//! way it ends.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use scrivener_llm::MockProvider;
//! use scrivener_pipeline::{Pipeline, PipelineConfig, RunRequest};
//! use scrivener_store::{MemoryEventLog, MemoryPageStore, MemoryStopFlags};
//!
//! # async fn example() {
//! let store = Arc::new(MemoryPageStore::new().with_source(
//!     "docket",
//!     vec!["Case No. 101 Smith v. Jones"],
//! ));
//! let mut provider = MockProvider::new(r#"[{"case_number": "101"}]"#);
//! provider.push_response(r#"{"name": "Case", "structure": {"case_number": "string"}}"#);
//! provider.push_response("```\n^Case No\\. \\d+\n```");
//!
//! let pipeline = Pipeline::new(
//!     store,
//!     Arc::new(provider),
//!     Arc::new(MemoryEventLog::new()),
//!     Arc::new(MemoryStopFlags::new()),
//!     PipelineConfig::immediate(),
//! );
//!
//! let outcome = pipeline.run(RunRequest::new("docket")).await;
//! assert!(outcome.is_success());
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod context;
pub mod error;
pub mod machine;
pub mod pipeline;

pub use config::PipelineConfig;
pub use context::{RunContext, RunRequest};
pub use error::PipelineError;
pub use machine::{next_stage, Stage};
pub use pipeline::{Pipeline, RunOutcome, RunStatus};
