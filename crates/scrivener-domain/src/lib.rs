//! Scrivener Domain Layer
//!
//! This crate contains the core types, pure algorithms, and trait interfaces
//! for Scrivener's extraction pipeline. Infrastructure concerns (page stores,
//! LLM clients, event transports) implement the traits defined here; the
//! pipeline layers depend only on these contracts.
//!
//! ## Key Concepts
//!
//! - **Schema**: a named field → type map; candidate records are validated
//!   against it data-first, and model-generated code is never executed
//! - **Window**: a token-bounded grouping of consecutive pages, the unit of
//!   extraction work
//! - **SplitPattern**: a regular expression whose matches mark where a new
//!   record begins inside a window
//! - **PageCursor**: batch arithmetic over a lazily-sized paginated source
//! - **RunEvent**: an ordered progress stream carrying exactly one terminal
//!   event per run
//!
//! ## Architecture
//!
//! - Minimal dependencies (UUID and serde as fundamental primitives)
//! - Pure logic only; nothing here performs I/O
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod event;
pub mod page;
pub mod pattern;
pub mod run;
pub mod schema;
pub mod token;
pub mod traits;
pub mod window;

// Re-exports for convenience
pub use event::{EventKind, RunEvent};
pub use page::{Page, PageCursor};
pub use pattern::SplitPattern;
pub use run::RunId;
pub use schema::{FieldSpec, FieldType, FieldViolation, Schema, SchemaError};
pub use token::{CharEstimateTokenCounter, TokenCounter, WhitespaceTokenCounter};
pub use window::Windower;
