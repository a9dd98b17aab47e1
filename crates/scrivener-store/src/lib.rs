//! Scrivener Storage Layer
//!
//! Implementations of the infrastructure traits from `scrivener-domain`:
//!
//! - [`SqlitePageStore`]: persistent page storage with keyword search
//! - [`MemoryPageStore`]: in-memory pages for tests and embedded use
//! - [`MemoryEventLog`]: ordered run-event streams with resumable reads
//! - [`MemoryStopFlags`]: per-run cooperative stop flags
//!
//! # Examples
//!
//! ```
//! use scrivener_store::MemoryPageStore;
//! use scrivener_domain::traits::PageStore;
//!
//! let store = MemoryPageStore::new().with_source("demo", vec!["page one", "page two"]);
//! assert_eq!(store.count("demo").unwrap(), 2);
//! ```

#![warn(missing_docs)]

pub mod events;
pub mod memory;
pub mod sqlite;

use thiserror::Error;

pub use events::{MemoryEventLog, MemoryStopFlags};
pub use memory::MemoryPageStore;
pub use sqlite::SqlitePageStore;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}
