//! Trait definitions for external interactions
//!
//! These traits define the boundaries between pipeline logic and
//! infrastructure. Implementations live in other crates; the pipeline only
//! ever sees these contracts.

use crate::{Page, RunEvent, RunId};

/// Paginated, keyword-searchable source of page text
///
/// Implemented by the infrastructure layer (scrivener-store)
pub trait PageStore {
    /// Error type for store operations
    type Error;

    /// Total number of pages in a source
    fn count(&self, source_id: &str) -> Result<u32, Self::Error>;

    /// Fetch the contiguous page range `[start, end)`, in index order
    fn fetch_range(&self, source_id: &str, start: u32, end: u32)
        -> Result<Vec<Page>, Self::Error>;

    /// Fetch specific pages by index, in the given order
    ///
    /// Indexes outside the source are skipped, not errors.
    fn fetch_pages(&self, source_id: &str, indexes: &[u32]) -> Result<Vec<Page>, Self::Error>;

    /// Page indexes whose text contains every keyword, case-insensitively
    ///
    /// Each direct hit is expanded to include its immediate neighbors
    /// (index − 1 and index + 1), then the list is deduplicated, clipped to
    /// the valid range, and returned in ascending order.
    fn search_keywords(
        &self,
        source_id: &str,
        keywords: &[String],
    ) -> Result<Vec<u32>, Self::Error>;
}

/// Text generation seam for language models
///
/// Implemented by the infrastructure layer (scrivener-llm). Calls are
/// synchronous; async callers run them through a blocking task. Transient
/// failures are expected and retried by callers under a configured bound.
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a completion for `prompt`
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;
}

/// Ordered, append-only publication of run progress
///
/// Events for one run are observed in publication order; consumers may read
/// from a resumable offset. Exactly one published event per run is terminal.
pub trait EventSink {
    /// Error type for publish operations
    type Error;

    /// Append `event` to the stream for `run_id`
    fn publish(&self, run_id: RunId, event: RunEvent) -> Result<(), Self::Error>;
}

/// Cooperative stop signaling, keyed per run
///
/// The pipeline sets the flag to false when a run starts, checks it at stage
/// boundaries, and clears it on every exit path.
pub trait CancellationStore {
    /// Error type for flag operations
    type Error;

    /// Set or reset the stop request for a run
    fn set_stop(&self, run_id: RunId, stop: bool) -> Result<(), Self::Error>;

    /// Whether a stop has been requested
    ///
    /// Absent flags read as false.
    fn stop_requested(&self, run_id: RunId) -> Result<bool, Self::Error>;

    /// Remove the flag entirely
    fn clear(&self, run_id: RunId) -> Result<(), Self::Error>;
}
