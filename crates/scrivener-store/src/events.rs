//! In-memory run-event streams and stop flags
//!
//! The pipeline publishes progress through the `EventSink` trait and honors
//! stop requests through `CancellationStore`. These implementations keep
//! both in process memory behind a mutex: consumers poll a stream with a
//! resumable offset, the way a disconnected reader picks up where its last
//! delivered entry left off.

use std::collections::HashMap;
use std::sync::Mutex;

use scrivener_domain::traits::{CancellationStore, EventSink};
use scrivener_domain::{RunEvent, RunId};

use crate::StoreError;

/// Ordered per-run event log with offset-resumable reads
#[derive(Debug, Default)]
pub struct MemoryEventLog {
    streams: Mutex<HashMap<RunId, Vec<RunEvent>>>,
}

impl MemoryEventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Events for `run_id` starting at `offset`, plus the offset to resume
    /// from next time
    pub fn read_from(&self, run_id: RunId, offset: usize) -> (Vec<RunEvent>, usize) {
        let streams = self.streams.lock().unwrap();
        let stream = streams.get(&run_id).map(Vec::as_slice).unwrap_or(&[]);
        let offset = offset.min(stream.len());
        (stream[offset..].to_vec(), stream.len())
    }

    /// All events published for `run_id`, in order
    pub fn events(&self, run_id: RunId) -> Vec<RunEvent> {
        self.read_from(run_id, 0).0
    }
}

impl EventSink for MemoryEventLog {
    type Error = StoreError;

    fn publish(&self, run_id: RunId, event: RunEvent) -> Result<(), Self::Error> {
        self.streams
            .lock()
            .unwrap()
            .entry(run_id)
            .or_default()
            .push(event);
        Ok(())
    }
}

/// Per-run stop flags
#[derive(Debug, Default)]
pub struct MemoryStopFlags {
    flags: Mutex<HashMap<RunId, bool>>,
}

impl MemoryStopFlags {
    /// Create an empty flag store
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any flag is currently stored for `run_id`
    pub fn contains(&self, run_id: RunId) -> bool {
        self.flags.lock().unwrap().contains_key(&run_id)
    }
}

impl CancellationStore for MemoryStopFlags {
    type Error = StoreError;

    fn set_stop(&self, run_id: RunId, stop: bool) -> Result<(), Self::Error> {
        self.flags.lock().unwrap().insert(run_id, stop);
        Ok(())
    }

    fn stop_requested(&self, run_id: RunId) -> Result<bool, Self::Error> {
        Ok(self.flags.lock().unwrap().get(&run_id).copied().unwrap_or(false))
    }

    fn clear(&self, run_id: RunId) -> Result<(), Self::Error> {
        self.flags.lock().unwrap().remove(&run_id);
        Ok(())
    }
}
