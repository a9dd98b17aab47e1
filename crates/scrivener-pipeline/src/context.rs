//! Per-run state threaded through the pipeline stages

use scrivener_domain::{FieldSpec, PageCursor, RunId, Schema, SplitPattern};
use serde_json::Value;

/// What a caller asks for when starting a run
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    /// Source the run extracts from
    pub source_id: String,

    /// Keywords driving page selection; empty means the whole source
    pub keywords: Vec<String>,

    /// Explicit fields; empty means the schema is inferred from samples
    pub fields: Vec<FieldSpec>,

    /// Free-text context for explicit-schema generation
    pub query: Option<String>,

    /// Caller-chosen run id, when the caller needs it before the run starts
    /// (wiring up a stop signal, following the event stream)
    pub run_id: Option<RunId>,
}

impl RunRequest {
    /// Request a full-source run with an inferred schema
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            ..Self::default()
        }
    }

    /// Restrict the run to keyword-matched pages
    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    /// Supply the fields instead of inferring them
    pub fn with_fields(mut self, fields: Vec<FieldSpec>) -> Self {
        self.fields = fields;
        self
    }

    /// Attach free-text context for schema generation
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Pin the run id
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }
}

/// Mutable state owned by one run from start to terminal stage
///
/// Each stage reads what earlier stages wrote and leaves its own output
/// behind; `records` only ever grows, and a set `error` sends the next
/// transition straight to the end.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Identity of this run
    pub run_id: RunId,

    /// Source being extracted
    pub source_id: String,

    /// Keywords driving page selection
    pub keywords: Vec<String>,

    /// Explicit fields, when the caller supplied any
    pub fields: Vec<FieldSpec>,

    /// Free-text context for explicit-schema generation
    pub query: Option<String>,

    /// Schema once inference or generation produced one
    pub schema: Option<Schema>,

    /// Boundary pattern once inference produced one
    pub split_pattern: Option<SplitPattern>,

    /// Chunks of the current window, cleared when pagination is exhausted
    pub window: Vec<String>,

    /// Accumulated validated records, append-only across windows
    pub records: Vec<Value>,

    /// Pagination progress
    pub cursor: PageCursor,

    /// Resolved hit indexes for keyword runs, fixed on the first fetch
    pub keyword_hits: Option<Vec<u32>>,

    /// Fatal error message; presence is the error flag
    pub error: Option<String>,
}

impl RunContext {
    /// Fresh context for a run
    pub fn new(run_id: RunId, request: RunRequest, page_batch_limit: u32) -> Self {
        Self {
            run_id,
            source_id: request.source_id,
            keywords: request.keywords,
            fields: request.fields,
            query: request.query,
            schema: None,
            split_pattern: None,
            window: Vec::new(),
            records: Vec::new(),
            cursor: PageCursor::new(page_batch_limit),
            keyword_hits: None,
            error: None,
        }
    }

    /// Mark the run failed; the first message sticks
    pub fn fail(&mut self, message: impl Into<String>) {
        if self.error.is_none() {
            self.error = Some(message.into());
        }
    }

    /// Whether a fatal error has been recorded
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Accumulated records as a JSON array, for event payloads
    pub fn records_value(&self) -> Value {
        Value::Array(self.records.clone())
    }
}
