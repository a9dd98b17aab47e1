//! Pages and pagination arithmetic

/// A single page of source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Zero-based index within its source
    pub index: u32,

    /// Raw page text
    pub text: String,
}

impl Page {
    /// Create a page
    pub fn new(index: u32, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }
}

/// Sentinel meaning the source size has not been resolved yet
const UNRESOLVED: i64 = -1;

/// Tracks batch-by-batch progress through a paginated source
///
/// The total page count starts unresolved and is fixed exactly once, on the
/// first fetch. Batch bounds follow `start = iteration * limit` and
/// `end = min(start + limit, total)`; iteration stops once `start` reaches
/// the total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    limit: u32,
    iteration: u32,
    start_page: u32,
    end_page: u32,
    total_pages: i64,
}

impl PageCursor {
    /// Create a cursor with the given batch size and an unresolved total
    pub fn new(limit: u32) -> Self {
        Self {
            limit: limit.max(1),
            iteration: 0,
            start_page: 0,
            end_page: 0,
            total_pages: UNRESOLVED,
        }
    }

    /// Whether the total page count has been resolved
    pub fn is_resolved(&self) -> bool {
        self.total_pages >= 0
    }

    /// Fix the total page count
    ///
    /// Only meaningful before the first batch; later calls overwrite the
    /// total, which callers never do in practice.
    pub fn resolve(&mut self, total_pages: u32) {
        self.total_pages = i64::from(total_pages);
    }

    /// Compute the next batch bounds `[start, end)`
    ///
    /// Returns `None` once the source is exhausted (or while the total is
    /// unresolved). The computed bounds are retained either way, so
    /// [`start_page`](Self::start_page) reflects the last attempt even after
    /// exhaustion.
    pub fn advance(&mut self) -> Option<(u32, u32)> {
        if !self.is_resolved() {
            return None;
        }
        let total = self.total_pages as u32;
        let start = self.iteration.saturating_mul(self.limit);
        let end = start.saturating_add(self.limit).min(total);
        self.start_page = start;
        self.end_page = end;
        if start >= total {
            return None;
        }
        self.iteration += 1;
        Some((start, end))
    }

    /// Whether the last computed batch start has reached the total
    pub fn is_exhausted(&self) -> bool {
        self.is_resolved() && i64::from(self.start_page) >= self.total_pages
    }

    /// Batch size
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of batches handed out so far
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// Start of the most recently computed batch
    pub fn start_page(&self) -> u32 {
        self.start_page
    }

    /// End (exclusive) of the most recently computed batch
    pub fn end_page(&self) -> u32 {
        self.end_page
    }

    /// Resolved total, or -1 while unresolved
    pub fn total_pages(&self) -> i64 {
        self.total_pages
    }
}
