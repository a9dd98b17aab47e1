//! Token counting for window sizing
//!
//! Exact tokenization is model-specific; windowing only needs a consistent
//! estimate, so counters trade accuracy for speed and zero dependencies.

/// Counts tokens in a piece of text
pub trait TokenCounter {
    /// Estimated token count for `text`
    fn count(&self, text: &str) -> usize;
}

/// Whitespace-delimited word counting (the reference counter)
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenCounter;

impl TokenCounter for WhitespaceTokenCounter {
    fn count(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }
}

/// Byte-length estimate, roughly four characters per token for English prose
#[derive(Debug, Clone, Copy, Default)]
pub struct CharEstimateTokenCounter;

impl TokenCounter for CharEstimateTokenCounter {
    fn count(&self, text: &str) -> usize {
        text.len() / 4
    }
}
