//! Token-bounded windowing of page sequences
//!
//! The windower turns an ordered batch of pages into newline-joined chunks
//! sized for a model context: each chunk grows until it reaches a minimum
//! token count, and never grows past the token limit. Chunks neither overlap
//! nor drop pages; joining them back with newlines reproduces the
//! deduplicated input exactly.

use std::collections::HashSet;

use crate::page::Page;
use crate::token::TokenCounter;

/// Groups ordered page texts into token-bounded chunks
#[derive(Debug, Clone, Copy)]
pub struct Windower {
    token_limit: usize,
    min_tokens: usize,
}

impl Windower {
    /// Create a windower with the given bounds
    ///
    /// `min_tokens` is the point at which a chunk is considered full enough
    /// to emit; `token_limit` is the hard ceiling a chunk may never cross by
    /// adding another page.
    pub fn new(token_limit: usize, min_tokens: usize) -> Self {
        Self {
            token_limit,
            min_tokens,
        }
    }

    /// Hard ceiling on chunk size
    pub fn token_limit(&self) -> usize {
        self.token_limit
    }

    /// Emission threshold
    pub fn min_tokens(&self) -> usize {
        self.min_tokens
    }

    /// Group `pages` into chunks
    ///
    /// Pages are trimmed and deduplicated by exact text first (keeping the
    /// first occurrence; blank pages are dropped). Each chunk starts at the
    /// first unconsumed page and absorbs following pages one at a time,
    /// joined by a newline: a page that would push the chunk past the token
    /// limit is left for the next chunk, and growth stops once the minimum
    /// is reached.
    ///
    /// A single page larger than the limit is still emitted alone, never
    /// truncated. Empty input yields no chunks.
    pub fn window<C: TokenCounter + ?Sized>(&self, pages: &[Page], counter: &C) -> Vec<String> {
        let texts = dedupe_page_texts(pages);
        let mut chunks = Vec::new();

        let mut i = 0;
        while i < texts.len() {
            let mut chunk = texts[i].clone();
            let mut j = i + 1;
            while j < texts.len() {
                let candidate = format!("{}\n{}", chunk, texts[j]);
                let tokens = counter.count(&candidate);
                if tokens > self.token_limit {
                    break;
                }
                chunk = candidate;
                j += 1;
                if tokens >= self.min_tokens {
                    break;
                }
            }
            chunks.push(chunk);
            i = j;
        }

        chunks
    }
}

/// Trimmed page texts with duplicates and blanks removed, first occurrence
/// order preserved
fn dedupe_page_texts(pages: &[Page]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut texts = Vec::new();
    for page in pages {
        let text = page.text.trim();
        if text.is_empty() {
            continue;
        }
        if seen.insert(text.to_string()) {
            texts.push(text.to_string());
        }
    }
    texts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::WhitespaceTokenCounter;

    /// A page of `n` distinct words, tagged so pages never collide
    fn page_of_words(index: u32, n: usize) -> Page {
        let words: Vec<String> = (0..n).map(|w| format!("p{}w{}", index, w)).collect();
        Page::new(index, words.join(" "))
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        let windower = Windower::new(3000, 1000);
        let chunks = windower.window(&[], &WhitespaceTokenCounter);
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_single_page_single_chunk() {
        let windower = Windower::new(3000, 1000);
        let pages = [Page::new(0, "a short page")];

        let chunks = windower.window(&pages, &WhitespaceTokenCounter);
        assert_eq!(chunks, vec!["a short page".to_string()]);
    }

    #[test]
    fn test_stops_once_minimum_reached() {
        // 600-word pages, min 1000, limit 3000: every chunk takes exactly
        // two pages (1200 tokens crosses the minimum)
        let windower = Windower::new(3000, 1000);
        let pages: Vec<Page> = (0..6).map(|i| page_of_words(i, 600)).collect();

        let chunks = windower.window(&pages, &WhitespaceTokenCounter);
        assert_eq!(chunks.len(), 3);
        for chunk in &chunks {
            assert_eq!(WhitespaceTokenCounter.count(chunk), 1200);
        }
    }

    #[test]
    fn test_never_exceeds_limit() {
        // 600-word pages with a 1000 limit: joining two pages would hit
        // 1200, so every page stands alone
        let windower = Windower::new(1000, 1000);
        let pages: Vec<Page> = (0..4).map(|i| page_of_words(i, 600)).collect();

        let chunks = windower.window(&pages, &WhitespaceTokenCounter);
        assert_eq!(chunks.len(), 4);
        for chunk in &chunks {
            assert!(WhitespaceTokenCounter.count(chunk) <= 1000);
        }
    }

    #[test]
    fn test_oversized_page_emitted_alone() {
        let windower = Windower::new(100, 50);
        let pages = vec![
            page_of_words(0, 250),
            page_of_words(1, 30),
            page_of_words(2, 30),
        ];

        let chunks = windower.window(&pages, &WhitespaceTokenCounter);
        assert_eq!(chunks.len(), 2);
        assert_eq!(WhitespaceTokenCounter.count(&chunks[0]), 250);
        assert_eq!(WhitespaceTokenCounter.count(&chunks[1]), 60);
    }

    #[test]
    fn test_duplicate_pages_kept_once() {
        let windower = Windower::new(3000, 1000);
        let pages = vec![
            Page::new(0, "repeated header page"),
            Page::new(1, "repeated header page"),
            Page::new(2, "  repeated header page  "),
            Page::new(3, "unique body page"),
        ];

        let chunks = windower.window(&pages, &WhitespaceTokenCounter);
        assert_eq!(
            chunks,
            vec!["repeated header page\nunique body page".to_string()]
        );
    }

    #[test]
    fn test_blank_pages_dropped() {
        let windower = Windower::new(3000, 1000);
        let pages = vec![
            Page::new(0, "   "),
            Page::new(1, "content page"),
            Page::new(2, ""),
        ];

        let chunks = windower.window(&pages, &WhitespaceTokenCounter);
        assert_eq!(chunks, vec!["content page".to_string()]);
    }

    #[test]
    fn test_adjacent_chunks_share_no_page() {
        let windower = Windower::new(3000, 1000);
        let pages: Vec<Page> = (0..7).map(|i| page_of_words(i, 600)).collect();

        let chunks = windower.window(&pages, &WhitespaceTokenCounter);

        // Every word appears exactly once across all chunks
        let mut seen = HashSet::new();
        for chunk in &chunks {
            for word in chunk.split_whitespace() {
                assert!(seen.insert(word.to_string()), "duplicated word {}", word);
            }
        }
        assert_eq!(seen.len(), 7 * 600);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::token::WhitespaceTokenCounter;
    use proptest::prelude::*;

    proptest! {
        /// Property: joining the chunks with newlines reproduces the
        /// deduplicated input joined with newlines (nothing lost, nothing
        /// duplicated, order kept)
        #[test]
        fn test_chunks_reconstruct_input(
            texts in prop::collection::vec("[a-z]{1,8}( [a-z]{1,8}){0,20}", 0..25),
            token_limit in 1usize..60,
            min_fraction in 0usize..=100,
        ) {
            let min_tokens = token_limit * min_fraction / 100;
            let pages: Vec<Page> = texts
                .iter()
                .enumerate()
                .map(|(i, t)| Page::new(i as u32, t.clone()))
                .collect();

            let windower = Windower::new(token_limit, min_tokens);
            let chunks = windower.window(&pages, &WhitespaceTokenCounter);

            let expected = dedupe_page_texts(&pages).join("\n");
            prop_assert_eq!(chunks.join("\n"), expected);
        }

        /// Property: every chunk respects the token limit unless it is a
        /// single oversized page
        #[test]
        fn test_chunks_respect_limit(
            texts in prop::collection::vec("[a-z]{1,8}( [a-z]{1,8}){0,20}", 0..25),
            token_limit in 1usize..60,
        ) {
            let pages: Vec<Page> = texts
                .iter()
                .enumerate()
                .map(|(i, t)| Page::new(i as u32, t.clone()))
                .collect();

            let windower = Windower::new(token_limit, token_limit / 2);
            let chunks = windower.window(&pages, &WhitespaceTokenCounter);

            for chunk in &chunks {
                let single_page = !chunk.contains('\n');
                prop_assert!(
                    WhitespaceTokenCounter.count(chunk) <= token_limit || single_page,
                    "multi-page chunk over the limit: {:?}", chunk
                );
            }
        }
    }
}
