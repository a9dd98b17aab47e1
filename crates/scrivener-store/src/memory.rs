//! In-memory page store
//!
//! Backs tests and embedded callers that already hold their corpus in
//! memory. Search semantics match [`crate::SqlitePageStore`]: a page matches
//! when it contains every keyword, case-insensitively, and every hit is
//! expanded to its immediate neighbors.

use std::collections::{BTreeSet, HashMap};

use scrivener_domain::traits::PageStore;
use scrivener_domain::Page;

use crate::StoreError;

/// Vec-backed page store
///
/// Sources are set up before use; reads are lock-free. An unknown source
/// behaves like an empty one.
#[derive(Debug, Default)]
pub struct MemoryPageStore {
    sources: HashMap<String, Vec<String>>,
}

impl MemoryPageStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source (builder style)
    pub fn with_source<T: Into<String>>(
        mut self,
        source_id: impl Into<String>,
        pages: Vec<T>,
    ) -> Self {
        self.add_source(source_id, pages);
        self
    }

    /// Add or replace a source
    pub fn add_source<T: Into<String>>(&mut self, source_id: impl Into<String>, pages: Vec<T>) {
        self.sources
            .insert(source_id.into(), pages.into_iter().map(Into::into).collect());
    }

    fn pages(&self, source_id: &str) -> &[String] {
        self.sources.get(source_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl PageStore for MemoryPageStore {
    type Error = StoreError;

    fn count(&self, source_id: &str) -> Result<u32, Self::Error> {
        Ok(self.pages(source_id).len() as u32)
    }

    fn fetch_range(
        &self,
        source_id: &str,
        start: u32,
        end: u32,
    ) -> Result<Vec<Page>, Self::Error> {
        let pages = self.pages(source_id);
        let start = start as usize;
        let end = (end as usize).min(pages.len());
        if start >= end {
            return Ok(Vec::new());
        }

        Ok(pages[start..end]
            .iter()
            .enumerate()
            .map(|(offset, text)| Page::new((start + offset) as u32, text.clone()))
            .collect())
    }

    fn fetch_pages(&self, source_id: &str, indexes: &[u32]) -> Result<Vec<Page>, Self::Error> {
        let pages = self.pages(source_id);
        Ok(indexes
            .iter()
            .filter_map(|&idx| {
                pages
                    .get(idx as usize)
                    .map(|text| Page::new(idx, text.clone()))
            })
            .collect())
    }

    fn search_keywords(
        &self,
        source_id: &str,
        keywords: &[String],
    ) -> Result<Vec<u32>, Self::Error> {
        if keywords.is_empty() {
            return Ok(Vec::new());
        }

        let pages = self.pages(source_id);
        let needles: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

        let mut hits = BTreeSet::new();
        for (idx, text) in pages.iter().enumerate() {
            let haystack = text.to_lowercase();
            if needles.iter().all(|needle| haystack.contains(needle)) {
                let idx = idx as u32;
                if idx > 0 {
                    hits.insert(idx - 1);
                }
                hits.insert(idx);
                if (idx as usize) + 1 < pages.len() {
                    hits.insert(idx + 1);
                }
            }
        }

        Ok(hits.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryPageStore {
        MemoryPageStore::new().with_source(
            "docket",
            vec![
                "Index of filings",
                "Case No. 101 Smith v. Jones",
                "continued argument",
                "Case No. 102 Doe v. Roe",
                "exhibits",
            ],
        )
    }

    #[test]
    fn test_count() {
        let store = store();
        assert_eq!(store.count("docket").unwrap(), 5);
        assert_eq!(store.count("missing").unwrap(), 0);
    }

    #[test]
    fn test_fetch_range_clamps_to_source() {
        let store = store();

        let pages = store.fetch_range("docket", 3, 10).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].index, 3);
        assert_eq!(pages[1].index, 4);

        assert!(store.fetch_range("docket", 7, 9).unwrap().is_empty());
        assert!(store.fetch_range("docket", 2, 2).unwrap().is_empty());
    }

    #[test]
    fn test_fetch_pages_skips_missing_indexes() {
        let store = store();

        let pages = store.fetch_pages("docket", &[1, 99, 3]).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].index, 1);
        assert_eq!(pages[1].index, 3);
    }

    #[test]
    fn test_search_requires_every_keyword() {
        let store = store();

        let hits = store
            .search_keywords("docket", &["case".to_string(), "smith".to_string()])
            .unwrap();
        // Page 1 matches; expansion pulls in pages 0 and 2
        assert_eq!(hits, vec![0, 1, 2]);
    }

    #[test]
    fn test_search_expands_and_dedupes_neighbors() {
        let store = store();

        let hits = store.search_keywords("docket", &["Case No.".to_string()]).unwrap();
        // Pages 1 and 3 match; expansions [0,1,2] and [2,3,4] overlap at 2
        assert_eq!(hits, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_search_clips_at_source_edges() {
        let store = MemoryPageStore::new().with_source("s", vec!["match here", "match here too"]);

        let hits = store.search_keywords("s", &["match".to_string()]).unwrap();
        assert_eq!(hits, vec![0, 1]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let store = store();

        let hits = store.search_keywords("docket", &["EXHIBITS".to_string()]).unwrap();
        assert_eq!(hits, vec![3, 4]);
    }

    #[test]
    fn test_search_without_keywords_is_empty() {
        let store = store();
        assert!(store.search_keywords("docket", &[]).unwrap().is_empty());
    }

    #[test]
    fn test_search_no_match() {
        let store = store();
        assert!(store
            .search_keywords("docket", &["case".to_string(), "zebra".to_string()])
            .unwrap()
            .is_empty());
    }
}
