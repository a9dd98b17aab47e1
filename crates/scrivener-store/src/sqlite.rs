//! SQLite-backed page store
//!
//! Persistent storage for ingested corpora. Keyword search runs as LIKE
//! filters over lowercased text (ASCII case folding), with the neighbor
//! expansion done in Rust after the direct hits come back.
//!
//! # Thread Safety
//!
//! SQLite connections are not thread-safe. Each thread should have its own
//! `SqlitePageStore` instance.

use std::path::Path;

use rusqlite::{params, Connection};
use scrivener_domain::traits::PageStore;
use scrivener_domain::Page;

use crate::StoreError;

/// SQLite-based implementation of `PageStore`
///
/// # Examples
///
/// ```
/// use scrivener_store::SqlitePageStore;
/// use scrivener_domain::traits::PageStore;
///
/// let mut store = SqlitePageStore::new(":memory:").unwrap();
/// store.ingest_source("demo", &["first page".into(), "second page".into()]).unwrap();
/// assert_eq!(store.count("demo").unwrap(), 2);
/// ```
pub struct SqlitePageStore {
    conn: Connection,
}

impl SqlitePageStore {
    /// Open (or create) a page store at the given database path
    ///
    /// Use `:memory:` for an in-memory database.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Store a source's pages, replacing any previous ingest of the same id
    ///
    /// Pages are written in slice order with zero-based contiguous indexes.
    pub fn ingest_source(&mut self, source_id: &str, pages: &[String]) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM pages WHERE source_id = ?1", params![source_id])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO pages (source_id, page_index, text) VALUES (?1, ?2, ?3)",
            )?;
            for (index, text) in pages.iter().enumerate() {
                stmt.execute(params![source_id, index as i64, text])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    /// All source ids with their page counts, alphabetically
    pub fn list_sources(&self) -> Result<Vec<(String, u32)>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT source_id, COUNT(*) FROM pages GROUP BY source_id ORDER BY source_id",
        )?;

        let sources = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u32))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(sources)
    }
}

/// Escape LIKE wildcards in a keyword so they match literally
fn escape_like(keyword: &str) -> String {
    keyword
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

impl PageStore for SqlitePageStore {
    type Error = StoreError;

    fn count(&self, source_id: &str) -> Result<u32, Self::Error> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM pages WHERE source_id = ?1",
            params![source_id],
            |row| row.get(0),
        )?;
        Ok(count as u32)
    }

    fn fetch_range(
        &self,
        source_id: &str,
        start: u32,
        end: u32,
    ) -> Result<Vec<Page>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT page_index, text FROM pages
             WHERE source_id = ?1 AND page_index >= ?2 AND page_index < ?3
             ORDER BY page_index",
        )?;

        let pages = stmt
            .query_map(params![source_id, start as i64, end as i64], |row| {
                Ok(Page::new(row.get::<_, i64>(0)? as u32, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(pages)
    }

    fn fetch_pages(&self, source_id: &str, indexes: &[u32]) -> Result<Vec<Page>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT text FROM pages WHERE source_id = ?1 AND page_index = ?2",
        )?;

        let mut pages = Vec::with_capacity(indexes.len());
        for &index in indexes {
            let mut rows = stmt.query_map(params![source_id, index as i64], |row| {
                row.get::<_, String>(0)
            })?;
            if let Some(text) = rows.next().transpose()? {
                pages.push(Page::new(index, text));
            }
        }

        Ok(pages)
    }

    fn search_keywords(
        &self,
        source_id: &str,
        keywords: &[String],
    ) -> Result<Vec<u32>, Self::Error> {
        if keywords.is_empty() {
            return Ok(Vec::new());
        }

        let total = self.count(source_id)?;

        let mut sql = String::from("SELECT page_index FROM pages WHERE source_id = ?1");
        for position in 0..keywords.len() {
            sql.push_str(&format!(
                " AND lower(text) LIKE ?{} ESCAPE '\\'",
                position + 2
            ));
        }
        sql.push_str(" ORDER BY page_index");

        let mut bindings: Vec<Box<dyn rusqlite::ToSql>> =
            vec![Box::new(source_id.to_string())];
        for keyword in keywords {
            bindings.push(Box::new(format!("%{}%", escape_like(&keyword.to_lowercase()))));
        }
        let binding_refs: Vec<&dyn rusqlite::ToSql> =
            bindings.iter().map(|b| b.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let direct_hits = stmt
            .query_map(&binding_refs[..], |row| row.get::<_, i64>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        // Expand each hit to its neighbors, dedupe, clip to the source
        let mut hits = std::collections::BTreeSet::new();
        for hit in direct_hits {
            let hit = hit as u32;
            if hit > 0 {
                hits.insert(hit - 1);
            }
            hits.insert(hit);
            if hit + 1 < total {
                hits.insert(hit + 1);
            }
        }

        Ok(hits.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docket_pages() -> Vec<String> {
        vec![
            "Index of filings".to_string(),
            "Case No. 101 Smith v. Jones".to_string(),
            "continued argument".to_string(),
            "Case No. 102 Doe v. Roe".to_string(),
            "exhibits".to_string(),
        ]
    }

    fn store() -> SqlitePageStore {
        let mut store = SqlitePageStore::new(":memory:").unwrap();
        store.ingest_source("docket", &docket_pages()).unwrap();
        store
    }

    #[test]
    fn test_count_and_unknown_source() {
        let store = store();
        assert_eq!(store.count("docket").unwrap(), 5);
        assert_eq!(store.count("missing").unwrap(), 0);
    }

    #[test]
    fn test_fetch_range_in_order() {
        let store = store();

        let pages = store.fetch_range("docket", 1, 4).unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].index, 1);
        assert!(pages[0].text.contains("Smith"));
        assert_eq!(pages[2].index, 3);
    }

    #[test]
    fn test_fetch_range_past_end() {
        let store = store();
        let pages = store.fetch_range("docket", 3, 10).unwrap();
        assert_eq!(pages.len(), 2);
        assert!(store.fetch_range("docket", 10, 20).unwrap().is_empty());
    }

    #[test]
    fn test_fetch_pages_skips_missing() {
        let store = store();
        let pages = store.fetch_pages("docket", &[4, 99, 0]).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].index, 4);
        assert_eq!(pages[1].index, 0);
    }

    #[test]
    fn test_search_matches_memory_semantics() {
        let store = store();

        let hits = store
            .search_keywords("docket", &["case".to_string(), "smith".to_string()])
            .unwrap();
        assert_eq!(hits, vec![0, 1, 2]);

        let hits = store.search_keywords("docket", &["Case No.".to_string()]).unwrap();
        assert_eq!(hits, vec![0, 1, 2, 3, 4]);

        assert!(store
            .search_keywords("docket", &["zebra".to_string()])
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_search_escapes_like_wildcards() {
        let mut store = SqlitePageStore::new(":memory:").unwrap();
        store
            .ingest_source(
                "s",
                &["completion: 100%".to_string(), "plain text".to_string()],
            )
            .unwrap();

        let hits = store.search_keywords("s", &["100%".to_string()]).unwrap();
        assert_eq!(hits, vec![0, 1]);

        // '%' must not act as a wildcard
        assert!(store
            .search_keywords("s", &["1000000%".to_string()])
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_reingest_replaces_source() {
        let mut store = store();
        store
            .ingest_source("docket", &["only page".to_string()])
            .unwrap();

        assert_eq!(store.count("docket").unwrap(), 1);
        let pages = store.fetch_range("docket", 0, 10).unwrap();
        assert_eq!(pages[0].text, "only page");
    }

    #[test]
    fn test_list_sources() {
        let mut store = store();
        store
            .ingest_source("annex", &["a".to_string(), "b".to_string()])
            .unwrap();

        let sources = store.list_sources().unwrap();
        assert_eq!(sources, vec![("annex".to_string(), 2), ("docket".to_string(), 5)]);
    }

    #[test]
    fn test_persistence_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pages.db");

        {
            let mut store = SqlitePageStore::new(&path).unwrap();
            store.ingest_source("docket", &docket_pages()).unwrap();
        }

        let store = SqlitePageStore::new(&path).unwrap();
        assert_eq!(store.count("docket").unwrap(), 5);
        assert!(store.fetch_range("docket", 1, 2).unwrap()[0]
            .text
            .contains("Smith"));
    }
}
