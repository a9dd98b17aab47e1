//! Page sampling for the inference stages
//!
//! Inference never reads a whole corpus. It looks at a handful of pages,
//! drawn uniformly across the source, or from the keyword hit list when the
//! run is keyword-driven. The generator is injected so tests can seed it.

use std::fmt::Display;

use rand::seq::index;
use rand::Rng;
use scrivener_domain::traits::PageStore;
use scrivener_domain::Page;
use tracing::debug;

use crate::error::InferenceError;

/// Pick up to `count` distinct page indexes from `0..total`, ascending
pub fn sample_indexes<R: Rng + ?Sized>(total: u32, count: usize, rng: &mut R) -> Vec<u32> {
    let total = total as usize;
    if total == 0 || count == 0 {
        return Vec::new();
    }
    if count >= total {
        return (0..total as u32).collect();
    }

    let mut picked: Vec<u32> = index::sample(rng, total, count)
        .into_iter()
        .map(|i| i as u32)
        .collect();
    picked.sort_unstable();
    picked
}

/// Fetch sample pages for inference
///
/// With keywords present the samples come from the hit list, so the pages
/// the inferrers study are the pages the run will actually extract from.
pub fn sample_pages<S, R>(
    store: &S,
    source_id: &str,
    count: usize,
    keywords: &[String],
    rng: &mut R,
) -> Result<Vec<Page>, InferenceError>
where
    S: PageStore,
    S::Error: Display,
    R: Rng + ?Sized,
{
    let indexes = if keywords.is_empty() {
        let total = store
            .count(source_id)
            .map_err(|e| InferenceError::Store(e.to_string()))?;
        sample_indexes(total, count, rng)
    } else {
        let hits = store
            .search_keywords(source_id, keywords)
            .map_err(|e| InferenceError::Store(e.to_string()))?;
        if hits.len() <= count {
            hits
        } else {
            let mut picked: Vec<u32> = index::sample(rng, hits.len(), count)
                .into_iter()
                .map(|i| hits[i])
                .collect();
            picked.sort_unstable();
            picked
        }
    };

    debug!(
        "Sampled {} page(s) from source '{}' for inference",
        indexes.len(),
        source_id
    );

    store
        .fetch_pages(source_id, &indexes)
        .map_err(|e| InferenceError::Store(e.to_string()))
}
