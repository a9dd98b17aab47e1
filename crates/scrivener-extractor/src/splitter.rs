//! Cutting a window chunk into per-record spans
//!
//! The boundary pattern marks where records begin, so the text is cut at the
//! start of every match and the matched text stays attached to the span it
//! opens. A merge-repair pass then reattaches fragments that do not begin
//! with a boundary of their own; only the first fragment is allowed to stand
//! without one, so leading preamble text survives as its own span.

use regex::RegexBuilder;
use scrivener_domain::SplitPattern;

use crate::error::ExtractorError;

/// Split `text` into record spans at every match of `pattern`
///
/// Whitespace-only fragments are dropped. Everything else is preserved:
/// concatenating the spans recovers the input text minus only the
/// whitespace trimmed at fragment edges.
pub fn split_spans(text: &str, pattern: &SplitPattern) -> Result<Vec<String>, ExtractorError> {
    let regex = RegexBuilder::new(pattern.as_str())
        .multi_line(true)
        .build()
        .map_err(|e| ExtractorError::InvalidPattern(e.to_string()))?;

    let mut starts: Vec<usize> = regex.find_iter(text).map(|m| m.start()).collect();
    if starts.first() != Some(&0) {
        starts.insert(0, 0);
    }
    starts.push(text.len());

    let mut spans: Vec<String> = Vec::new();
    for pair in starts.windows(2) {
        let fragment = text[pair[0]..pair[1]].trim();
        if fragment.is_empty() {
            continue;
        }

        let opens_record = regex
            .find(fragment)
            .map(|m| m.start() == 0)
            .unwrap_or(false);

        match spans.last_mut() {
            Some(last) if !opens_record => {
                last.push('\n');
                last.push_str(fragment);
            }
            _ => spans.push(fragment.to_string()),
        }
    }

    Ok(spans)
}
