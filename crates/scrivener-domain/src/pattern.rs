//! Record-boundary patterns

use std::fmt;

/// A record-boundary pattern: a regular expression whose matches mark where
/// a new record begins
///
/// The pattern is stored as source text; compilation happens at the point of
/// use, always with multi-line semantics so `^` anchors at line starts.
/// Splitting cuts at match starts, which leaves the matched text attached to
/// the span it opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPattern(String);

impl SplitPattern {
    /// Wrap a raw pattern, normalizing a single outer look-ahead wrapper
    ///
    /// Models trained on look-ahead-split idioms tend to emit patterns like
    /// `(?=^Case No\.)`. Cutting at match starts already gives that
    /// behavior, and the regex engine has no look-around, so one enclosing
    /// `(?=...)` is stripped when its parentheses balance.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self(strip_lookahead_wrapper(raw.trim()))
    }

    /// The pattern source text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SplitPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SplitPattern {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Remove one enclosing `(?=...)` when the trailing `)` really closes it
fn strip_lookahead_wrapper(raw: &str) -> String {
    let inner = match raw.strip_prefix("(?=").and_then(|r| r.strip_suffix(')')) {
        Some(inner) => inner,
        None => return raw.to_string(),
    };

    // The stripped ')' must pair with the leading '(?=': scan the inner text
    // and bail out if its parentheses close more than they open
    let mut depth = 0i32;
    let mut escaped = false;
    let mut in_class = false;
    for ch in inner.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '[' if !in_class => in_class = true,
            ']' if in_class => in_class = false,
            '(' if !in_class => depth += 1,
            ')' if !in_class => {
                depth -= 1;
                if depth < 0 {
                    return raw.to_string();
                }
            }
            _ => {}
        }
    }

    if depth == 0 && !in_class && !escaped {
        inner.to_string()
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_pattern_unchanged() {
        let pattern = SplitPattern::new(r"^Case No\. \d+");
        assert_eq!(pattern.as_str(), r"^Case No\. \d+");
    }

    #[test]
    fn test_outer_lookahead_stripped() {
        let pattern = SplitPattern::new(r"(?=^Case No\. \d+)");
        assert_eq!(pattern.as_str(), r"^Case No\. \d+");
    }

    #[test]
    fn test_lookahead_with_inner_group_stripped() {
        let pattern = SplitPattern::new(r"(?=^(ORDER|JUDGMENT):)");
        assert_eq!(pattern.as_str(), r"^(ORDER|JUDGMENT):");
    }

    #[test]
    fn test_alternation_of_lookaheads_kept() {
        // The trailing ')' closes the second look-ahead, not the first
        let raw = r"(?=^A)|(?=^B)";
        let pattern = SplitPattern::new(raw);
        assert_eq!(pattern.as_str(), raw);
    }

    #[test]
    fn test_class_containing_paren_stripped() {
        let pattern = SplitPattern::new(r"(?=[)])");
        assert_eq!(pattern.as_str(), r"[)]");
    }

    #[test]
    fn test_escaped_paren_handled() {
        let pattern = SplitPattern::new(r"(?=^\(\d+\))");
        assert_eq!(pattern.as_str(), r"^\(\d+\)");
    }

    #[test]
    fn test_whitespace_trimmed() {
        let pattern = SplitPattern::new("  ^Header  \n");
        assert_eq!(pattern.as_str(), "^Header");
    }
}
