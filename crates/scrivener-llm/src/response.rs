//! Defensive parsing of model output
//!
//! Model responses rarely arrive as clean JSON. They show up wrapped in
//! markdown fences, prefixed with prose, or trailed by commentary. The
//! helpers here pull the usable part out without ever trusting the shape of
//! what came back.

use regex::Regex;
use serde_json::Value;

/// Extract a JSON value from a raw model response
///
/// Tries, in order:
///
/// 1. the whole trimmed response
/// 2. the contents of the first fenced code block
/// 3. the first `{...}` region (outermost braces, greedy)
///
/// Returns `None` when nothing parses.
pub fn extract_json_value(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();

    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }

    if let Some(block) = extract_fenced_block(raw) {
        if let Ok(value) = serde_json::from_str(&block) {
            return Some(value);
        }
    }

    let object_re = Regex::new(r"\{[\s\S]+\}").unwrap();
    if let Some(found) = object_re.find(trimmed) {
        if let Ok(value) = serde_json::from_str(found.as_str()) {
            return Some(value);
        }
    }

    None
}

/// Contents of the first fenced code block, language tag ignored
///
/// Used both for JSON payloads and for patterns, which models like to wrap
/// as ```` ```regex ```` or ```` ```python ```` blocks.
pub fn extract_fenced_block(raw: &str) -> Option<String> {
    let fence_re = Regex::new(r"(?s)```(?:[a-zA-Z]+)?\s*(.+?)\s*```").unwrap();
    fence_re
        .captures(raw)
        .map(|caps| caps[1].trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_direct_object() {
        let value = extract_json_value(r#"{"name": "Case", "year": 2019}"#).unwrap();
        assert_eq!(value["name"], "Case");
    }

    #[test]
    fn test_direct_array() {
        let value = extract_json_value(r#"[{"a": 1}, {"a": 2}]"#).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_fenced_json_with_tag() {
        let raw = "Here is the result:\n```json\n{\"name\": \"Case\"}\n```\nDone.";
        let value = extract_json_value(raw).unwrap();
        assert_eq!(value, json!({"name": "Case"}));
    }

    #[test]
    fn test_fenced_array_without_tag() {
        let raw = "```\n[1, 2, 3]\n```";
        let value = extract_json_value(raw).unwrap();
        assert_eq!(value, json!([1, 2, 3]));
    }

    #[test]
    fn test_object_embedded_in_prose() {
        let raw = "Sure! The structure is {\"name\": \"Report\", \"structure\": {\"title\": \"str\"}} as requested.";
        let value = extract_json_value(raw).unwrap();
        assert_eq!(value["structure"]["title"], "str");
    }

    #[test]
    fn test_garbage_yields_none() {
        assert_eq!(extract_json_value("no json here at all"), None);
        assert_eq!(extract_json_value(""), None);
        assert_eq!(extract_json_value("{broken: json"), None);
    }

    #[test]
    fn test_fenced_block_extracts_pattern() {
        let raw = "Use this pattern:\n```regex\n^Case No\\. \\d+\n```";
        assert_eq!(
            extract_fenced_block(raw).unwrap(),
            "^Case No\\. \\d+".to_string()
        );
    }

    #[test]
    fn test_fenced_block_python_tag() {
        let raw = "```python\nr\"^Section \\d+\"\n```";
        assert_eq!(extract_fenced_block(raw).unwrap(), "r\"^Section \\d+\"");
    }

    #[test]
    fn test_fenced_block_absent() {
        assert_eq!(extract_fenced_block("plain text, no fences"), None);
    }

    #[test]
    fn test_greedy_braces_span_nested_objects() {
        let raw = "prefix {\"outer\": {\"inner\": 1}} suffix";
        let value = extract_json_value(raw).unwrap();
        assert_eq!(value["outer"]["inner"], 1);
    }
}
