//! Output formatting for the CLI.

use colored::*;
use serde_json::Value;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

use crate::error::Result;

/// Maximum rows shown in a records table before the rest is summarized.
const MAX_TABLE_ROWS: usize = 50;

/// Maximum width of a single table cell.
const MAX_CELL_WIDTH: usize = 48;

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Format the source listing as a table.
    pub fn format_sources(&self, sources: &[(String, u32)]) -> String {
        if sources.is_empty() {
            return self.colorize("No sources ingested.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Source", "Pages"]);
        for (source_id, pages) in sources {
            builder.push_record([source_id.as_str(), &pages.to_string()]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format extracted records as a table keyed by the first record's fields.
    pub fn format_records(&self, records: &[Value]) -> String {
        let columns = match records.first().and_then(Value::as_object) {
            Some(first) => {
                let mut keys: Vec<String> = first.keys().cloned().collect();
                keys.sort();
                keys
            }
            None => return self.colorize("No records extracted.", "yellow"),
        };

        let mut builder = Builder::default();
        builder.push_record(columns.iter().map(String::as_str));

        for record in records.iter().take(MAX_TABLE_ROWS) {
            let row: Vec<String> = columns
                .iter()
                .map(|key| {
                    record
                        .get(key)
                        .map(cell_text)
                        .unwrap_or_default()
                })
                .collect();
            builder.push_record(row);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let mut output = table.to_string();
        if records.len() > MAX_TABLE_ROWS {
            output.push_str(&format!(
                "\n... and {} more record(s)",
                records.len() - MAX_TABLE_ROWS
            ));
        }
        output
    }

    /// Format records as pretty JSON.
    pub fn format_records_json(&self, records: &[Value]) -> Result<String> {
        Ok(serde_json::to_string_pretty(records)?)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Render a JSON value as a table cell, truncating long strings.
fn cell_text(value: &Value) -> String {
    let text = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    if text.chars().count() > MAX_CELL_WIDTH {
        let truncated: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
        format!("{}…", truncated)
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sources_table() {
        let formatter = Formatter::new(false);
        let output =
            formatter.format_sources(&[("docket".to_string(), 5), ("annex".to_string(), 2)]);
        assert!(output.contains("docket"));
        assert!(output.contains("Pages"));
    }

    #[test]
    fn test_empty_sources() {
        let formatter = Formatter::new(false);
        assert!(formatter.format_sources(&[]).contains("No sources"));
    }

    #[test]
    fn test_records_table_columns_sorted() {
        let formatter = Formatter::new(false);
        let records = vec![
            json!({"year": "1999", "case_number": "101"}),
            json!({"year": "2001", "case_number": "102"}),
        ];
        let output = formatter.format_records(&records);
        assert!(output.contains("case_number"));
        assert!(output.contains("101"));
        assert!(output.find("case_number").unwrap() < output.find("year").unwrap());
    }

    #[test]
    fn test_empty_records() {
        let formatter = Formatter::new(false);
        assert!(formatter.format_records(&[]).contains("No records"));
    }

    #[test]
    fn test_long_cell_is_truncated() {
        let formatter = Formatter::new(false);
        let records = vec![json!({"summary": "x".repeat(200)})];
        let output = formatter.format_records(&records);
        assert!(output.contains('…'));
        assert!(!output.contains(&"x".repeat(100)));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(false);
        assert_eq!(formatter.success("done"), "✓ done");
    }
}
