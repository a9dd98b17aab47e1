//! LLM prompt engineering for record extraction

use scrivener_domain::Schema;

/// Builds the per-span extraction prompt
pub struct PromptBuilder {
    span: String,
    schema_json: String,
}

impl PromptBuilder {
    /// Create a prompt builder for one span
    pub fn new(span: impl Into<String>, schema: &Schema) -> Self {
        Self {
            span: span.into(),
            schema_json: serde_json::to_string_pretty(schema).unwrap_or_default(),
        }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(EXTRACTION_INSTRUCTIONS);

        prompt.push_str("\n\n### Schema:\n");
        prompt.push_str(&self.schema_json);

        prompt.push_str("\n\n### Input Text:\n---\n");
        prompt.push_str(self.span.trim());
        prompt.push_str("\n---\n\n");

        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"You are a structured data extractor. The input text contains one or more records of the type described by the schema below. Extract every record present.

Rules:
- Return a JSON array of record objects, even when only one record is present.
- Each object must carry every schema field, with a value of the declared type.
- Take values from the input text; do not invent data.
- Do not add fields the schema does not declare."#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Output format (JSON array only, no additional text):
[
  {
    "field": "value"
  }
]

Remember: Return ONLY valid JSON, no markdown code blocks, no explanations."#;
