//! Prompt construction for schema and pattern inference

use scrivener_domain::{FieldSpec, Schema};

/// Chunks shown to the pattern validator before the prompt is cut off
const VALIDATION_SPAN_LIMIT: usize = 10;

const SCHEMA_INSTRUCTIONS: &str = r#"You are a report assistant tasked with deriving a record schema from sample document text.

Instructions:
1. Carefully read the context provided.
2. Identify the repeating record this document is made of and the fields each record carries.
3. Return only a strict JSON object with two fields:
    - "name": a PascalCase name for the record type.
    - "structure": an object mapping each field name to its type tag.

Allowed type tags: "string", "integer", "float", "boolean", "list", "object".

### Output Format:
{
    "name": "YourRecordName",
    "structure": {
        "field_one": "string",
        "field_two": "integer"
    }
}

Output Requirements:
- Return only the JSON object.
- Do not explain the schema.
- Do not include any comments or markdown."#;

const GENERATION_INSTRUCTIONS: &str = r#"You are a report assistant tasked with turning a requested field list into a record schema.

Instructions:
1. Use every requested field, keeping the names exactly as given.
2. Where a field carries a type, keep it; otherwise pick the most natural type tag.
3. Return only a strict JSON object with two fields:
    - "name": a PascalCase name for the record type.
    - "structure": an object mapping each field name to its type tag.

Allowed type tags: "string", "integer", "float", "boolean", "list", "object".

Output Requirements:
- Return only the JSON object.
- Do not explain the schema.
- Do not include any comments or markdown."#;

const PATTERN_INSTRUCTIONS: &str = r#"You are an expert in analyzing unstructured text to extract structured records.

## Goal:
Analyze the sample input text and identify the optimal boundary pattern: a regular expression whose matches mark the start of each new record, so that every resulting chunk contains one full logical record with the fields in the given schema.

## Requirements:
- Examine the schema to understand what fields must be present in each complete record.
- Infer a distinctive, recurring pattern in the input text that marks the start of a new record (titles, session headers, section dividers, unique codes).
- Anchor the pattern to the start of a line where possible.
- The pattern is applied with multi-line semantics; do not use look-around.
- Your output must be a single raw regex pattern inside triple backticks, with no extra comments or markdown."#;

const VALIDATION_INSTRUCTIONS: &str = r#"You are a precise validator of structured data extraction.

Task:
- A boundary pattern was used to split a document into the chunks below.
- Each chunk is expected to hold one complete record with every required field.

Instructions:
- Check whether each chunk contains all required fields.
- Return `True` if the split works well.
- Otherwise return `False` and a short explanation of what is wrong.

### Output Format:
Return `True` or `False: <reason>`, nothing else."#;

/// Prompt for one schema-inference sample, with the prior schema as feedback
pub fn schema_inference_prompt(sample_text: &str, prior: Option<&Schema>) -> String {
    let mut prompt = String::new();
    prompt.push_str(SCHEMA_INSTRUCTIONS);
    prompt.push_str("\n\n### Context:\n");
    prompt.push_str(sample_text.trim());
    prompt.push('\n');

    if let Some(schema) = prior {
        prompt.push_str("\n### Previous structure attempt:\n");
        prompt.push_str(&render_schema(schema));
        prompt.push_str("\nRefine it if this context shows fields it misses or gets wrong.\n");
    }

    prompt
}

/// Single-shot prompt building a schema from caller-supplied fields
pub fn schema_generation_prompt(fields: &[FieldSpec], query: Option<&str>) -> String {
    let mut prompt = String::new();
    prompt.push_str(GENERATION_INSTRUCTIONS);

    prompt.push_str("\n\n### Requested fields:\n");
    for field in fields {
        match field.type_hint {
            Some(ty) => prompt.push_str(&format!("- {} ({})\n", field.name, ty)),
            None => prompt.push_str(&format!("- {}\n", field.name)),
        }
    }

    if let Some(query) = query {
        if !query.trim().is_empty() {
            prompt.push_str("\n### Context:\n");
            prompt.push_str(query.trim());
            prompt.push('\n');
        }
    }

    prompt
}

/// Prompt for one pattern-inference sample
///
/// Patterns accepted from earlier samples and validator rejection reasons
/// both ride along so each sample generalizes rather than starts over.
pub fn pattern_inference_prompt(
    schema: &Schema,
    sample_text: &str,
    prior_patterns: &[String],
    rejections: &[String],
) -> String {
    let mut prompt = String::new();
    prompt.push_str(PATTERN_INSTRUCTIONS);

    prompt.push_str("\n\n## Schema:\n");
    prompt.push_str(&render_schema(schema));

    prompt.push_str("\n\n## Sample Input Text:\n");
    prompt.push_str(sample_text.trim());
    prompt.push('\n');

    if !prior_patterns.is_empty() {
        prompt.push_str("\n## Patterns inferred from other pages:\n");
        for pattern in prior_patterns {
            prompt.push_str(&format!("- `{}`\n", pattern));
        }
        prompt.push_str("Produce one general pattern that also covers the pages those came from.\n");
    }

    if !rejections.is_empty() {
        prompt.push_str("\n## Problems found with earlier patterns:\n");
        for reason in rejections {
            prompt.push_str(&format!("- {}\n", reason));
        }
    }

    prompt.push_str("\n## Output:\nA single regex pattern inside triple backticks.\n");
    prompt
}

/// Prompt asking the model to judge the chunks a candidate pattern produced
pub fn pattern_validation_prompt(schema: &Schema, spans: &[String]) -> String {
    let mut prompt = String::new();
    prompt.push_str(VALIDATION_INSTRUCTIONS);

    prompt.push_str("\n\nRequired fields: ");
    prompt.push_str(&schema.field_names().collect::<Vec<_>>().join(", "));
    prompt.push('\n');

    for (index, span) in spans.iter().take(VALIDATION_SPAN_LIMIT).enumerate() {
        prompt.push_str(&format!("\n### Chunk {}:\n{}\n", index + 1, span));
    }

    prompt
}

fn render_schema(schema: &Schema) -> String {
    serde_json::to_string_pretty(schema).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrivener_domain::FieldType;

    fn case_schema() -> Schema {
        Schema::new("Case")
            .with_field("case_number", FieldType::String)
            .with_field("year", FieldType::Integer)
    }

    #[test]
    fn test_schema_inference_prompt_includes_context() {
        let prompt = schema_inference_prompt("Case No. 101 Smith v. Jones", None);

        assert!(prompt.contains("### Context:"));
        assert!(prompt.contains("Case No. 101 Smith v. Jones"));
        assert!(!prompt.contains("Previous structure attempt"));
    }

    #[test]
    fn test_schema_inference_prompt_feeds_prior_schema() {
        let prompt = schema_inference_prompt("more text", Some(&case_schema()));

        assert!(prompt.contains("### Previous structure attempt:"));
        assert!(prompt.contains("\"Case\""));
        assert!(prompt.contains("\"case_number\""));
    }

    #[test]
    fn test_schema_generation_prompt_lists_fields_and_query() {
        let fields = vec![
            FieldSpec::typed("case_number", FieldType::String),
            FieldSpec::named("parties"),
        ];
        let prompt = schema_generation_prompt(&fields, Some("civil court dockets"));

        assert!(prompt.contains("- case_number (string)"));
        assert!(prompt.contains("- parties\n"));
        assert!(prompt.contains("civil court dockets"));
    }

    #[test]
    fn test_schema_generation_prompt_omits_empty_query() {
        let prompt = schema_generation_prompt(&[FieldSpec::named("title")], Some("   "));

        assert!(!prompt.contains("### Context:"));
    }

    #[test]
    fn test_pattern_prompt_includes_schema_and_sample() {
        let prompt = pattern_inference_prompt(&case_schema(), "Case No. 101", &[], &[]);

        assert!(prompt.contains("\"Case\""));
        assert!(prompt.contains("Case No. 101"));
        assert!(!prompt.contains("Patterns inferred from other pages"));
        assert!(!prompt.contains("Problems found"));
    }

    #[test]
    fn test_pattern_prompt_feeds_prior_patterns_and_rejections() {
        let priors = vec![r"^Case No\. \d+".to_string()];
        let rejections = vec!["chunks are missing the year".to_string()];
        let prompt = pattern_inference_prompt(&case_schema(), "text", &priors, &rejections);

        assert!(prompt.contains(r"`^Case No\. \d+`"));
        assert!(prompt.contains("chunks are missing the year"));
    }

    #[test]
    fn test_validation_prompt_caps_spans() {
        let spans: Vec<String> = (1..=12).map(|i| format!("chunk body {}", i)).collect();
        let prompt = pattern_validation_prompt(&case_schema(), &spans);

        assert!(prompt.contains("Required fields: case_number, year"));
        assert!(prompt.contains("### Chunk 10:"));
        assert!(!prompt.contains("### Chunk 11:"));
    }
}
