//! Core record extraction over split spans

use std::fmt::Display;
use std::sync::Arc;

use scrivener_domain::traits::LlmProvider;
use scrivener_domain::Schema;
use scrivener_llm::response::extract_json_value;
use scrivener_llm::{generate_with_retry, RetryPolicy};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::prompt::PromptBuilder;

/// What one extraction pass over a set of spans produced
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractionOutcome {
    /// Records that passed schema validation, in span order
    pub records: Vec<Value>,

    /// Spans that yielded a parseable array
    pub spans_processed: usize,

    /// Spans dropped whole (failed call, no JSON, or not an array)
    pub spans_skipped: usize,

    /// Array elements dropped for failing schema validation
    pub records_skipped: usize,
}

/// Extracts schema-validated records from record spans
///
/// One model call per span. Failures stay local: a bad span or a bad
/// element costs only itself, never the batch.
pub struct RecordExtractor<L> {
    provider: Arc<L>,
    policy: RetryPolicy,
}

impl<L> RecordExtractor<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
{
    /// Create an extractor around a shared provider
    pub fn new(provider: Arc<L>, policy: RetryPolicy) -> Self {
        Self { provider, policy }
    }

    /// Extract records from every span, validating against `schema`
    pub async fn extract(&self, spans: &[String], schema: &Schema) -> ExtractionOutcome {
        let mut outcome = ExtractionOutcome::default();

        for (index, span) in spans.iter().enumerate() {
            let prompt = PromptBuilder::new(span.clone(), schema).build();

            let response = match generate_with_retry(&self.provider, &prompt, self.policy).await {
                Ok(response) => response,
                Err(e) => {
                    warn!("Extraction call failed on span {}: {}", index + 1, e);
                    outcome.spans_skipped += 1;
                    continue;
                }
            };

            let value = match extract_json_value(&response) {
                Some(value) => value,
                None => {
                    warn!("Span {} response held no JSON, skipping", index + 1);
                    outcome.spans_skipped += 1;
                    continue;
                }
            };

            let elements = match value {
                Value::Array(elements) => elements,
                _ => {
                    warn!("Span {} returned a non-array response, skipping", index + 1);
                    outcome.spans_skipped += 1;
                    continue;
                }
            };

            debug!("Span {}: {} candidate record(s)", index + 1, elements.len());

            for element in elements {
                match schema.validate_record(&element) {
                    Ok(()) => outcome.records.push(element),
                    Err(violations) => {
                        let reasons: Vec<String> =
                            violations.iter().map(ToString::to_string).collect();
                        warn!("Span {} record rejected: {}", index + 1, reasons.join("; "));
                        outcome.records_skipped += 1;
                    }
                }
            }

            outcome.spans_processed += 1;
        }

        info!(
            "Extraction pass complete: {} record(s) from {} span(s), {} span(s) skipped, {} record(s) rejected",
            outcome.records.len(),
            outcome.spans_processed,
            outcome.spans_skipped,
            outcome.records_skipped
        );

        outcome
    }
}
