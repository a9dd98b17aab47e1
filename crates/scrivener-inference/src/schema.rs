//! Schema inference over sampled pages

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use scrivener_domain::traits::LlmProvider;
use scrivener_domain::{FieldSpec, Page, Schema};
use scrivener_llm::response::extract_json_value;
use scrivener_llm::{generate_with_retry, RetryPolicy};
use tracing::{debug, warn};

use crate::error::InferenceError;
use crate::prompt;

/// Discovers the record schema by asking the model about sampled pages
///
/// One prompt per sample; the previously accepted schema rides along as
/// feedback, and whichever sample last produced a valid schema wins.
pub struct SchemaInferrer<L> {
    provider: Arc<L>,
    policy: RetryPolicy,
}

impl<L> SchemaInferrer<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
{
    /// Create an inferrer around a shared provider
    pub fn new(provider: Arc<L>, policy: RetryPolicy) -> Self {
        Self { provider, policy }
    }

    /// Infer a schema from sampled pages
    ///
    /// Individual samples are allowed to fail (bad response, no JSON,
    /// rejected shape); the run only fails when every sample did.
    pub async fn infer(&self, samples: &[Page]) -> Result<Schema, InferenceError> {
        if samples.is_empty() {
            return Err(InferenceError::Schema(
                "no sample pages to infer from".to_string(),
            ));
        }

        let mut current: Option<Schema> = None;

        for (index, page) in samples.iter().enumerate() {
            let prompt = prompt::schema_inference_prompt(&page.text, current.as_ref());

            let response = match generate_with_retry(&self.provider, &prompt, self.policy).await {
                Ok(response) => response,
                Err(e) => {
                    warn!("Schema inference call failed on sample {}: {}", index, e);
                    continue;
                }
            };

            let value = match extract_json_value(&response) {
                Some(value) => value,
                None => {
                    warn!("Sample {} response held no JSON, skipping", index);
                    continue;
                }
            };

            match Schema::from_value(&value) {
                Ok(schema) => {
                    debug!(
                        "Sample {}: accepted schema '{}' with {} field(s)",
                        index,
                        schema.name,
                        schema.structure.len()
                    );
                    current = Some(schema);
                }
                Err(e) => warn!("Sample {} schema rejected: {}", index, e),
            }
        }

        current
            .ok_or_else(|| InferenceError::Schema("no sample produced a usable schema".to_string()))
    }

    /// Build a schema from caller-supplied fields
    ///
    /// Unlike [`infer`](Self::infer) there is no sample loop to fall back
    /// on; instead every attempt in the policy budget covers the whole
    /// call-parse-validate sequence, so a malformed response gets re-asked
    /// just like a failed call. Only an exhausted budget is fatal.
    pub async fn generate(
        &self,
        fields: &[FieldSpec],
        query: Option<&str>,
    ) -> Result<Schema, InferenceError> {
        if fields.is_empty() {
            return Err(InferenceError::Schema("no fields supplied".to_string()));
        }

        let prompt = prompt::schema_generation_prompt(fields, query);
        // One provider call per attempt; the outer loop owns the budget
        let single_call = RetryPolicy::new(1, Duration::ZERO);

        let mut last_error = InferenceError::Schema("no attempts were made".to_string());
        for attempt in 1..=self.policy.max_attempts {
            match self.generate_attempt(&prompt, single_call).await {
                Ok(schema) => return Ok(schema),
                Err(e) => {
                    warn!(
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        error = %e,
                        "Schema generation attempt failed"
                    );
                    last_error = e;
                    if attempt < self.policy.max_attempts {
                        tokio::time::sleep(self.policy.delay).await;
                    }
                }
            }
        }

        Err(last_error)
    }

    async fn generate_attempt(
        &self,
        prompt: &str,
        single_call: RetryPolicy,
    ) -> Result<Schema, InferenceError> {
        let response = generate_with_retry(&self.provider, prompt, single_call)
            .await
            .map_err(|e| InferenceError::Llm(e.to_string()))?;

        let value = extract_json_value(&response)
            .ok_or_else(|| InferenceError::Schema("schema response held no JSON".to_string()))?;

        Schema::from_value(&value).map_err(|e| InferenceError::Schema(e.to_string()))
    }
}
