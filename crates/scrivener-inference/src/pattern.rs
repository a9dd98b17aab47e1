//! Split-pattern inference with optional model-side validation

use std::fmt::Display;
use std::sync::Arc;

use regex::{Regex, RegexBuilder};
use scrivener_domain::traits::LlmProvider;
use scrivener_domain::{Page, Schema, SplitPattern};
use scrivener_llm::response::extract_fenced_block;
use scrivener_llm::{generate_with_retry, LlmError, RetryPolicy};
use tracing::{debug, warn};

use crate::error::InferenceError;
use crate::prompt;

/// What the model-side validator said about a candidate split
enum Verdict {
    Accepted,
    Rejected(String),
}

/// Discovers the record-boundary pattern for a source
///
/// Same refinement shape as schema inference: one prompt per sample, every
/// previously accepted pattern fed forward, last acceptable candidate wins.
/// A candidate only counts if it compiles and matches the sample it was
/// inferred from at least once.
pub struct PatternInferrer<L> {
    provider: Arc<L>,
    policy: RetryPolicy,
    validate: bool,
}

impl<L> PatternInferrer<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
{
    /// Create an inferrer around a shared provider
    pub fn new(provider: Arc<L>, policy: RetryPolicy) -> Self {
        Self {
            provider,
            policy,
            validate: false,
        }
    }

    /// Gate candidates behind a second model call that inspects the split
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Infer a split pattern from sampled pages
    pub async fn infer(
        &self,
        schema: &Schema,
        samples: &[Page],
    ) -> Result<SplitPattern, InferenceError> {
        if samples.is_empty() {
            return Err(InferenceError::Pattern(
                "no sample pages to infer from".to_string(),
            ));
        }

        let mut accepted: Vec<String> = Vec::new();
        let mut rejections: Vec<String> = Vec::new();
        let mut current: Option<SplitPattern> = None;

        for (index, page) in samples.iter().enumerate() {
            let prompt =
                prompt::pattern_inference_prompt(schema, &page.text, &accepted, &rejections);

            let response = match generate_with_retry(&self.provider, &prompt, self.policy).await {
                Ok(response) => response,
                Err(e) => {
                    warn!("Pattern inference call failed on sample {}: {}", index, e);
                    continue;
                }
            };

            let raw = extract_fenced_block(&response).unwrap_or_else(|| response.trim().to_string());
            let candidate = SplitPattern::new(&raw);

            let regex = match RegexBuilder::new(candidate.as_str()).multi_line(true).build() {
                Ok(regex) => regex,
                Err(e) => {
                    warn!(
                        "Sample {} candidate '{}' does not compile: {}",
                        index, candidate, e
                    );
                    continue;
                }
            };

            if regex.find(&page.text).is_none() {
                warn!(
                    "Sample {} candidate '{}' never matches its own sample",
                    index, candidate
                );
                continue;
            }

            if self.validate {
                match self.validate_candidate(schema, &page.text, &regex).await {
                    Ok(Verdict::Accepted) => {}
                    Ok(Verdict::Rejected(reason)) => {
                        debug!(
                            "Sample {} candidate '{}' rejected by validator: {}",
                            index, candidate, reason
                        );
                        rejections.push(reason);
                        continue;
                    }
                    Err(e) => {
                        warn!(
                            "Pattern validator unavailable on sample {}, keeping candidate: {}",
                            index, e
                        );
                    }
                }
            }

            debug!("Sample {} accepted pattern '{}'", index, candidate);
            accepted.push(candidate.as_str().to_string());
            current = Some(candidate);
        }

        current.ok_or_else(|| {
            InferenceError::Pattern("no sample produced a usable split pattern".to_string())
        })
    }

    async fn validate_candidate(
        &self,
        schema: &Schema,
        sample_text: &str,
        regex: &Regex,
    ) -> Result<Verdict, LlmError> {
        let spans = cut_at_matches(sample_text, regex);
        let prompt = prompt::pattern_validation_prompt(schema, &spans);
        let response = generate_with_retry(&self.provider, &prompt, self.policy).await?;
        Ok(parse_verdict(&response))
    }
}

/// Raw cut at match starts, just enough to show the validator how the
/// candidate divides the sample. The merge-repairing splitter that
/// extraction uses lives in the extractor crate.
fn cut_at_matches(text: &str, regex: &Regex) -> Vec<String> {
    let mut starts: Vec<usize> = regex.find_iter(text).map(|m| m.start()).collect();
    if starts.first() != Some(&0) {
        starts.insert(0, 0);
    }
    starts.push(text.len());

    starts
        .windows(2)
        .map(|pair| text[pair[0]..pair[1]].trim())
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_verdict(response: &str) -> Verdict {
    let trimmed = response.trim();
    if trimmed.to_ascii_lowercase().starts_with("true") {
        return Verdict::Accepted;
    }

    let reason = trimmed
        .split_once(':')
        .map(|(_, reason)| reason.trim())
        .filter(|reason| !reason.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "No reason provided.".to_string());
    Verdict::Rejected(reason)
}
