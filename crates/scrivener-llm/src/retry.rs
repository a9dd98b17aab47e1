//! Bounded retry around provider calls
//!
//! Providers are synchronous and single-attempt; the pipeline stages that
//! call them share one retry policy: a small fixed number of attempts with a
//! constant pause in between. Both knobs are configuration so tests can run
//! with zero delay.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use scrivener_domain::traits::LlmProvider;
use tracing::warn;

use crate::LlmError;

/// How often and how patiently to re-issue a failed provider call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per call, first try included (minimum 1)
    pub max_attempts: u32,

    /// Fixed pause between attempts
    pub delay: Duration,
}

impl RetryPolicy {
    /// Policy with the given attempt bound and inter-attempt delay
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Retry without waiting, for tests
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    /// Two attempts, three seconds apart
    fn default() -> Self {
        Self::new(2, Duration::from_secs(3))
    }
}

/// Call the provider off the async executor, retrying under `policy`
///
/// Each attempt runs on a blocking task so a synchronous HTTP client (or a
/// mock) never stalls the runtime. Attempt failures are logged; the last
/// error is returned once attempts are exhausted.
pub async fn generate_with_retry<L>(
    provider: &Arc<L>,
    prompt: &str,
    policy: RetryPolicy,
) -> Result<String, LlmError>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut last_error = LlmError::Other("no attempts were made".to_string());

    for attempt in 1..=max_attempts {
        let provider = Arc::clone(provider);
        let prompt = prompt.to_string();

        let result = tokio::task::spawn_blocking(move || {
            provider
                .generate(&prompt)
                .map_err(|e| LlmError::Other(e.to_string()))
        })
        .await
        .map_err(|e| LlmError::Other(format!("LLM task failed: {}", e)))?;

        match result {
            Ok(response) => return Ok(response),
            Err(e) => {
                warn!(attempt, max_attempts, error = %e, "LLM call failed");
                last_error = e;
                if attempt < max_attempts {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }

    Err(last_error)
}
