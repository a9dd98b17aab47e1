//! The run driver
//!
//! [`Pipeline`] owns the side effects the stage machine sequences: sampling
//! and fetching pages, calling the inferrers and the extractor, publishing
//! events, and honoring stop requests. One call to [`Pipeline::run`] is one
//! run; concurrent runs get their own context and never share state beyond
//! the injected collaborators.

use std::fmt::Display;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use scrivener_domain::traits::{CancellationStore, EventSink, LlmProvider, PageStore};
use scrivener_domain::{Page, RunEvent, RunId, WhitespaceTokenCounter, Windower};
use scrivener_extractor::{split_spans, RecordExtractor};
use scrivener_inference::{sample_pages, PatternInferrer, SchemaInferrer};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::context::{RunContext, RunRequest};
use crate::error::PipelineError;
use crate::machine::{next_stage, Stage};

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Pagination exhausted without a fatal error
    Completed,

    /// A stage could not produce its required output
    Failed,

    /// A stop request was honored at a checkpoint
    Stopped,
}

/// What one run produced
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Identity of the run
    pub run_id: RunId,

    /// Terminal path taken
    pub status: RunStatus,

    /// Validated records accumulated across completed windows
    pub records: Vec<serde_json::Value>,

    /// Pagination batches fetched
    pub iterations: u32,

    /// Fatal error message, present only when `status` is `Failed`
    pub error: Option<String>,

    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl RunOutcome {
    /// Whether the run reached normal completion
    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Completed
    }
}

/// Drives runs over injected collaborators
///
/// Generic over the four infrastructure seams so tests run entirely against
/// in-memory fakes and a scripted provider.
pub struct Pipeline<S, L, E, C> {
    store: Arc<S>,
    provider: Arc<L>,
    events: Arc<E>,
    flags: Arc<C>,
    config: PipelineConfig,
    rng: Mutex<StdRng>,
}

impl<S, L, E, C> Pipeline<S, L, E, C>
where
    S: PageStore,
    S::Error: Display,
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
    E: EventSink,
    E::Error: Display,
    C: CancellationStore,
    C::Error: Display,
{
    /// Create a pipeline over the given collaborators
    pub fn new(
        store: Arc<S>,
        provider: Arc<L>,
        events: Arc<E>,
        flags: Arc<C>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            provider,
            events,
            flags,
            config,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Seed the sampling generator, for deterministic tests
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Execute one run to its terminal state
    ///
    /// Always returns an outcome; failures end the run rather than escape
    /// it. Exactly one terminal event is published, whichever path the run
    /// takes, and the stop flag is initialized on entry and cleared on every
    /// exit.
    pub async fn run(&self, request: RunRequest) -> RunOutcome {
        let started_at = Instant::now();
        let run_id = request.run_id.unwrap_or_else(RunId::new);
        let mut ctx = RunContext::new(run_id, request, self.config.page_batch_limit);

        if let Err(e) = self.flags.set_stop(run_id, false) {
            warn!("Could not initialize stop flag for run {}: {}", run_id, e);
        }
        self.publish(run_id, RunEvent::started("Run started"));
        info!("Run {} started on source '{}'", run_id, ctx.source_id);

        let mut stage = Stage::Start;
        let mut stopped = false;
        loop {
            stage = next_stage(stage, &ctx);
            if stage == Stage::End {
                break;
            }

            // Cooperative checkpoint: a stop observed here halts before the
            // stage issues any further calls
            if self.stop_requested(run_id) {
                stopped = true;
                break;
            }

            debug!("Run {} entering stage {:?}", run_id, stage);
            if let Err(e) = self.run_stage(stage, &mut ctx).await {
                warn!("Run {} stage {:?} failed: {}", run_id, stage, e);
                ctx.fail(e.to_string());
            }
        }

        let status = if stopped {
            RunStatus::Stopped
        } else if ctx.has_error() {
            RunStatus::Failed
        } else {
            RunStatus::Completed
        };

        let terminal = match status {
            RunStatus::Stopped => RunEvent::stopped(
                "Stop requested, run halted",
                json!({
                    "records": ctx.records_value(),
                    "iteration": ctx.cursor.iteration(),
                }),
            ),
            RunStatus::Failed => {
                RunEvent::failed(ctx.error.clone().unwrap_or_else(|| "Run failed".to_string()))
            }
            RunStatus::Completed => RunEvent::completed(
                "Run completed",
                json!({
                    "records": ctx.records_value(),
                    "iteration": ctx.cursor.iteration(),
                }),
            ),
        };
        self.publish(run_id, terminal);

        if let Err(e) = self.flags.clear(run_id) {
            warn!("Could not clear stop flag for run {}: {}", run_id, e);
        }

        info!(
            "Run {} finished: {:?}, {} record(s) in {} batch(es)",
            run_id,
            status,
            ctx.records.len(),
            ctx.cursor.iteration()
        );

        RunOutcome {
            run_id,
            status,
            records: ctx.records,
            iterations: ctx.cursor.iteration(),
            error: ctx.error,
            duration: started_at.elapsed(),
        }
    }

    async fn run_stage(&self, stage: Stage, ctx: &mut RunContext) -> Result<(), PipelineError> {
        match stage {
            Stage::InferSchema => self.infer_schema(ctx).await,
            Stage::GenerateSchema => self.generate_schema(ctx).await,
            Stage::InferPattern => self.infer_pattern(ctx).await,
            Stage::FeedWindow => self.feed_window(ctx),
            Stage::ExtractRecords => self.extract_records(ctx).await,
            Stage::Stream => {
                self.stream_progress(ctx);
                Ok(())
            }
            Stage::Start | Stage::End => Ok(()),
        }
    }

    async fn infer_schema(&self, ctx: &mut RunContext) -> Result<(), PipelineError> {
        let samples = self.sample(ctx)?;
        if samples.is_empty() {
            return Err(PipelineError::DataExhausted);
        }

        let inferrer = SchemaInferrer::new(Arc::clone(&self.provider), self.config.retry_policy());
        let schema = inferrer.infer(&samples).await?;
        info!(
            "Run {} inferred schema '{}' with {} field(s)",
            ctx.run_id,
            schema.name,
            schema.structure.len()
        );
        ctx.schema = Some(schema);
        Ok(())
    }

    async fn generate_schema(&self, ctx: &mut RunContext) -> Result<(), PipelineError> {
        let inferrer = SchemaInferrer::new(Arc::clone(&self.provider), self.config.retry_policy());
        let schema = inferrer.generate(&ctx.fields, ctx.query.as_deref()).await?;
        info!(
            "Run {} generated schema '{}' from {} requested field(s)",
            ctx.run_id,
            schema.name,
            ctx.fields.len()
        );
        ctx.schema = Some(schema);
        Ok(())
    }

    async fn infer_pattern(&self, ctx: &mut RunContext) -> Result<(), PipelineError> {
        let schema = ctx
            .schema
            .clone()
            .ok_or_else(|| PipelineError::Internal("pattern inference without a schema".into()))?;

        let samples = self.sample(ctx)?;
        if samples.is_empty() {
            return Err(PipelineError::DataExhausted);
        }

        let inferrer = PatternInferrer::new(Arc::clone(&self.provider), self.config.retry_policy())
            .with_validation(self.config.validate_patterns);
        let pattern = inferrer.infer(&schema, &samples).await?;
        info!("Run {} accepted split pattern '{}'", ctx.run_id, pattern);
        ctx.split_pattern = Some(pattern);
        Ok(())
    }

    fn feed_window(&self, ctx: &mut RunContext) -> Result<(), PipelineError> {
        if !ctx.cursor.is_resolved() {
            let total = if ctx.keywords.is_empty() {
                self.store
                    .count(&ctx.source_id)
                    .map_err(|e| PipelineError::Store(e.to_string()))?
            } else {
                let hits = self
                    .store
                    .search_keywords(&ctx.source_id, &ctx.keywords)
                    .map_err(|e| PipelineError::Store(e.to_string()))?;
                let total = hits.len() as u32;
                ctx.keyword_hits = Some(hits);
                total
            };

            if total == 0 {
                return Err(PipelineError::DataExhausted);
            }
            ctx.cursor.resolve(total);
            info!(
                "Run {} resolved source '{}' to {} page(s)",
                ctx.run_id, ctx.source_id, total
            );
        }

        match ctx.cursor.advance() {
            None => {
                ctx.window.clear();
            }
            Some((start, end)) => {
                let pages = self.fetch_batch(ctx, start, end)?;
                let windower = Windower::new(self.config.token_limit, self.config.min_tokens);
                ctx.window = windower.window(&pages, &WhitespaceTokenCounter);
                debug!(
                    "Run {} pages [{}, {}) gave {} chunk(s)",
                    ctx.run_id,
                    start,
                    end,
                    ctx.window.len()
                );
            }
        }
        Ok(())
    }

    fn fetch_batch(
        &self,
        ctx: &RunContext,
        start: u32,
        end: u32,
    ) -> Result<Vec<Page>, PipelineError> {
        match &ctx.keyword_hits {
            Some(hits) => {
                let batch = &hits[start as usize..end as usize];
                self.store
                    .fetch_pages(&ctx.source_id, batch)
                    .map_err(|e| PipelineError::Store(e.to_string()))
            }
            None => self
                .store
                .fetch_range(&ctx.source_id, start, end)
                .map_err(|e| PipelineError::Store(e.to_string())),
        }
    }

    async fn extract_records(&self, ctx: &mut RunContext) -> Result<(), PipelineError> {
        let schema = ctx
            .schema
            .clone()
            .ok_or_else(|| PipelineError::Internal("extraction without a schema".into()))?;
        let pattern = ctx
            .split_pattern
            .clone()
            .ok_or_else(|| PipelineError::Internal("extraction without a split pattern".into()))?;

        let mut spans = Vec::new();
        for chunk in &ctx.window {
            spans.extend(split_spans(chunk, &pattern)?);
        }

        let extractor =
            RecordExtractor::new(Arc::clone(&self.provider), self.config.retry_policy());
        let outcome = extractor.extract(&spans, &schema).await;
        ctx.records.extend(outcome.records);
        Ok(())
    }

    fn stream_progress(&self, ctx: &RunContext) {
        let payload = json!({
            "records": ctx.records_value(),
            "iteration": ctx.cursor.iteration(),
            "start_page": ctx.cursor.start_page(),
            "end_page": ctx.cursor.end_page(),
        });
        let message = format!(
            "Processed pages {} to {}",
            ctx.cursor.start_page(),
            ctx.cursor.end_page()
        );
        self.publish(ctx.run_id, RunEvent::progress(message, payload));
    }

    fn sample(&self, ctx: &RunContext) -> Result<Vec<Page>, PipelineError> {
        let mut rng = self.rng.lock().unwrap();
        Ok(sample_pages(
            self.store.as_ref(),
            &ctx.source_id,
            self.config.sample_pages,
            &ctx.keywords,
            &mut *rng,
        )?)
    }

    fn stop_requested(&self, run_id: RunId) -> bool {
        match self.flags.stop_requested(run_id) {
            Ok(stop) => stop,
            Err(e) => {
                warn!("Could not read stop flag for run {}: {}", run_id, e);
                false
            }
        }
    }

    fn publish(&self, run_id: RunId, event: RunEvent) {
        if let Err(e) = self.events.publish(run_id, event) {
            warn!("Could not publish event for run {}: {}", run_id, e);
        }
    }
}
