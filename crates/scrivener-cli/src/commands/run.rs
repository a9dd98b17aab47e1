//! Run command implementation.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use scrivener_domain::traits::CancellationStore;
use scrivener_domain::{EventKind, FieldSpec, RunId};
use scrivener_llm::OllamaProvider;
use scrivener_pipeline::{Pipeline, RunRequest, RunStatus};
use scrivener_store::{MemoryEventLog, MemoryStopFlags, SqlitePageStore};
use tokio::time::sleep;

use crate::cli::RunArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;

/// How often the event follower polls the run's stream.
const FOLLOW_INTERVAL: Duration = Duration::from_millis(200);

/// Execute the run command.
///
/// The pipeline is driven on the calling task because the SQLite store is
/// bound to a single thread; only the Ctrl-C handler and the event follower
/// run as spawned tasks.
pub async fn execute_run(
    args: RunArgs,
    config: &Config,
    store: SqlitePageStore,
    formatter: &Formatter,
    color_enabled: bool,
) -> Result<()> {
    let fields = args
        .fields
        .iter()
        .map(|field| FieldSpec::parse(field))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| CliError::InvalidInput(e.to_string()))?;

    let model = args.model.unwrap_or_else(|| config.model.clone());
    let provider = OllamaProvider::new(&config.ollama_url, model);

    let events = Arc::new(MemoryEventLog::new());
    let flags = Arc::new(MemoryStopFlags::new());
    let run_id = RunId::new();

    let mut request = RunRequest::new(args.source.clone())
        .with_keywords(args.keywords.clone())
        .with_fields(fields)
        .with_run_id(run_id);
    if let Some(query) = args.query.clone() {
        request = request.with_query(query);
    }

    // First Ctrl-C requests a cooperative stop at the next stage boundary.
    let stop_flags = Arc::clone(&flags);
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Stop requested, finishing the current stage...");
            let _ = stop_flags.set_stop(run_id, true);
        }
    });

    let follower = tokio::spawn(follow_events(Arc::clone(&events), run_id, color_enabled));

    let pipeline = Pipeline::new(
        Arc::new(store),
        Arc::new(provider),
        Arc::clone(&events),
        Arc::clone(&flags),
        config.pipeline.clone(),
    );

    let outcome = pipeline.run(request).await;

    let _ = follower.await;
    interrupt.abort();

    match args.output {
        Some(path) => {
            fs::write(&path, formatter.format_records_json(&outcome.records)?)?;
            println!(
                "{}",
                formatter.success(&format!(
                    "Wrote {} record(s) to {}",
                    outcome.records.len(),
                    path.display()
                ))
            );
        }
        None => {
            println!("{}", formatter.format_records(&outcome.records));
        }
    }

    println!(
        "{}",
        formatter.info(&format!(
            "{} record(s) from {} batch(es) in {:.1}s",
            outcome.records.len(),
            outcome.iterations,
            outcome.duration.as_secs_f64()
        ))
    );

    match outcome.status {
        RunStatus::Completed => Ok(()),
        RunStatus::Stopped => {
            println!("{}", formatter.info("Run stopped before completion"));
            Ok(())
        }
        RunStatus::Failed => Err(CliError::Run(
            outcome.error.unwrap_or_else(|| "unknown failure".to_string()),
        )),
    }
}

/// Print the run's event stream to stderr until the terminal event lands.
async fn follow_events(events: Arc<MemoryEventLog>, run_id: RunId, color_enabled: bool) {
    let formatter = Formatter::new(color_enabled);
    let mut offset = 0;

    loop {
        let (batch, next_offset) = events.read_from(run_id, offset);
        offset = next_offset;

        let mut finished = false;
        for event in &batch {
            let line = match event.kind {
                EventKind::Started | EventKind::Progress => formatter.info(&event.message),
                EventKind::Completed => formatter.success(&event.message),
                EventKind::Failed => formatter.error(&event.message),
                EventKind::Stopped => formatter.info(&event.message),
            };
            eprintln!("{}", line);
            finished |= event.is_terminal();
        }

        if finished {
            break;
        }
        sleep(FOLLOW_INTERVAL).await;
    }
}
