//! Ingest command implementation.

use std::fs;

use scrivener_store::SqlitePageStore;

use crate::cli::IngestArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;

/// Execute the ingest command.
pub fn execute_ingest(
    args: IngestArgs,
    store: &mut SqlitePageStore,
    formatter: &Formatter,
) -> Result<()> {
    let contents = fs::read_to_string(&args.file)?;
    let pages = split_pages(&contents);

    if pages.is_empty() {
        return Err(CliError::InvalidInput(format!(
            "{} contains no text to ingest",
            args.file.display()
        )));
    }

    store.ingest_source(&args.source, &pages)?;

    println!(
        "{}",
        formatter.success(&format!(
            "Ingested {} page(s) into source '{}'",
            pages.len(),
            args.source
        ))
    );

    Ok(())
}

/// Split a text file into pages.
///
/// Form feeds mark page boundaries when present; otherwise blank lines
/// separate pages. Pages are trimmed and empty ones dropped.
pub fn split_pages(contents: &str) -> Vec<String> {
    let raw: Vec<&str> = if contents.contains('\x0c') {
        contents.split('\x0c').collect()
    } else {
        contents.split("\n\n").collect()
    };

    raw.iter()
        .map(|page| page.trim())
        .filter(|page| !page.is_empty())
        .map(str::to_string)
        .collect()
}
