//! Sources command implementation.

use scrivener_store::SqlitePageStore;

use crate::error::Result;
use crate::output::Formatter;

/// Execute the sources command.
pub fn execute_sources(store: &SqlitePageStore, formatter: &Formatter) -> Result<()> {
    let sources = store.list_sources()?;
    println!("{}", formatter.format_sources(&sources));
    Ok(())
}
