//! Scrivener CLI - Extract structured records from paginated text corpora.

use std::fs;

use clap::Parser;
use scrivener_cli::{commands, Cli, CliError, Command, Config, Formatter};
use scrivener_store::SqlitePageStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> scrivener_cli::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    let color_enabled = !cli.no_color;
    let formatter = Formatter::new(color_enabled);

    if let Some(parent) = config.db_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let store = SqlitePageStore::new(&config.db_path)?;

    match cli.command {
        Command::Ingest(args) => {
            let mut store = store;
            commands::execute_ingest(args, &mut store, &formatter)?;
        }
        Command::Sources => {
            commands::execute_sources(&store, &formatter)?;
        }
        Command::Run(args) => {
            match commands::execute_run(args, &config, store, &formatter, color_enabled).await {
                Err(CliError::Run(message)) => {
                    eprintln!("{}", formatter.error(&message));
                    std::process::exit(1);
                }
                other => other?,
            }
        }
    }

    Ok(())
}
