//! CLI command definitions and argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Scrivener CLI - Extract structured records from paginated text corpora.
#[derive(Debug, Parser)]
#[command(name = "scrivener")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database path, overriding the configured one
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load a text file into the page store as a named source
    Ingest(IngestArgs),

    /// List ingested sources and their page counts
    Sources,

    /// Run the extraction pipeline against a source
    Run(RunArgs),
}

/// Arguments for the ingest command.
#[derive(Debug, Parser)]
pub struct IngestArgs {
    /// Text file to ingest (pages split on form feeds, else blank lines)
    pub file: PathBuf,

    /// Source id to store the pages under
    #[arg(short, long)]
    pub source: String,
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Source id to extract from
    #[arg(short, long)]
    pub source: String,

    /// Restrict the run to pages matching every keyword (comma separated)
    #[arg(short, long, value_delimiter = ',')]
    pub keywords: Vec<String>,

    /// Explicit field as `name` or `name:type`; repeat for more fields.
    /// With no fields the schema is inferred from sampled pages.
    #[arg(short, long = "field")]
    pub fields: Vec<String>,

    /// Free-text context for explicit-schema generation
    #[arg(short, long)]
    pub query: Option<String>,

    /// Model name, overriding the configured one
    #[arg(short, long)]
    pub model: Option<String>,

    /// Write extracted records JSON to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_args_parse() {
        let cli = Cli::parse_from([
            "scrivener",
            "run",
            "--source",
            "docket",
            "--keywords",
            "case,smith",
            "--field",
            "case_number:string",
            "--field",
            "year",
        ]);

        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.source, "docket");
                assert_eq!(args.keywords, vec!["case", "smith"]);
                assert_eq!(args.fields, vec!["case_number:string", "year"]);
                assert!(args.query.is_none());
            }
            other => panic!("expected run command, got {:?}", other),
        }
    }

    #[test]
    fn test_ingest_args_parse() {
        let cli = Cli::parse_from(["scrivener", "ingest", "corpus.txt", "--source", "docket"]);

        match cli.command {
            Command::Ingest(args) => {
                assert_eq!(args.file, PathBuf::from("corpus.txt"));
                assert_eq!(args.source, "docket");
            }
            other => panic!("expected ingest command, got {:?}", other),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["scrivener", "--no-color", "--db", "pages.db", "sources"]);

        assert!(cli.no_color);
        assert_eq!(cli.db, Some(PathBuf::from("pages.db")));
        assert!(matches!(cli.command, Command::Sources));
    }
}
