//! Scrivener CLI library.
//!
//! This library provides the core functionality for the scrivener command-line
//! interface: configuration management, corpus ingestion, and extraction runs
//! against a local Ollama model.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
