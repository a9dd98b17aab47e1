//! Command implementations.

pub mod ingest;
pub mod run;
pub mod sources;

pub use ingest::execute_ingest;
pub use run::execute_run;
pub use sources::execute_sources;
