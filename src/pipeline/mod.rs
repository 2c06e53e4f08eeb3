//! Batch ingestion: configuration, per-file processing and the session that
//! merges everything into one dataset.

mod config;
mod runner;
mod session;

pub use config::{IngestConfig, OutputFormat};
pub use runner::{process_file, FileOutcome};
pub use session::{FileReport, FileStatus, Session};
