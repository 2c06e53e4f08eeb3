//! Error types for the seqreport library.

use thiserror::Error;

/// Main error type for the library.
///
/// Every variant is scoped to a single input file: the session catches these
/// at the file boundary and records them in that file's report.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("File '{filename}' is classified as {kind} but carries no comparison group identifier")]
    MissingGroupIdentifier { filename: String, kind: String },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, IngestError>;
