//! Common error types for MLA

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for MLA operations
pub type Result<T> = std::result::Result<T, Error>;

/// Every way a pipeline run can abort
#[derive(Error, Debug)]
pub enum Error {
    /// One of the input CSV files does not exist
    #[error("Input file missing: {}", .0.display())]
    FileMissing(PathBuf),

    /// Header row lacks one or more required columns
    #[error("Schema mismatch in {}: missing column(s) {}", file.display(), missing.join(", "))]
    SchemaMismatch { file: PathBuf, missing: Vec<String> },

    /// A row could not be decoded into its typed record
    #[error("Invalid record in {} at line {line}: {message}", file.display())]
    InvalidRecord {
        file: PathBuf,
        line: u64,
        message: String,
    },

    /// `listen_datetime` could not be parsed
    #[error("Unparseable listen_datetime {value:?} for listening_id {listening_id}")]
    Parse { listening_id: i64, value: String },

    /// A dimension table holds the same key more than once (strict mode only)
    #[error("Duplicate key {key} in {table} table ({occurrences} occurrences)")]
    JoinCardinalityViolation {
        table: String,
        key: i64,
        occurrences: usize,
    },

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error not tied to a single record
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON report serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Malformed TOML config file
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
