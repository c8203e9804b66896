use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrintlogError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Ingestion error: {0}")]
    Ingest(#[from] IngestError),

    #[error("Database error: {0}")]
    Database(#[from] crate::db::DatabaseError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },
}

/// Errors that abort a single reconciliation run.
///
/// Per-line and per-file problems never surface here; they are logged and
/// counted in the run report instead.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Accounting log not found: {0}")]
    LogNotFound(PathBuf),

    #[error("Failed to read accounting log '{path}': {source}")]
    ReadLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Journal read failed: {0}")]
    Journal(String),

    #[error("Job store failure: {0}")]
    Database(#[from] crate::db::DatabaseError),
}

pub type Result<T> = std::result::Result<T, PrintlogError>;
