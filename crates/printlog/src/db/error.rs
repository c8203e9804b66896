//! Job store errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The directory holding the store file could not be created.
    #[error("Cannot create store directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Schema migration v{version} ({description}) failed: {reason}")]
    Migration {
        version: u32,
        description: &'static str,
        reason: String,
    },

    /// A table name that cannot be interpolated into a PRAGMA.
    #[error("Invalid table name: {0}")]
    InvalidIdentifier(String),

    #[error("Job store lock poisoned")]
    LockPoisoned,

    /// The job id is already recorded. Counted as a duplicate, not a failure.
    #[error("Job '{0}' already exists")]
    DuplicateJob(String),
}
