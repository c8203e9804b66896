//! Process exit codes.

use printlog::{IngestError, PrintlogError};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_STORE: u8 = 3;
pub const EXIT_SOURCE: u8 = 4;

pub fn for_error(err: &PrintlogError) -> u8 {
    match err {
        PrintlogError::Config(_) => EXIT_CONFIG,
        PrintlogError::Database(_) => EXIT_STORE,
        PrintlogError::Ingest(IngestError::Database(_)) => EXIT_STORE,
        PrintlogError::Ingest(
            IngestError::LogNotFound(_) | IngestError::ReadLog { .. } | IngestError::Journal(_),
        ) => EXIT_SOURCE,
    }
}
