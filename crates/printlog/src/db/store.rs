//! The storage seam used by the reconciler.

use std::collections::HashSet;

use crate::model::{JobId, JobRecord, PrinterRecord};

use super::{job_repo, printer_repo, Database, DatabaseError};

/// Durable keyed storage of jobs and printers.
///
/// The boolean results report whether a row was actually written, so callers
/// can tell a no-op update from a real change.
pub trait JobStore {
    /// All job ids already recorded.
    fn list_known_job_ids(&self) -> Result<HashSet<String>, DatabaseError>;

    /// Inserts or refreshes a printer keyed by name.
    fn upsert_printer(&self, printer: &PrinterRecord) -> Result<(), DatabaseError>;

    /// Inserts a job whose printer has already been upserted.
    /// Fails with `DatabaseError::DuplicateJob` if the id is taken.
    fn insert_job(&self, job: &JobRecord) -> Result<bool, DatabaseError>;

    fn update_document_name(&self, job_id: &JobId, name: &str) -> Result<bool, DatabaseError>;

    /// Raises the stored page count; never lowers it.
    fn update_page_count(&self, job_id: &JobId, pages: u32) -> Result<bool, DatabaseError>;
}

impl JobStore for Database {
    fn list_known_job_ids(&self) -> Result<HashSet<String>, DatabaseError> {
        job_repo::list_job_ids(self)
    }

    fn upsert_printer(&self, printer: &PrinterRecord) -> Result<(), DatabaseError> {
        printer_repo::upsert(self, printer)
    }

    fn insert_job(&self, job: &JobRecord) -> Result<bool, DatabaseError> {
        job_repo::insert(self, job)
    }

    fn update_document_name(&self, job_id: &JobId, name: &str) -> Result<bool, DatabaseError> {
        job_repo::update_document_name(self, job_id, name)
    }

    fn update_page_count(&self, job_id: &JobId, pages: u32) -> Result<bool, DatabaseError> {
        job_repo::update_pages(self, job_id, pages)
    }
}
