//! Job repository: inserts and targeted updates for the `print_jobs` table.

use std::collections::HashSet;

use rusqlite::{params, ErrorCode, OptionalExtension, Row};

use crate::model::{JobId, JobRecord};

use super::{Database, DatabaseError};

/// A raw job row from the database, joined with its printer name.
#[derive(Debug, Clone)]
pub struct JobRow {
    pub job_id: String,
    pub user_name: String,
    pub printer: String,
    pub document_name: String,
    pub pages: u32,
    pub copies: u32,
    pub status: String,
    pub timestamp: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl JobRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            job_id: row.get("job_id")?,
            user_name: row.get("user_name")?,
            printer: row.get("printer")?,
            document_name: row.get("document_name")?,
            pages: row.get("pages")?,
            copies: row.get("copies")?,
            status: row.get("status")?,
            timestamp: row.get("timestamp")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

/// Returns every stored job id.
pub fn list_job_ids(db: &Database) -> Result<HashSet<String>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT job_id FROM print_jobs")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<HashSet<_>, _>>()?;
        Ok(ids)
    })
}

/// Inserts a job, resolving its printer by name in the same statement.
///
/// Returns `Ok(false)` when the referenced printer does not exist (nothing is
/// inserted) and `DatabaseError::DuplicateJob` when the job id is taken.
pub fn insert(db: &Database, job: &JobRecord) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let result = conn.execute(
            "INSERT INTO print_jobs
                (job_id, user_name, printer_id, document_name, pages, copies, status, timestamp)
             SELECT ?1, ?2, p.id, ?4, ?5, ?6, ?7, ?8 FROM printers p WHERE p.name = ?3",
            params![
                job.job_id.as_str(),
                job.user,
                job.printer,
                job.document_name,
                job.pages,
                job.copies,
                job.status.as_str(),
                job.timestamp_string(),
            ],
        );

        match result {
            Ok(changed) => Ok(changed == 1),
            Err(rusqlite::Error::SqliteFailure(err, msg))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                // CHECK constraints share this code; only a taken id is a duplicate.
                if exists(conn, &job.job_id)? {
                    Err(DatabaseError::DuplicateJob(job.job_id.to_string()))
                } else {
                    Err(DatabaseError::Sqlite(rusqlite::Error::SqliteFailure(
                        err, msg,
                    )))
                }
            }
            Err(e) => Err(DatabaseError::Sqlite(e)),
        }
    })
}

fn exists(conn: &rusqlite::Connection, job_id: &JobId) -> Result<bool, DatabaseError> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM print_jobs WHERE job_id = ?1",
            params![job_id.as_str()],
            |r| r.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Sets the document name. Returns true only if the stored value changed.
pub fn update_document_name(
    db: &Database,
    job_id: &JobId,
    document_name: &str,
) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE print_jobs SET document_name = ?2, updated_at = datetime('now')
             WHERE job_id = ?1 AND document_name <> ?2",
            params![job_id.as_str(), document_name],
        )?;
        Ok(changed > 0)
    })
}

/// Raises the page count. The stored value never decreases; returns true
/// only if it grew.
pub fn update_pages(db: &Database, job_id: &JobId, pages: u32) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE print_jobs SET pages = ?2, updated_at = datetime('now')
             WHERE job_id = ?1 AND pages < ?2",
            params![job_id.as_str(), pages],
        )?;
        Ok(changed > 0)
    })
}

/// Finds a job by its normalized id.
pub fn find_by_job_id(db: &Database, job_id: &JobId) -> Result<Option<JobRow>, DatabaseError> {
    db.with_conn(|conn| {
        let row = conn
            .query_row(
                "SELECT j.*, p.name AS printer FROM print_jobs j
                 JOIN printers p ON p.id = j.printer_id
                 WHERE j.job_id = ?1",
                params![job_id.as_str()],
                JobRow::from_row,
            )
            .optional()?;
        Ok(row)
    })
}

/// Counts all stored jobs.
pub fn count(db: &Database) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row("SELECT COUNT(*) FROM print_jobs", [], |r| r.get(0))?;
        Ok(count)
    })
}
