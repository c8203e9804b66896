//! Domain records shared by the parsers, the store and the reconciler.

use std::fmt;

use chrono::NaiveDateTime;

/// Prefix of the synthetic document name used when no real title is known.
pub const PLACEHOLDER_PREFIX: &str = "Documento";

/// IP address stored for printers whose address has never been observed.
pub const UNKNOWN_PRINTER_IP: &str = "0.0.0.0";

/// Format used to persist job timestamps (naive local wall-clock time).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Spooler-assigned job identifier, always held in normalized form.
///
/// Numeric ids lose their leading zeros so that a control file named
/// `c00042` and an accounting-log entry for job `42` share one key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(String);

impl JobId {
    /// Builds a normalized id. Returns `None` for empty input.
    pub fn new(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if raw.bytes().all(|b| b.is_ascii_digit()) {
            let stripped = raw.trim_start_matches('0');
            let normalized = if stripped.is_empty() { "0" } else { stripped };
            return Some(Self(normalized.to_string()));
        }
        Some(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the synthetic `"Documento <job_id>"` name for a job.
pub fn placeholder_name(job_id: &JobId) -> String {
    format!("{} {}", PLACEHOLDER_PREFIX, job_id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Completed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Completed => "completed",
        }
    }
}

/// One print job as reconstructed from the logs.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    pub job_id: JobId,
    pub printer: String,
    pub user: String,
    pub document_name: String,
    pub pages: u32,
    pub copies: u32,
    pub status: JobStatus,
    pub timestamp: NaiveDateTime,
}

impl JobRecord {
    pub fn timestamp_string(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// A destination printer. Unknown fields stay `None` and never overwrite
/// previously stored values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterRecord {
    pub name: String,
    pub ip_address: Option<String>,
    pub location: Option<String>,
}

impl PrinterRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ip_address: None,
            location: None,
        }
    }
}
