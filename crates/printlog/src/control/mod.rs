//! Best-effort attribute recovery from spooler control files.

pub mod fields;
pub mod scan;
pub mod strategy;

use std::borrow::Cow;
use std::path::Path;

use crate::model::JobId;
use crate::sanitize::file_label;

pub use scan::{AccessTally, ControlFileScanner};
pub use strategy::{default_strategies, NameStrategy};

/// Attributes recovered from one control file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlFileAttributes {
    pub document_name: Option<String>,
    pub user: Option<String>,
    pub printer: Option<String>,
    pub job_id: Option<JobId>,
}

impl ControlFileAttributes {
    pub fn is_empty(&self) -> bool {
        self.document_name.is_none()
            && self.user.is_none()
            && self.printer.is_none()
            && self.job_id.is_none()
    }
}

/// Decodes control-file bytes as UTF-8, falling back to Latin-1.
pub fn decode(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()),
    }
}

pub struct ControlFileExtractor {
    strategies: Vec<Box<dyn NameStrategy>>,
    control_prefix: String,
}

impl Default for ControlFileExtractor {
    fn default() -> Self {
        Self::new("c")
    }
}

impl ControlFileExtractor {
    pub fn new(control_prefix: impl Into<String>) -> Self {
        Self::with_strategies(control_prefix, default_strategies())
    }

    pub fn with_strategies(
        control_prefix: impl Into<String>,
        strategies: Vec<Box<dyn NameStrategy>>,
    ) -> Self {
        Self {
            strategies,
            control_prefix: control_prefix.into(),
        }
    }

    pub fn extract(&self, bytes: &[u8], path: &Path) -> ControlFileAttributes {
        if bytes.is_empty() {
            return ControlFileAttributes::default();
        }

        let content = decode(bytes);

        let from_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| fields::file_name_job_id(n, &self.control_prefix));
        let job_id = fields::content_job_id(bytes).or(from_name);

        let attributes = ControlFileAttributes {
            document_name: self.document_name(&content),
            user: fields::marker_value(&content, fields::USER_MARKER)
                .and_then(fields::clean_identity),
            printer: fields::marker_value(&content, fields::PRINTER_SEGMENT)
                .and_then(fields::clean_identity),
            job_id,
        };

        log::debug!(
            "Extracted from {}: id={:?} name={:?}",
            file_label(path),
            attributes.job_id.as_ref().map(JobId::as_str),
            attributes.document_name
        );

        attributes
    }

    /// Runs the strategies in order; the first candidate that survives
    /// normalization wins.
    fn document_name(&self, content: &str) -> Option<String> {
        self.strategies.iter().find_map(|strategy| {
            let raw = strategy.candidate(content)?;
            let name = fields::normalize_name(raw);
            if name.is_none() {
                log::debug!("Strategy {} produced no usable name", strategy.name());
            }
            name
        })
    }
}
