//! Ordered document-name extraction strategies.

use std::sync::LazyLock;

use regex::Regex;

use super::fields::{marker_value, JOB_NAME_MARKER};

static DOCUMENT_FILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[\w\-. ()]+\.(?:pdf|docx?|xlsx?|pptx?|odt|ods|odp|rtf|txt|jpe?g|png)")
        .expect("valid document filename regex")
});

static PRINTABLE_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9_ \-.()]{5,50}").expect("valid printable run regex"));

/// Substrings that mark a printable run as protocol text, not a title.
const NON_DOCUMENT_MARKERS: &[&str] = &[
    "job-",
    "printer-",
    "document-format",
    "attributes-",
    "stdin",
    "copies",
];

/// One way of finding a raw document-name candidate in control-file text.
///
/// Candidates are normalized and quality-checked by the extractor; a
/// strategy only has to locate text.
pub trait NameStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn candidate<'a>(&self, content: &'a str) -> Option<&'a str>;
}

/// The value of the `job-name` attribute.
pub struct JobNameAttribute;

impl NameStrategy for JobNameAttribute {
    fn name(&self) -> &'static str {
        "job-name"
    }

    fn candidate<'a>(&self, content: &'a str) -> Option<&'a str> {
        marker_value(content, JOB_NAME_MARKER)
    }
}

/// A file name with a common office/image extension.
pub struct DocumentFileName;

impl NameStrategy for DocumentFileName {
    fn name(&self) -> &'static str {
        "document-filename"
    }

    fn candidate<'a>(&self, content: &'a str) -> Option<&'a str> {
        DOCUMENT_FILE_RE.find(content).map(|m| m.as_str())
    }
}

/// The first printable run long enough to be a title.
pub struct PrintableRun;

impl NameStrategy for PrintableRun {
    fn name(&self) -> &'static str {
        "printable-run"
    }

    fn candidate<'a>(&self, content: &'a str) -> Option<&'a str> {
        let run = PRINTABLE_RUN_RE.find(content)?.as_str();
        let lowered = run.to_ascii_lowercase();
        if NON_DOCUMENT_MARKERS.iter().any(|m| lowered.contains(m)) {
            return None;
        }
        Some(run)
    }
}

pub fn default_strategies() -> Vec<Box<dyn NameStrategy>> {
    vec![
        Box::new(JobNameAttribute),
        Box::new(DocumentFileName),
        Box::new(PrintableRun),
    ]
}
