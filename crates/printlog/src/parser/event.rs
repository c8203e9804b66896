use crate::model::{placeholder_name, JobRecord, JobStatus};
use crate::sanitize::excerpt;

use super::timestamp::parse_timestamp;
use super::tokenize::tokenize;
use super::{positive, read_header};

const TOTAL_MARKER: &str = "total";
const JOURNAL_PREFIX: &str = "cupsd[";

// After `total`: page count, billing field, originating host, then the name.
const NAME_OFFSET: usize = 4;

pub(super) fn parse(line: &str) -> Option<JobRecord> {
    if !line.contains(TOTAL_MARKER) {
        return None;
    }

    let body = strip_journal_prefix(line);
    let tokens = tokenize(body);
    let header = read_header(&tokens, line)?;
    let total_idx = header.next;

    if tokens.get(total_idx).map(String::as_str) != Some(TOTAL_MARKER) {
        log::debug!("Skipping event without page total: {}", excerpt(line));
        return None;
    }

    let pages = match positive(tokens.get(total_idx + 1)) {
        Some(pages) => pages,
        None => {
            log::warn!("No usable page total, assuming 1: {}", excerpt(line));
            1
        }
    };

    let name = tokens
        .iter()
        .skip(total_idx + NAME_OFFSET)
        .take_while(|t| t.as_str() != "-")
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");
    let document_name = if name.trim().is_empty() {
        placeholder_name(&header.job_id)
    } else {
        name
    };

    Some(JobRecord {
        job_id: header.job_id,
        printer: header.printer.to_string(),
        user: header.user.to_string(),
        document_name,
        pages,
        copies: 1,
        status: JobStatus::Completed,
        timestamp: parse_timestamp(header.timestamp_token),
    })
}

/// Drops a `... cupsd[pid]: ` journal prefix when present.
fn strip_journal_prefix(line: &str) -> &str {
    line.find(JOURNAL_PREFIX)
        .and_then(|start| {
            let rest = &line[start..];
            rest.find("]: ").map(|end| &rest[end + 3..])
        })
        .unwrap_or(line)
}
