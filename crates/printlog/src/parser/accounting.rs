use crate::model::{placeholder_name, JobRecord, JobStatus};
use crate::sanitize::excerpt;

use super::timestamp::parse_timestamp;
use super::tokenize::tokenize;
use super::{positive, read_header};

pub(super) fn parse(line: &str) -> Option<JobRecord> {
    let tokens = tokenize(line);
    let header = read_header(&tokens, line)?;
    let doc_pos = header.next;

    let document_name = match tokens.get(doc_pos).map(|t| t.trim()) {
        Some(name) if !name.is_empty() && name != "-" => name.to_string(),
        _ => placeholder_name(&header.job_id),
    };

    let copies = positive(tokens.get(doc_pos + 1)).unwrap_or(1);

    let pages = match positive(tokens.get(doc_pos + 2)).or_else(|| positive(tokens.get(doc_pos + 1))) {
        Some(pages) => pages,
        None => {
            log::warn!("No usable page count, assuming 1: {}", excerpt(line));
            1
        }
    };

    Some(JobRecord {
        job_id: header.job_id,
        printer: header.printer.to_string(),
        user: header.user.to_string(),
        document_name,
        pages,
        copies,
        status: JobStatus::Completed,
        timestamp: parse_timestamp(header.timestamp_token),
    })
}
