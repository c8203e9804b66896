//! Turns raw spooler log lines into job records.
//!
//! Two line layouts are understood: the page accounting log and the
//! spooler's journal event stream. Both share tokenization, timestamp
//! handling and the job-header fields (printer, user, id, timestamp).

mod accounting;
mod event;
pub mod timestamp;
pub mod tokenize;

use crate::model::{JobId, JobRecord};
use crate::sanitize::excerpt;

/// Minimum token count of any job-completion line.
pub const MIN_TOKENS: usize = 6;

/// Which log layout a [`LineParser`] expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineGrammar {
    /// `printer user job_id [timestamp tz?] "document" copies pages`
    Accounting,
    /// `... cupsd[pid]: printer user job_id [timestamp tz?] total pages ...`
    EventStream,
}

#[derive(Debug, Clone, Copy)]
pub struct LineParser {
    grammar: LineGrammar,
}

impl LineParser {
    pub fn new(grammar: LineGrammar) -> Self {
        Self { grammar }
    }

    pub fn grammar(&self) -> LineGrammar {
        self.grammar
    }

    /// Parses one line. Returns `None` for short, malformed or non-job lines.
    pub fn parse(&self, line: &str) -> Option<JobRecord> {
        match self.grammar {
            LineGrammar::Accounting => accounting::parse(line),
            LineGrammar::EventStream => event::parse(line),
        }
    }
}

/// Fields common to both layouts, read from the first tokens of a line.
#[derive(Debug)]
pub(crate) struct JobHeader<'a> {
    pub printer: &'a str,
    pub user: &'a str,
    pub job_id: JobId,
    pub timestamp_token: &'a str,
    /// Index of the first token after the timestamp (and its zone, if split).
    pub next: usize,
}

/// Reads the printer/user/id/timestamp prefix shared by both layouts.
pub(crate) fn read_header<'a>(tokens: &'a [String], line: &str) -> Option<JobHeader<'a>> {
    if tokens.len() < MIN_TOKENS {
        log::debug!("Skipping short line ({} tokens)", tokens.len());
        return None;
    }

    let stamp = &tokens[3];
    if !stamp.starts_with('[') {
        log::debug!("Skipping non-job line: {}", excerpt(line));
        return None;
    }

    let has_zone = !stamp.contains(']')
        && tokens[4].starts_with(|c: char| c == '+' || c == '-');

    let printer = tokens[0].as_str();
    let user = tokens[1].as_str();
    let job_id = match JobId::new(&tokens[2]) {
        Some(id) if !printer.is_empty() && !user.is_empty() => id,
        _ => {
            log::warn!("Malformed job line, missing printer/user/id: {}", excerpt(line));
            return None;
        }
    };

    Some(JobHeader {
        printer,
        user,
        job_id,
        timestamp_token: stamp,
        next: if has_zone { 5 } else { 4 },
    })
}

/// Parses a strictly positive count.
pub(crate) fn positive(token: Option<&String>) -> Option<u32> {
    token
        .and_then(|t| t.trim().parse::<u32>().ok())
        .filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_dispatches_on_grammar() {
        let accounting = LineParser::new(LineGrammar::Accounting);
        let events = LineParser::new(LineGrammar::EventStream);
        let line = r#"PRN1 alice 7 [01/Jan/2025:10:00:00 -0300] "report.pdf" 2 5"#;

        assert!(accounting.parse(line).is_some());
        assert!(events.parse(line).is_none());
        assert_eq!(events.grammar(), LineGrammar::EventStream);
    }

    #[test]
    fn test_positive_rejects_zero_and_text() {
        assert_eq!(positive(Some(&"4".to_string())), Some(4));
        assert_eq!(positive(Some(&"0".to_string())), None);
        assert_eq!(positive(Some(&"x".to_string())), None);
        assert_eq!(positive(None), None);
    }
}
