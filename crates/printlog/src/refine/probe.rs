//! Output parsing for the file-type and page-count probes.

use std::process::Command;

use crate::model::JobId;

/// Builds a command from a configured command line such as `file -b`.
/// The probed path is appended by the caller.
pub fn command_from_line(line: &str) -> Option<Command> {
    let mut parts = line.split_whitespace();
    let mut cmd = Command::new(parts.next()?);
    cmd.args(parts);
    Some(cmd)
}

/// True when the file-type output names one of the countable types.
pub fn is_recognized(output: &str, recognized_types: &[String]) -> bool {
    recognized_types.iter().any(|t| output.contains(t.as_str()))
}

/// The first `Pages: <N>` line of page-counter output.
pub fn parse_pages(output: &str) -> Option<u32> {
    output.lines().find_map(|line| {
        let value = line.trim_start().strip_prefix("Pages:")?;
        value.trim().parse::<u32>().ok().filter(|n| *n > 0)
    })
}

/// Job id of a spooled data file named `d<digits>-<n>`.
pub fn data_file_job_id(file_name: &str, prefix: &str) -> Option<JobId> {
    let rest = file_name.strip_prefix(prefix)?;
    let (digits, seq) = rest.split_once('-')?;
    if digits.is_empty() || seq.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    JobId::new(digits)
}
