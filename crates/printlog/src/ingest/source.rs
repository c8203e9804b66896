use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use crate::config::SourceConfig;
use crate::error::IngestError;
use crate::parser::LineGrammar;
use crate::process::run_captured;

const JOURNAL_PROGRAM: &str = "journalctl";

/// Where the lines of one run come from.
#[derive(Debug, Clone, PartialEq)]
pub enum LogSource {
    /// The page accounting log, read from the start every run.
    PageLog(PathBuf),
    /// Recent journal entries of the spooler unit.
    Journal {
        program: String,
        unit: String,
        since: String,
        timeout: Duration,
    },
}

impl LogSource {
    pub fn from_config(config: &SourceConfig) -> Self {
        match config {
            SourceConfig::PageLog { path } => LogSource::PageLog(PathBuf::from(path)),
            SourceConfig::Journal {
                unit,
                since,
                timeout_secs,
            } => LogSource::Journal {
                program: JOURNAL_PROGRAM.to_string(),
                unit: unit.clone(),
                since: since.clone(),
                timeout: Duration::from_secs(*timeout_secs),
            },
        }
    }

    pub fn grammar(&self) -> LineGrammar {
        match self {
            LogSource::PageLog(_) => LineGrammar::Accounting,
            LogSource::Journal { .. } => LineGrammar::EventStream,
        }
    }

    /// How many lines pass between progress messages.
    pub fn progress_interval(&self) -> usize {
        match self {
            LogSource::PageLog(_) => 1000,
            LogSource::Journal { .. } => 100,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            LogSource::PageLog(path) => format!("page log {}", path.display()),
            LogSource::Journal { unit, since, .. } => {
                format!("journal of unit '{}' since '{}'", unit, since)
            }
        }
    }

    /// Feeds every line of the source to `visit`. Invalid UTF-8 is replaced,
    /// never rejected.
    pub fn read<F: FnMut(&str)>(&self, mut visit: F) -> Result<(), IngestError> {
        match self {
            LogSource::PageLog(path) => {
                if !path.exists() {
                    return Err(IngestError::LogNotFound(path.clone()));
                }
                let file = File::open(path).map_err(|e| IngestError::ReadLog {
                    path: path.clone(),
                    source: e,
                })?;

                let mut reader = BufReader::new(file);
                let mut buf = Vec::new();
                loop {
                    buf.clear();
                    let n = reader
                        .read_until(b'\n', &mut buf)
                        .map_err(|e| IngestError::ReadLog {
                            path: path.clone(),
                            source: e,
                        })?;
                    if n == 0 {
                        break;
                    }
                    let line = String::from_utf8_lossy(&buf);
                    visit(line.trim_end_matches(['\n', '\r']));
                }
                Ok(())
            }
            LogSource::Journal {
                program,
                unit,
                since,
                timeout,
            } => {
                let mut cmd = Command::new(program);
                cmd.args(["-u", unit, "--no-pager", "--since", since]);
                let output =
                    run_captured(cmd, *timeout).map_err(|e| IngestError::Journal(e.to_string()))?;
                output.lines().for_each(visit);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn collect(source: &LogSource) -> Result<Vec<String>, IngestError> {
        let mut lines = Vec::new();
        source.read(|l| lines.push(l.to_string()))?;
        Ok(lines)
    }

    #[test]
    fn test_page_log_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("page_log");
        std::fs::write(&path, b"first line\r\nsecond \xff line\nlast").unwrap();

        let lines = collect(&LogSource::PageLog(path)).unwrap();
        assert_eq!(lines, vec!["first line", "second \u{fffd} line", "last"]);
    }

    #[test]
    fn test_missing_page_log() {
        let temp_dir = TempDir::new().unwrap();
        let source = LogSource::PageLog(temp_dir.path().join("missing"));
        assert!(matches!(collect(&source), Err(IngestError::LogNotFound(_))));
    }

    #[test]
    fn test_from_config() {
        let source = LogSource::from_config(&SourceConfig::Journal {
            unit: "cups".to_string(),
            since: "1 hour ago".to_string(),
            timeout_secs: 60,
        });
        assert_eq!(source.grammar(), LineGrammar::EventStream);
        assert_eq!(source.progress_interval(), 100);

        let source = LogSource::from_config(&SourceConfig::PageLog {
            path: "/var/log/cups/page_log".to_string(),
        });
        assert_eq!(source.grammar(), LineGrammar::Accounting);
        assert_eq!(source.progress_interval(), 1000);
    }

    #[cfg(unix)]
    #[test]
    fn test_journal_command_output_is_read() {
        let source = LogSource::Journal {
            program: "echo".to_string(),
            unit: "cups".to_string(),
            since: "today".to_string(),
            timeout: Duration::from_secs(5),
        };
        let lines = collect(&source).unwrap();
        assert_eq!(lines, vec!["-u cups --no-pager --since today"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_journal_command() {
        let source = LogSource::Journal {
            program: "false".to_string(),
            unit: "cups".to_string(),
            since: "today".to_string(),
            timeout: Duration::from_secs(5),
        };
        assert!(matches!(collect(&source), Err(IngestError::Journal(_))));
    }
}
