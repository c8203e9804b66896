use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    /// SQLite file backing the job store. Defaults to `~/.printlog/data/printlog.db`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<String>,
    pub source: SourceConfig,
    #[serde(default)]
    pub spool: SpoolConfig,
    #[serde(default)]
    pub page_refinement: PageRefinementConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

impl Config {
    /// Resolved store location, falling back to the per-user default.
    pub fn database_path(&self) -> Option<PathBuf> {
        match &self.database_path {
            Some(path) => Some(PathBuf::from(path)),
            None => crate::db::default_database_path(),
        }
    }
}

/// Where job-completion lines come from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// The spooler's page accounting log, re-read in full every run.
    PageLog { path: String },
    /// The systemd journal of the spooler unit.
    Journal {
        #[serde(default = "default_unit")]
        unit: String,
        #[serde(default = "default_since")]
        since: String,
        #[serde(default = "default_journal_timeout")]
        timeout_secs: u64,
    },
}

fn default_unit() -> String {
    "cups".to_string()
}

fn default_since() -> String {
    "24 hours ago".to_string()
}

fn default_journal_timeout() -> u64 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpoolConfig {
    #[serde(default = "default_spool_directory")]
    pub directory: String,
    #[serde(default = "default_control_prefix")]
    pub control_prefix: String,
    #[serde(default = "default_data_prefix")]
    pub data_prefix: String,
    /// Individual permission warnings emitted per run before only tallying.
    #[serde(default = "default_max_permission_warnings")]
    pub max_permission_warnings: usize,
}

fn default_spool_directory() -> String {
    "/var/spool/cups".to_string()
}

fn default_control_prefix() -> String {
    "c".to_string()
}

fn default_data_prefix() -> String {
    "d".to_string()
}

fn default_max_permission_warnings() -> usize {
    3
}

impl Default for SpoolConfig {
    fn default() -> Self {
        Self {
            directory: default_spool_directory(),
            control_prefix: default_control_prefix(),
            data_prefix: default_data_prefix(),
            max_permission_warnings: default_max_permission_warnings(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRefinementConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_file_command")]
    pub file_command: String,
    #[serde(default = "default_page_count_command")]
    pub page_count_command: String,
    /// Substrings of the file-type probe output that mark a countable file.
    #[serde(default = "default_recognized_types")]
    pub recognized_types: Vec<String>,
    #[serde(default = "default_probe_timeout")]
    pub timeout_secs: u64,
}

fn default_file_command() -> String {
    "file".to_string()
}

fn default_page_count_command() -> String {
    "pdfinfo".to_string()
}

fn default_recognized_types() -> Vec<String> {
    vec!["PDF".to_string()]
}

fn default_probe_timeout() -> u64 {
    10
}

impl PageRefinementConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for PageRefinementConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            file_command: default_file_command(),
            page_count_command: default_page_count_command(),
            recognized_types: default_recognized_types(),
            timeout_secs: default_probe_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
    #[serde(default = "default_run_timeout")]
    pub run_timeout_secs: u64,
}

fn default_interval() -> u64 {
    300
}

fn default_run_timeout() -> u64 {
    60
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            run_timeout_secs: default_run_timeout(),
        }
    }
}

impl ScheduleConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn run_timeout(&self) -> Duration {
        Duration::from_secs(self.run_timeout_secs)
    }
}
