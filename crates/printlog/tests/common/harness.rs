//! Test harness for isolated reconciliation runs.
//!
//! Each harness owns a temp directory holding a page log, a spool directory
//! and a file-backed SQLite store.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use printlog::db::{job_repo, Database};
use printlog::{Config, JobId, Reconciler, RunReport};

use super::builders::ConfigBuilder;

pub struct TestHarness {
    temp_dir: TempDir,
    pub page_log: PathBuf,
    pub spool_dir: PathBuf,
    pub db_path: PathBuf,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();

        let spool_dir = base.join("spool");
        std::fs::create_dir_all(&spool_dir).expect("Failed to create spool dir");

        Self {
            page_log: base.join("page_log"),
            db_path: base.join("data").join("printlog.db"),
            spool_dir,
            temp_dir,
        }
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Replaces the page log with the given lines.
    pub fn write_log(&self, lines: &[&str]) {
        let mut content = lines.join("\n");
        content.push('\n');
        std::fs::write(&self.page_log, content).expect("Failed to write page log");
    }

    /// Appends lines to the page log.
    pub fn append_log(&self, lines: &[&str]) {
        use std::io::Write;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.page_log)
            .expect("Failed to open page log");
        for line in lines {
            writeln!(file, "{}", line).expect("Failed to append to page log");
        }
    }

    pub fn write_control_file(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.spool_dir.join(name);
        std::fs::write(&path, bytes).expect("Failed to write control file");
        path
    }

    pub fn config(&self) -> Config {
        ConfigBuilder::new()
            .database_path(&self.db_path.display().to_string())
            .page_log(&self.page_log.display().to_string())
            .spool_directory(&self.spool_dir.display().to_string())
            .build()
    }

    pub fn open_db(&self) -> Database {
        Database::open(&self.db_path).expect("Failed to open database")
    }

    /// Runs one reconciliation against a freshly opened store.
    pub fn run(&self) -> RunReport {
        self.run_with(&self.config())
    }

    pub fn run_with(&self, config: &Config) -> RunReport {
        Reconciler::from_config(self.open_db(), config)
            .run()
            .expect("Reconciliation failed")
    }

    pub fn document_name(&self, job_id: &str) -> Option<String> {
        let id = JobId::new(job_id)?;
        job_repo::find_by_job_id(&self.open_db(), &id)
            .expect("Query failed")
            .map(|row| row.document_name)
    }

    pub fn pages(&self, job_id: &str) -> Option<u32> {
        let id = JobId::new(job_id)?;
        job_repo::find_by_job_id(&self.open_db(), &id)
            .expect("Query failed")
            .map(|row| row.pages)
    }

    pub fn job_count(&self) -> u64 {
        job_repo::count(&self.open_db()).expect("Count failed")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
