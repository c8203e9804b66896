//! Page-count correction from the spooled data file.
//!
//! The accounting log sometimes reports fewer pages than were printed. When
//! enabled, the data file of a job is identified with a file-type probe and
//! counted with an external page counter.

pub mod probe;

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use walkdir::WalkDir;

use crate::config::{PageRefinementConfig, SpoolConfig};
use crate::model::JobId;
use crate::process::run_captured;
use crate::sanitize::file_label;

pub struct PageCountRefiner {
    spool_directory: PathBuf,
    data_prefix: String,
    file_command: String,
    page_count_command: String,
    recognized_types: Vec<String>,
    timeout: Duration,
}

impl PageCountRefiner {
    pub fn new(spool: &SpoolConfig, config: &PageRefinementConfig) -> Self {
        Self {
            spool_directory: PathBuf::from(&spool.directory),
            data_prefix: spool.data_prefix.clone(),
            file_command: config.file_command.clone(),
            page_count_command: config.page_count_command.clone(),
            recognized_types: config.recognized_types.clone(),
            timeout: config.timeout(),
        }
    }

    /// Page count of the job's spooled document, if it can be determined.
    pub fn refine(&self, job_id: &JobId, document_name: &str) -> Option<u32> {
        let data_file = self.find_data_file(job_id)?;

        if !self.is_countable(&data_file) {
            debug!(
                "Data file {} of job {} is not a countable type",
                file_label(&data_file),
                job_id
            );
            return None;
        }

        let pages = self.count_pages(&data_file)?;
        debug!("Counted {} pages for job {} ('{}')", pages, job_id, document_name);
        Some(pages)
    }

    /// First data file, by name, belonging to the job.
    pub fn find_data_file(&self, job_id: &JobId) -> Option<PathBuf> {
        let found = WalkDir::new(&self.spool_directory)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .find(|e| {
                e.file_name()
                    .to_str()
                    .and_then(|name| probe::data_file_job_id(name, &self.data_prefix))
                    .is_some_and(|id| &id == job_id)
            })
            .map(|e| e.into_path());

        if found.is_none() {
            debug!("No data file for job {}", job_id);
        }
        found
    }

    fn is_countable(&self, path: &Path) -> bool {
        self.probe(&self.file_command, path)
            .is_some_and(|out| probe::is_recognized(&out, &self.recognized_types))
    }

    fn count_pages(&self, path: &Path) -> Option<u32> {
        let output = self.probe(&self.page_count_command, path)?;
        let pages = probe::parse_pages(&output);
        if pages.is_none() {
            debug!("No page count in output for {}", file_label(path));
        }
        pages
    }

    fn probe(&self, command_line: &str, path: &Path) -> Option<String> {
        let mut cmd = probe::command_from_line(command_line)?;
        cmd.arg(path);
        match run_captured(cmd, self.timeout) {
            Ok(output) => Some(output),
            Err(e) => {
                debug!("Probe failed on {}: {}", file_label(path), e);
                None
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Fixture {
        spool: TempDir,
        scripts: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                spool: TempDir::new().unwrap(),
                scripts: TempDir::new().unwrap(),
            }
        }

        /// Writes a shell script and returns a command line that runs it.
        fn script(&self, name: &str, body: &str) -> String {
            let path = self.scripts.path().join(name);
            std::fs::write(&path, body).unwrap();
            format!("sh {}", path.display())
        }

        fn refiner(&self, file_command: String, page_count_command: String, timeout_secs: u64) -> PageCountRefiner {
            let spool = SpoolConfig {
                directory: self.spool.path().display().to_string(),
                ..SpoolConfig::default()
            };
            let config = PageRefinementConfig {
                enabled: true,
                file_command,
                page_count_command,
                recognized_types: vec!["PDF".to_string()],
                timeout_secs,
            };
            PageCountRefiner::new(&spool, &config)
        }
    }

    fn job(id: &str) -> JobId {
        JobId::new(id).unwrap()
    }

    #[test]
    fn test_refine_counts_pdf_pages() {
        let fx = Fixture::new();
        std::fs::write(fx.spool.path().join("d00042-001"), b"%PDF-1.4").unwrap();
        let file_cmd = fx.script("file.sh", "echo \"$1: PDF document, version 1.4\"\n");
        let pages_cmd = fx.script("pdfinfo.sh", "echo 'Title: x'\necho 'Pages:          9'\n");

        let refiner = fx.refiner(file_cmd, pages_cmd, 5);
        assert_eq!(refiner.refine(&job("42"), "report.pdf"), Some(9));
    }

    #[test]
    fn test_refine_skips_unrecognized_type() {
        let fx = Fixture::new();
        std::fs::write(fx.spool.path().join("d00042-001"), b"%!PS").unwrap();
        let file_cmd = fx.script("file.sh", "echo \"$1: PostScript document\"\n");
        let pages_cmd = fx.script("pdfinfo.sh", "echo 'Pages: 9'\n");

        let refiner = fx.refiner(file_cmd, pages_cmd, 5);
        assert_eq!(refiner.refine(&job("42"), "report.ps"), None);
    }

    #[test]
    fn test_refine_without_data_file() {
        let fx = Fixture::new();
        std::fs::write(fx.spool.path().join("d00041-001"), b"%PDF").unwrap();
        let refiner = fx.refiner("true".to_string(), "true".to_string(), 5);
        assert_eq!(refiner.refine(&job("42"), "report.pdf"), None);
    }

    #[test]
    fn test_refine_failing_counter() {
        let fx = Fixture::new();
        std::fs::write(fx.spool.path().join("d00042-001"), b"%PDF").unwrap();
        let file_cmd = fx.script("file.sh", "echo PDF\n");
        let pages_cmd = fx.script("pdfinfo.sh", "echo 'Pages: 9'\nexit 1\n");

        let refiner = fx.refiner(file_cmd, pages_cmd, 5);
        assert_eq!(refiner.refine(&job("42"), "report.pdf"), None);
    }

    #[test]
    fn test_refine_timeout_yields_none() {
        let fx = Fixture::new();
        std::fs::write(fx.spool.path().join("d00042-001"), b"%PDF").unwrap();
        let file_cmd = fx.script("file.sh", "echo PDF\n");
        let pages_cmd = fx.script("pdfinfo.sh", "exec sleep 30\n");

        let refiner = fx.refiner(file_cmd, pages_cmd, 1);
        let started = std::time::Instant::now();
        assert_eq!(refiner.refine(&job("42"), "report.pdf"), None);
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_find_data_file_picks_first_by_name() {
        let fx = Fixture::new();
        std::fs::write(fx.spool.path().join("d042-002"), b"b").unwrap();
        std::fs::write(fx.spool.path().join("d00042-001"), b"a").unwrap();
        std::fs::write(fx.spool.path().join("c00042"), b"ctl").unwrap();

        let refiner = fx.refiner("true".to_string(), "true".to_string(), 5);
        let found = refiner.find_data_file(&job("42")).unwrap();
        assert_eq!(file_label(&found), "d00042-001");
    }
}
