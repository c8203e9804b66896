use log::info;
use serde::Serialize;

/// Counters for one reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub lines_read: usize,
    pub records_parsed: usize,
    pub lines_skipped: usize,
    pub inserted: usize,
    pub duplicates: usize,
    pub insert_failures: usize,
    pub control_dir_available: bool,
    pub control_files_scanned: usize,
    pub names_updated: usize,
    pub pages_updated: usize,
    pub permission_denied: usize,
    pub unreadable_files: usize,
}

impl RunReport {
    pub fn log_summary(&self) {
        info!(
            "Log pass: {} lines read, {} records, {} skipped, {} inserted, {} duplicates, {} failed",
            self.lines_read,
            self.records_parsed,
            self.lines_skipped,
            self.inserted,
            self.duplicates,
            self.insert_failures
        );
        if self.control_dir_available {
            info!(
                "Control pass: {} files scanned, {} names updated, {} page counts updated, {} denied, {} unreadable",
                self.control_files_scanned,
                self.names_updated,
                self.pages_updated,
                self.permission_denied,
                self.unreadable_files
            );
        } else {
            info!("Control pass skipped: spool directory unavailable");
        }
    }
}
