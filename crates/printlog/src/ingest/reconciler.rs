use std::collections::HashSet;

use log::{debug, info, warn};

use crate::config::Config;
use crate::control::{ControlFileExtractor, ControlFileScanner};
use crate::db::{DatabaseError, JobStore};
use crate::error::IngestError;
use crate::model::{JobId, JobRecord, PrinterRecord};
use crate::parser::LineParser;
use crate::refine::PageCountRefiner;

use super::{LogSource, RunReport};

/// Drives one ingestion run against a job store.
///
/// The log pass inserts jobs the store has not seen. The control-file pass
/// then backfills document names (and, with a refiner, page counts) for any
/// stored job, new or old.
pub struct Reconciler<S: JobStore> {
    store: S,
    source: LogSource,
    parser: LineParser,
    scanner: ControlFileScanner,
    extractor: ControlFileExtractor,
    refiner: Option<PageCountRefiner>,
}

impl<S: JobStore> Reconciler<S> {
    pub fn new(
        store: S,
        source: LogSource,
        scanner: ControlFileScanner,
        extractor: ControlFileExtractor,
    ) -> Self {
        let parser = LineParser::new(source.grammar());
        Self {
            store,
            source,
            parser,
            scanner,
            extractor,
            refiner: None,
        }
    }

    pub fn from_config(store: S, config: &Config) -> Self {
        let reconciler = Self::new(
            store,
            LogSource::from_config(&config.source),
            ControlFileScanner::from_config(&config.spool),
            ControlFileExtractor::new(config.spool.control_prefix.clone()),
        );
        if config.page_refinement.enabled {
            reconciler.with_refiner(PageCountRefiner::new(&config.spool, &config.page_refinement))
        } else {
            reconciler
        }
    }

    pub fn with_refiner(mut self, refiner: PageCountRefiner) -> Self {
        self.refiner = Some(refiner);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs both passes. Only a store that cannot list its jobs or a source
    /// that cannot be read aborts the run.
    pub fn run(&self) -> Result<RunReport, IngestError> {
        let _span = tracing::info_span!("reconcile").entered();

        let mut known = self.store.list_known_job_ids()?;
        info!("{} jobs already recorded", known.len());

        let mut report = RunReport::default();
        self.stream_log(&mut known, &mut report)?;
        self.scan_control_files(&mut report);

        report.log_summary();
        Ok(report)
    }

    fn stream_log(
        &self,
        known: &mut HashSet<String>,
        report: &mut RunReport,
    ) -> Result<(), IngestError> {
        let _span = tracing::info_span!("stream_log").entered();
        info!("Reading {}", self.source.describe());

        let progress_every = self.source.progress_interval();
        self.source.read(|line| {
            report.lines_read += 1;
            if report.lines_read % progress_every == 0 {
                info!("Processed {} lines...", report.lines_read);
            }

            if line.trim().is_empty() {
                report.lines_skipped += 1;
                return;
            }

            let Some(record) = self.parser.parse(line) else {
                report.lines_skipped += 1;
                return;
            };
            report.records_parsed += 1;

            if known.contains(record.job_id.as_str()) {
                report.duplicates += 1;
                return;
            }
            self.insert_new(record, known, report);
        })
    }

    fn insert_new(&self, mut record: JobRecord, known: &mut HashSet<String>, report: &mut RunReport) {
        if let Some(pages) = self.refined_pages(&record.job_id, &record.document_name) {
            record.pages = record.pages.max(pages);
        }

        if let Err(e) = self.store.upsert_printer(&PrinterRecord::named(&record.printer)) {
            warn!("Failed to record printer '{}': {}", record.printer, e);
            report.insert_failures += 1;
            return;
        }

        match self.store.insert_job(&record) {
            Ok(true) => {
                info!(
                    "Inserted job {}: {} -> {} ({} pages)",
                    record.job_id, record.user, record.printer, record.pages
                );
                known.insert(record.job_id.to_string());
                report.inserted += 1;
            }
            Ok(false) => {
                warn!(
                    "Job {} not inserted: printer '{}' not found",
                    record.job_id, record.printer
                );
                report.insert_failures += 1;
            }
            Err(DatabaseError::DuplicateJob(id)) => {
                debug!("Job {} already stored", id);
                known.insert(id);
                report.duplicates += 1;
            }
            Err(e) => {
                warn!("Failed to insert job {}: {}", record.job_id, e);
                report.insert_failures += 1;
            }
        }
    }

    fn scan_control_files(&self, report: &mut RunReport) {
        let _span = tracing::info_span!("scan_control_files").entered();

        let files = match self.scanner.list() {
            Ok(files) => files,
            Err(e) => {
                warn!(
                    "Control file directory {} unavailable ({}); names will not be backfilled",
                    self.scanner.directory().display(),
                    e
                );
                report.control_dir_available = false;
                return;
            }
        };
        report.control_dir_available = true;

        let mut tally = self.scanner.tally();
        for path in files {
            let Some(bytes) = self.scanner.read(&path, &mut tally) else {
                continue;
            };
            report.control_files_scanned += 1;

            let attributes = self.extractor.extract(&bytes, &path);
            let Some(job_id) = attributes.job_id else {
                debug!("No job id in {}", crate::sanitize::file_label(&path));
                continue;
            };

            if let Some(name) = attributes.document_name.as_deref() {
                self.apply_name(&job_id, name, report);
            }
            if let Some(pages) =
                self.refined_pages(&job_id, attributes.document_name.as_deref().unwrap_or_default())
            {
                self.apply_pages(&job_id, pages, report);
            }
        }

        tally.summarize();
        report.permission_denied = tally.permission_denied;
        report.unreadable_files = tally.unreadable;
    }

    fn apply_name(&self, job_id: &JobId, name: &str, report: &mut RunReport) {
        match self.store.update_document_name(job_id, name) {
            Ok(true) => {
                info!("Updated name of job {} to '{}'", job_id, name);
                report.names_updated += 1;
            }
            Ok(false) => debug!("Name of job {} unchanged", job_id),
            Err(e) => warn!("Failed to update name of job {}: {}", job_id, e),
        }
    }

    fn apply_pages(&self, job_id: &JobId, pages: u32, report: &mut RunReport) {
        match self.store.update_page_count(job_id, pages) {
            Ok(true) => {
                info!("Raised page count of job {} to {}", job_id, pages);
                report.pages_updated += 1;
            }
            Ok(false) => debug!("Page count of job {} unchanged", job_id),
            Err(e) => warn!("Failed to update page count of job {}: {}", job_id, e),
        }
    }

    fn refined_pages(&self, job_id: &JobId, document_name: &str) -> Option<u32> {
        self.refiner.as_ref()?.refine(job_id, document_name)
    }
}
