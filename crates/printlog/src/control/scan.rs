use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::SpoolConfig;
use crate::sanitize::file_label;

/// Counts control files that could not be read during one sweep.
#[derive(Debug, Default)]
pub struct AccessTally {
    max_warnings: usize,
    pub permission_denied: usize,
    pub unreadable: usize,
    /// Permission warnings logged one by one so far.
    pub warned: usize,
}

impl AccessTally {
    pub fn new(max_warnings: usize) -> Self {
        Self {
            max_warnings,
            ..Self::default()
        }
    }

    fn record_denied(&mut self, path: &Path) {
        self.permission_denied += 1;
        if self.warned < self.max_warnings {
            self.warned += 1;
            warn!("Permission denied reading control file {}", file_label(path));
        }
    }

    fn record_unreadable(&mut self, path: &Path, err: &std::io::Error) {
        self.unreadable += 1;
        warn!("Failed to read control file {}: {}", file_label(path), err);
    }

    /// Logs and returns the one-line summary for the sweep, if anything was
    /// denied.
    pub fn summarize(&self) -> Option<String> {
        if self.permission_denied == 0 {
            return None;
        }
        let summary = if self.permission_denied > self.warned {
            format!(
                "Permission denied on {} control files ({} shown)",
                self.permission_denied, self.warned
            )
        } else {
            format!("Permission denied on {} control files", self.permission_denied)
        };
        warn!("{}", summary);
        Some(summary)
    }
}

/// Lists and reads the control files of the spool directory.
pub struct ControlFileScanner {
    directory: PathBuf,
    prefix: String,
    max_permission_warnings: usize,
}

impl ControlFileScanner {
    pub fn new<P: AsRef<Path>>(directory: P, prefix: impl Into<String>) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            prefix: prefix.into(),
            max_permission_warnings: 3,
        }
    }

    pub fn from_config(config: &SpoolConfig) -> Self {
        Self::new(&config.directory, config.control_prefix.clone())
            .with_max_permission_warnings(config.max_permission_warnings)
    }

    pub fn with_max_permission_warnings(mut self, max: usize) -> Self {
        self.max_permission_warnings = max;
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn tally(&self) -> AccessTally {
        AccessTally::new(self.max_permission_warnings)
    }

    /// Top-level non-directory entries starting with the control prefix,
    /// sorted by name. Symlinks are listed so a broken one is tallied on read.
    /// Fails when the directory itself is missing or unreadable.
    pub fn list(&self) -> std::io::Result<Vec<PathBuf>> {
        std::fs::read_dir(&self.directory)?;

        let files: Vec<PathBuf> = WalkDir::new(&self.directory)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| !e.file_type().is_dir())
            .filter(|e| e.file_name().to_string_lossy().starts_with(&self.prefix))
            .map(|e| e.into_path())
            .collect();

        info!(
            "Found {} control files in {}",
            files.len(),
            self.directory.display()
        );
        Ok(files)
    }

    /// Reads one control file, tallying failures instead of returning them.
    pub fn read(&self, path: &Path, tally: &mut AccessTally) -> Option<Vec<u8>> {
        match std::fs::read(path) {
            Ok(bytes) => {
                debug!("Read {} bytes from {}", bytes.len(), file_label(path));
                Some(bytes)
            }
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                tally.record_denied(path);
                None
            }
            Err(e) => {
                tally.record_unreadable(path, &e);
                None
            }
        }
    }
}
