//! Builders for test inputs.

#![allow(dead_code)]

use printlog::config::schema::{
    Config, PageRefinementConfig, ScheduleConfig, SourceConfig, SpoolConfig,
};

/// Builds the bytes of an IPP-style control file, attribute by attribute.
pub struct ControlFileBuilder {
    bytes: Vec<u8>,
}

impl ControlFileBuilder {
    pub fn new() -> Self {
        // version 2.0, operation, request id
        Self {
            bytes: vec![0x02, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x01, 0x01],
        }
    }

    /// Appends one attribute with an explicit value tag.
    pub fn attribute(mut self, tag: u8, name: &str, value: &[u8]) -> Self {
        self.bytes.push(tag);
        self.bytes.extend_from_slice(&(name.len() as u16).to_be_bytes());
        self.bytes.extend_from_slice(name.as_bytes());
        self.bytes.extend_from_slice(&(value.len() as u16).to_be_bytes());
        self.bytes.extend_from_slice(value);
        self
    }

    pub fn job_name(self, name: &str) -> Self {
        self.attribute(0x42, "job-name", name.as_bytes())
    }

    pub fn user(self, user: &str) -> Self {
        self.attribute(0x42, "job-originating-user-name", user.as_bytes())
    }

    pub fn printer_uri(self, printer: &str) -> Self {
        let uri = format!("ipp://localhost:631/printers/{}", printer);
        self.attribute(0x45, "printer-uri", uri.as_bytes())
    }

    pub fn job_id(self, id: u32) -> Self {
        self.attribute(0x21, "job-id", &id.to_be_bytes())
    }

    pub fn document_format(self, format: &str) -> Self {
        self.attribute(0x49, "document-format", format.as_bytes())
    }

    pub fn build(mut self) -> Vec<u8> {
        self.bytes.push(0x03);
        self.bytes
    }
}

impl Default for ControlFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating `Config` instances.
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config {
                version: "1.0".to_string(),
                database_path: None,
                source: SourceConfig::PageLog {
                    path: "/var/log/cups/page_log".to_string(),
                },
                spool: SpoolConfig::default(),
                page_refinement: PageRefinementConfig::default(),
                schedule: ScheduleConfig::default(),
            },
        }
    }

    pub fn database_path(mut self, path: &str) -> Self {
        self.config.database_path = Some(path.to_string());
        self
    }

    pub fn page_log(mut self, path: &str) -> Self {
        self.config.source = SourceConfig::PageLog {
            path: path.to_string(),
        };
        self
    }

    pub fn spool_directory(mut self, path: &str) -> Self {
        self.config.spool.directory = path.to_string();
        self
    }

    pub fn page_refinement(mut self, refinement: PageRefinementConfig) -> Self {
        self.config.page_refinement = refinement;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
