pub mod config;
pub mod control;
pub mod db;
pub mod error;
pub mod ingest;
pub mod model;
pub mod parser;
pub mod process;
pub mod refine;
pub mod sanitize;
pub mod schedule;

pub use config::{load_config, Config, SourceConfig};
pub use control::{ControlFileAttributes, ControlFileExtractor, ControlFileScanner};
pub use db::{Database, DatabaseError, JobStore};
pub use error::{ConfigError, IngestError, PrintlogError, Result};
pub use ingest::{LogSource, Reconciler, RunReport};
pub use model::{JobId, JobRecord, JobStatus, PrinterRecord};
pub use parser::{LineGrammar, LineParser};
pub use refine::PageCountRefiner;
pub use schedule::{Scheduler, ShutdownHandle};
