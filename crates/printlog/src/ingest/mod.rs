//! One reconciliation run: log ingestion followed by the control-file sweep.

pub mod reconciler;
pub mod report;
pub mod source;

pub use reconciler::Reconciler;
pub use report::RunReport;
pub use source::LogSource;
