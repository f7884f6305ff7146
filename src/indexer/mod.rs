pub mod pipeline;
pub mod walker;

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::core::error::Error;

/// One file the pipeline could not index. Collected on a side channel;
/// never aborts the build.
#[derive(Debug)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub error: Error,
}

/// Summary returned alongside a freshly built database.
#[derive(Debug)]
pub struct BuildReport {
    /// Files the walker enqueued.
    pub scanned: usize,
    /// Entries that made it into the database.
    pub indexed: usize,
    pub skipped: Vec<ScanFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}
