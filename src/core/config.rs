use std::sync::atomic::{AtomicBool, AtomicUsize};
use std::sync::Arc;

use crate::metadata::adapter::GenreMap;

/// Options for a database build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Device-visible prefix the music root maps to, e.g. "/Music".
    pub device_prefix: String,
    /// Optional genre canonicalisation map applied during extraction.
    pub genre_map: Option<GenreMap>,

    pub workers: Option<usize>,                 // None = available CPU cores
    pub queue_capacity: usize,                  // Bound on each pipeline channel
    pub serial: u32,                            // Build id written to every header

    /// Set to true to stop the walker; workers drain and the collector
    /// keeps whatever already arrived.
    pub cancel: Arc<AtomicBool>,
    /// Incremented once per processed file.
    pub progress: Arc<AtomicUsize>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            device_prefix: "/Music".to_string(),
            genre_map: None,

            workers: None,                      // Will use num_cpus
            queue_capacity: 256,
            serial: 0,

            cancel: Arc::new(AtomicBool::new(false)),
            progress: Arc::new(AtomicUsize::new(0)),
        }
    }
}
