pub mod adapter;

use std::collections::HashMap;
use std::path::Path;

use crate::core::error::Result;

/// File extensions the walker considers audio. Matches the format list
/// the original tool accepted from its tag-reading backend.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "mp3", "ogg", "oga", "opus", "flac", "m4a", "m4b", "aac", "mp4", "alac", "ape", "wv", "mpc",
    "wma", "wav", "aiff", "aif",
];

/// Audio properties and the flat tag bag one file yields.
///
/// `length` is milliseconds, `bitrate` is kbit/s.
#[derive(Debug, Clone, Default)]
pub struct RawMetadata {
    pub tags: HashMap<String, String>,
    pub bitrate: u32,
    pub length: u32,
}

/// The seam to the external audio-metadata library. Implementations are
/// shared across worker threads, so they must be `Send + Sync`.
pub trait MetadataReader: Send + Sync {
    fn read(&self, path: &Path) -> Result<RawMetadata>;
}
