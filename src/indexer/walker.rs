use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use walkdir::WalkDir;

use crate::core::error::{Error, ErrorKind, Result};
use crate::indexer::ScanFailure;
use crate::metadata::SUPPORTED_EXTENSIONS;

/// One discovered audio file: where it lives on the host and its
/// modification time in Unix seconds.
#[derive(Debug, Clone)]
pub struct TrackPath {
    pub host_path: PathBuf,
    pub mtime: u32,
}

fn is_audio(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.iter().any(|s| *s == e)
        })
        .unwrap_or(false)
}

/// Recursively enumerates regular audio files under `root`.
///
/// Entries are sorted by file name at every level so the walk order,
/// and with it the entry order of the finished index, is stable across
/// platforms. Unreadable files and directories are recorded in
/// `failures` and skipped.
pub fn discover(root: &Path, failures: &mut Vec<ScanFailure>) -> Result<Vec<TrackPath>> {
    if !root.is_dir() {
        return Err(Error::new(
            ErrorKind::Io,
            format!("{}: not a directory", root.display()),
        ));
    }

    let mut tracks = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                let path = err.path().unwrap_or(root).to_path_buf();
                failures.push(ScanFailure {
                    error: Error::new(ErrorKind::Io, format!("{}: {}", path.display(), err)),
                    path,
                });
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_audio(entry.path()) {
            continue;
        }
        let mtime = match entry.metadata() {
            Ok(meta) => meta
                .modified()
                .ok()
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map(|d| d.as_secs() as u32)
                .unwrap_or(0),
            Err(err) => {
                failures.push(ScanFailure {
                    path: entry.path().to_path_buf(),
                    error: Error::new(ErrorKind::Io, format!("{}: {}", entry.path().display(), err)),
                });
                continue;
            }
        };
        tracks.push(TrackPath {
            host_path: entry.path().to_path_buf(),
            mtime,
        });
    }

    Ok(tracks)
}
