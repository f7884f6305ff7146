use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use chrono::Utc;
use crossbeam::channel::{bounded, unbounded};
use log::{debug, warn};

use crate::core::config::BuildOptions;
use crate::core::error::Result;
use crate::indexer::walker::{self, TrackPath};
use crate::indexer::{BuildReport, ScanFailure};
use crate::metadata::adapter::{adapt, PathRewrite, TrackRecord};
use crate::metadata::MetadataReader;
use crate::model::database::Database;
use crate::model::entry::Entry;
use crate::schema::TagId;

/// Parallel extraction pipeline: one walker, a pool of metadata workers,
/// one collector. Extraction fans out; interning stays single-threaded
/// so id assignment is deterministic and string uniqueness needs no
/// locking.
pub struct Indexer {
    pub workers: usize,
    pub queue_capacity: usize,
    pub progress: Arc<AtomicUsize>,
    pub cancel: Arc<AtomicBool>,
}

impl Indexer {
    pub fn from_options(options: &BuildOptions) -> Self {
        Indexer {
            workers: options.workers.unwrap_or_else(num_cpus::get).max(1),
            queue_capacity: options.queue_capacity.max(1),
            progress: options.progress.clone(),
            cancel: options.cancel.clone(),
        }
    }

    /// Runs the full pipeline over `music_root`.
    ///
    /// Entry order equals walk order regardless of worker completion
    /// order: the walker numbers each path and the collector slots
    /// results into a preallocated vector by that sequence number.
    pub fn build(
        &self,
        music_root: &Path,
        reader: &dyn MetadataReader,
        options: &BuildOptions,
    ) -> Result<(Database, BuildReport)> {
        let started_at = Utc::now();
        self.progress.store(0, Ordering::Relaxed);

        let rewrite = PathRewrite::new(music_root, options.device_prefix.clone());
        let genre_map = options.genre_map.as_ref().filter(|m| !m.is_empty());

        let mut failures = Vec::new();
        let tracks = walker::discover(music_root, &mut failures)?;
        let total = tracks.len();
        debug!("walked {} under {}", total, music_root.display());

        let mut slots: Vec<Option<TrackRecord>> = Vec::new();
        slots.resize_with(total, || None);

        thread::scope(|s| {
            let (work_tx, work_rx) = bounded::<(usize, TrackPath)>(self.queue_capacity);
            let (rec_tx, rec_rx) = bounded::<(usize, TrackRecord)>(self.queue_capacity);
            // Failure volume is unrelated to collection size and only
            // drained once the workers finish, so no backpressure here.
            let (err_tx, err_rx) = unbounded::<ScanFailure>();

            let cancel = self.cancel.clone();
            s.spawn(move || {
                for item in tracks.into_iter().enumerate() {
                    if cancel.load(Ordering::Relaxed) {
                        break;
                    }
                    if work_tx.send(item).is_err() {
                        break;
                    }
                }
            });

            for _ in 0..self.workers {
                let work_rx = work_rx.clone();
                let rec_tx = rec_tx.clone();
                let err_tx = err_tx.clone();
                let progress = self.progress.clone();
                let rewrite = &rewrite;
                s.spawn(move || {
                    while let Ok((seq, track)) = work_rx.recv() {
                        match reader.read(&track.host_path) {
                            Ok(raw) => {
                                let rec = adapt(&track.host_path, track.mtime, &raw, rewrite, genre_map);
                                if rec_tx.send((seq, rec)).is_err() {
                                    break;
                                }
                            }
                            Err(error) => {
                                let _ = err_tx.send(ScanFailure {
                                    path: track.host_path,
                                    error,
                                });
                            }
                        }
                        progress.fetch_add(1, Ordering::Relaxed);
                    }
                });
            }
            drop(work_rx);
            drop(rec_tx);
            drop(err_tx);

            // Collector: reorder by sequence number as results arrive.
            while let Ok((seq, rec)) = rec_rx.recv() {
                slots[seq] = Some(rec);
            }
            failures.extend(err_rx.iter());
        });

        for f in &failures {
            warn!("skipped {}: {}", f.path.display(), f.error);
        }

        // Sequential second pass over the reordered records: interning
        // here fixes first-seen order, which fixes the output bytes.
        let mut db = Database::new();
        db.serial = options.serial;
        for rec in slots.into_iter().flatten() {
            let mut entry = Entry::new();
            for tag in TagId::STRING {
                let pos = tag.index();
                entry.strings[pos] = db.intern(tag, &rec.strings[pos]);
            }
            entry.numerics = rec.numerics;
            entry.flags = rec.flags;
            db.push_entry(entry);
        }

        let report = BuildReport {
            scanned: total,
            indexed: db.len(),
            skipped: failures,
            started_at,
            finished_at: Utc::now(),
        };
        debug!("indexed {} of {} files", report.indexed, report.scanned);

        Ok((db, report))
    }
}

/// Builds a database from a directory of audio files.
///
/// `reader` is the external metadata backend; per-file read failures are
/// collected in the report, never fatal. The output is deterministic:
/// the same tree and options produce byte-identical database files.
pub fn build_database(
    music_root: &Path,
    reader: &dyn MetadataReader,
    options: &BuildOptions,
) -> Result<(Database, BuildReport)> {
    Indexer::from_options(options).build(music_root, reader, options)
}
