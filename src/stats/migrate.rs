use std::collections::{HashMap, HashSet};

use log::warn;
use serde::Serialize;

use crate::model::database::Database;
use crate::schema::TagId;

/// The runtime counters worth carrying across a rebuild.
const STAT_TAGS: [TagId; 5] = [
    TagId::PlayCount,
    TagId::Rating,
    TagId::PlayTime,
    TagId::LastPlayed,
    TagId::CommitId,
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// New entries that found their exact filename in the old database.
    pub matched: usize,
    /// New entries with no old counterpart; their counters stay zero.
    pub missed: usize,
    pub duplicate_old: usize,
    pub duplicate_new: usize,
}

/// Transplants play statistics from `old` onto matching entries of
/// `new`, keyed by device-visible filename.
///
/// Matching is exact: an entry whose filename is absent from `old`
/// keeps its default-zero counters. Duplicate filenames on either side
/// resolve to the first occurrence in iteration order; each conflict is
/// logged and counted.
pub fn migrate_stats(old: &Database, new: &mut Database) -> MigrationReport {
    let mut report = MigrationReport::default();

    let mut by_name: HashMap<&[u8], usize> = HashMap::new();
    for i in 0..old.len() {
        let Some(name) = old.tag_str(i, TagId::Filename) else {
            continue;
        };
        if by_name.contains_key(name) {
            warn!("old database repeats filename {}", String::from_utf8_lossy(name));
            report.duplicate_old += 1;
            continue;
        }
        by_name.insert(name, i);
    }

    let new_names: Vec<Option<Vec<u8>>> = (0..new.len())
        .map(|i| new.tag_str(i, TagId::Filename).map(|s| s.to_vec()))
        .collect();

    let mut seen: HashSet<&[u8]> = HashSet::new();
    for (i, name) in new_names.iter().enumerate() {
        let Some(name) = name.as_deref() else {
            report.missed += 1;
            continue;
        };
        if !seen.insert(name) {
            warn!("new database repeats filename {}", String::from_utf8_lossy(name));
            report.duplicate_new += 1;
            continue;
        }

        if let Some(&oi) = by_name.get(name) {
            copy_stats(old, oi, new, i);
            report.matched += 1;
        } else {
            report.missed += 1;
        }
    }

    report
}

fn copy_stats(old: &Database, old_idx: usize, new: &mut Database, new_idx: usize) {
    for tag in STAT_TAGS {
        let value = old.numeric(old_idx, tag).unwrap_or(0);
        new.set_numeric(new_idx, tag, value);
    }
}
