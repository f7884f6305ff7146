use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use log::debug;

use crate::binary::ByteOrder;
use crate::codec::master::{self, RawEntry};
use crate::codec::tag_file;
use crate::core::error::{Error, Result};
use crate::model::database::Database;
use crate::schema::{TagId, ENTRY_SIZE, HEADER_SIZE, NO_REF, STRING_TAG_COUNT};
use crate::storage::layout::DbLayout;

/// Writes a database directory with the build-time byte order.
pub fn write_database(db: &Database, dir: &Path) -> Result<()> {
    write_database_with(db, dir, ByteOrder::Little)
}

/// Writes the tag files first so every string's final offset is known,
/// then emits the master index with the TagRefs patched in.
///
/// `db` should have been pruned (`Database::prune_all`) after any tag
/// rewriting, so every stored string has a referring entry to carry as
/// its back-reference. The caller clears `dir` beforehand; a partially
/// written directory after an error must be treated as invalid.
pub fn write_database_with(db: &Database, dir: &Path, order: ByteOrder) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    let layout = DbLayout::new(dir);

    // Tag files: lay out each string table and remember where every
    // string landed, keyed by intern id.
    let mut offsets: [Vec<u32>; STRING_TAG_COUNT] = Default::default();
    for tag in TagId::STRING {
        let pos = tag.index();
        let Some(table) = db.table(tag) else {
            continue;
        };

        // The first entry referencing a string becomes its back-reference.
        let mut back_refs = vec![NO_REF; table.len()];
        for (i, entry) in db.entries.iter().enumerate() {
            if let Some(id) = entry.strings[pos] {
                let slot = &mut back_refs[id.0 as usize];
                if *slot == NO_REF {
                    *slot = (HEADER_SIZE + i * ENTRY_SIZE) as u32;
                }
            }
        }

        let (bytes, offs) = tag_file::encode(table.as_slices(), &back_refs, db.serial, order);
        write_file(&layout.tag_path(tag), &bytes)?;
        offsets[pos] = offs;
    }

    // Master index, with intern ids substituted by resolved offsets.
    let raws: Vec<RawEntry> = db
        .entries
        .iter()
        .map(|entry| {
            let mut refs = [NO_REF; STRING_TAG_COUNT];
            for (pos, slot) in entry.strings.iter().enumerate() {
                if let Some(id) = slot {
                    refs[pos] = offsets[pos][id.0 as usize];
                }
            }
            RawEntry {
                refs,
                numerics: entry.numerics,
                flags: entry.flags,
            }
        })
        .collect();

    write_file(&layout.master_path(), &master::encode(&raws, db.serial, order))?;
    debug!("wrote {} entries to {}", db.len(), dir.display());
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| Error::io(path, e))?;
    file.write_all(bytes).map_err(|e| Error::io(path, e))?;
    file.sync_all().map_err(|e| Error::io(path, e))?;
    Ok(())
}
