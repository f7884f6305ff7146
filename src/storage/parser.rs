use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use crate::binary::ByteOrder;
use crate::codec::{master, tag_file};
use crate::core::error::{Error, ErrorKind, Result};
use crate::model::database::Database;
use crate::model::entry::{Entry, StringId};
use crate::schema::{TagId, NO_REF, STRING_TAG_COUNT};
use crate::storage::layout::DbLayout;

/// Parses a database directory with the build-time byte order.
pub fn parse_database(dir: &Path) -> Result<Database> {
    parse_database_with(dir, ByteOrder::Little)
}

/// Reconstructs the in-memory model from an on-disk database.
///
/// First pass decodes the master index and every tag file; the second
/// pass joins each entry's TagRefs against the tag files, turning
/// offsets into arena indices. Any ref that does not land on a tag
/// string header fails with `BrokenRef`.
pub fn parse_database_with(dir: &Path, order: ByteOrder) -> Result<Database> {
    let layout = DbLayout::new(dir);

    let master_path = layout.master_path();
    let master_map = map_file(&master_path)?;
    let (header, raws) = master::decode(&master_map, order)
        .map_err(|e| Error::new(e.kind, format!("{}: {}", master_path.display(), e.context)))?;

    let mut db = Database::new();
    db.serial = header.serial;

    // Interning in file order keeps a parse → write cycle byte-stable.
    let mut joins: [HashMap<u32, StringId>; STRING_TAG_COUNT] = Default::default();
    for tag in TagId::STRING {
        let path = layout.tag_path(tag);
        let map = map_file(&path)?;
        let records = tag_file::decode(&map, order)
            .map_err(|e| Error::new(e.kind, format!("{}: {}", path.display(), e.context)))?;
        let join = &mut joins[tag.index()];
        for rec in records {
            if let Some(id) = db.intern(tag, &rec.bytes) {
                join.insert(rec.offset, id);
            }
        }
    }

    for (i, raw) in raws.iter().enumerate() {
        let mut entry = Entry::new();
        for (pos, &r) in raw.refs.iter().enumerate() {
            if r == NO_REF {
                continue;
            }
            let tag = TagId::STRING[pos];
            entry.strings[pos] = Some(*joins[pos].get(&r).ok_or_else(|| {
                Error::new(
                    ErrorKind::BrokenRef,
                    format!("entry {}: {} ref {:#010x} does not resolve", i, tag.name(), r),
                )
            })?);
        }
        entry.numerics = raw.numerics;
        entry.flags = raw.flags;
        db.push_entry(entry);
    }

    Ok(db)
}

fn map_file(path: &Path) -> Result<Mmap> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let map = unsafe { Mmap::map(&file) }.map_err(|e| Error::io(path, e))?;
    Ok(map)
}
