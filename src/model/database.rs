use crate::model::entry::{Entry, StringId};
use crate::model::string_table::StringTable;
use crate::schema::{TagId, FLAG_DELETED, STRING_TAG_COUNT};

/// The parsed or freshly built database: all entries in master-index
/// order plus one interning table per string tag.
///
/// TagRefs and back-references are not held here; both are recomputed
/// from entry order at serialisation time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Database {
    pub entries: Vec<Entry>,
    tables: [StringTable; STRING_TAG_COUNT],
    pub serial: u32,
}

impl Database {
    pub fn new() -> Self {
        Database::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn table(&self, tag: TagId) -> Option<&StringTable> {
        Some(&self.tables[tag.string_pos()?])
    }

    pub fn push_entry(&mut self, entry: Entry) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    /// Interns `bytes` into `tag`'s table. Empty content is never stored;
    /// it is represented by an empty slot (the sentinel on disk).
    pub fn intern(&mut self, tag: TagId, bytes: &[u8]) -> Option<StringId> {
        let pos = tag.string_pos()?;
        if bytes.is_empty() {
            return None;
        }
        Some(self.tables[pos].intern(bytes))
    }

    /// Resolved string value of one entry's tag.
    pub fn tag_str(&self, entry: usize, tag: TagId) -> Option<&[u8]> {
        let pos = tag.string_pos()?;
        let id = self.entries.get(entry)?.strings[pos]?;
        self.tables[pos].get(id)
    }

    pub fn numeric(&self, entry: usize, tag: TagId) -> Option<u32> {
        self.entries.get(entry)?.numeric(tag)
    }

    pub fn set_numeric(&mut self, entry: usize, tag: TagId, value: u32) {
        if let Some(e) = self.entries.get_mut(entry) {
            e.set_numeric(tag, value);
        }
    }

    /// Replaces one entry's string value, interning on a miss. Empty
    /// `bytes` clears the slot.
    pub fn set_string(&mut self, entry: usize, tag: TagId, bytes: &[u8]) {
        let Some(pos) = tag.string_pos() else {
            return;
        };
        let id = if bytes.is_empty() {
            None
        } else {
            Some(self.tables[pos].intern(bytes))
        };
        if let Some(e) = self.entries.get_mut(entry) {
            e.strings[pos] = id;
        }
    }

    /// Rewrites every entry whose `tag` value equals `old` to `new`
    /// (genre canonicalisation). The old string stays in the table until
    /// the pre-serialisation prune.
    pub fn rewrite_tag(&mut self, tag: TagId, old: &[u8], new: &[u8]) {
        let Some(pos) = tag.string_pos() else {
            return;
        };
        let Some(old_id) = self.tables[pos].id_of(old) else {
            return;
        };
        let new_id = if new.is_empty() {
            None
        } else {
            Some(self.tables[pos].intern(new))
        };
        if new_id == Some(old_id) {
            return;
        }
        for e in &mut self.entries {
            if e.strings[pos] == Some(old_id) {
                e.strings[pos] = new_id;
            }
        }
    }

    /// Drops strings no entry references from one tag's table.
    pub fn prune_unreferenced(&mut self, tag: TagId) {
        let Some(pos) = tag.string_pos() else {
            return;
        };
        let mut used = vec![false; self.tables[pos].len()];
        for e in &self.entries {
            if let Some(id) = e.strings[pos] {
                used[id.0 as usize] = true;
            }
        }
        let remap = self.tables[pos].rebuild(&used);
        for e in &mut self.entries {
            if let Some(id) = e.strings[pos] {
                e.strings[pos] = remap[id.0 as usize];
            }
        }
    }

    /// Prunes every string tag. Called before serialisation so no orphan
    /// tag string is ever written.
    pub fn prune_all(&mut self) {
        for tag in TagId::STRING {
            self.prune_unreferenced(tag);
        }
    }

    pub fn mark_deleted(&mut self, entry: usize) {
        if let Some(e) = self.entries.get_mut(entry) {
            e.flags |= FLAG_DELETED;
        }
    }
}
