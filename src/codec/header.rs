use crate::binary::cursor::Cursor;
use crate::binary::emitter::Emitter;
use crate::core::error::{Error, ErrorKind, Result};
use crate::schema::{HEADER_SIZE, MAGIC, SCHEMA_VERSION};

/// Header shared by the master index and every tag file.
///
/// ```text
/// magic        : 4 bytes   fixed signature
/// version      : u32       = 4
/// entry_count  : u32
/// data_size    : u32       bytes after the header
/// serial       : u32       build id, 0 permitted
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub entry_count: u32,
    pub data_size: u32,
    pub serial: u32,
}

impl FileHeader {
    pub fn emit(&self, out: &mut Emitter) {
        out.put_bytes(&MAGIC);
        out.put_u32(SCHEMA_VERSION);
        out.put_u32(self.entry_count);
        out.put_u32(self.data_size);
        out.put_u32(self.serial);
    }

    pub fn parse(cur: &mut Cursor) -> Result<FileHeader> {
        cur.expect_magic(&MAGIC)?;
        let version = cur.read_u32()?;
        if version != SCHEMA_VERSION {
            return Err(Error::new(
                ErrorKind::UnsupportedVersion,
                format!("schema version {} (only {} is supported)", version, SCHEMA_VERSION),
            ));
        }
        let entry_count = cur.read_u32()?;
        let data_size = cur.read_u32()?;
        let serial = cur.read_u32()?;
        debug_assert_eq!(cur.offset(), HEADER_SIZE);
        Ok(FileHeader {
            entry_count,
            data_size,
            serial,
        })
    }
}
