use crate::binary::cursor::Cursor;
use crate::binary::emitter::Emitter;
use crate::binary::ByteOrder;
use crate::codec::header::FileHeader;
use crate::core::error::{Error, ErrorKind, Result};
use crate::schema::{ENTRY_SIZE, NUMERIC_TAG_COUNT, STRING_TAG_COUNT};

/// An entry as it sits on the wire: TagRefs still unresolved offsets.
/// A second pass joins them against the parsed tag files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEntry {
    pub refs: [u32; STRING_TAG_COUNT],
    pub numerics: [u32; NUMERIC_TAG_COUNT],
    pub flags: u32,
}

/// Serialises the master index: header, then every entry in canonical
/// field order. TagRefs must already be patched to final tag-file
/// offsets, which is why tag files are laid out first.
pub fn encode(entries: &[RawEntry], serial: u32, order: ByteOrder) -> Vec<u8> {
    let mut out = Emitter::new(order);
    FileHeader {
        entry_count: entries.len() as u32,
        data_size: (entries.len() * ENTRY_SIZE) as u32,
        serial,
    }
    .emit(&mut out);

    for e in entries {
        for r in e.refs {
            out.put_u32(r);
        }
        for n in e.numerics {
            out.put_u32(n);
        }
        out.put_u32(e.flags);
    }

    out.into_bytes()
}

pub fn decode(data: &[u8], order: ByteOrder) -> Result<(FileHeader, Vec<RawEntry>)> {
    let mut cur = Cursor::new(data, order);
    let header = FileHeader::parse(&mut cur)?;

    if header.data_size as usize != header.entry_count as usize * ENTRY_SIZE {
        return Err(Error::new(
            ErrorKind::Truncated,
            format!(
                "master data_size is {} but {} entries need {}",
                header.data_size,
                header.entry_count,
                header.entry_count as usize * ENTRY_SIZE
            ),
        ));
    }

    let mut entries = Vec::with_capacity(header.entry_count as usize);
    for _ in 0..header.entry_count {
        let mut refs = [0u32; STRING_TAG_COUNT];
        for r in refs.iter_mut() {
            *r = cur.read_u32()?;
        }
        let mut numerics = [0u32; NUMERIC_TAG_COUNT];
        for n in numerics.iter_mut() {
            *n = cur.read_u32()?;
        }
        let flags = cur.read_u32()?;
        entries.push(RawEntry { refs, numerics, flags });
    }

    Ok((header, entries))
}
