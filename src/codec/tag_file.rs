use crate::binary::cursor::Cursor;
use crate::binary::emitter::{padded_len, Emitter};
use crate::binary::ByteOrder;
use crate::codec::header::FileHeader;
use crate::core::error::{Error, ErrorKind, Result};
use crate::schema::{ALIGN, HEADER_SIZE};

/// One decoded tag string: its offset within the file, its content with
/// NUL terminator and padding stripped, and the master-index offset of
/// an entry that references it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagStringRecord {
    pub offset: u32,
    pub bytes: Vec<u8>,
    pub back_ref: u32,
}

/// Serialises one tag file: header, then each string back-to-back as
///
/// ```text
/// byte_length          : u32   content + NUL + padding
/// index_file_position  : u32   back-reference into the master index
/// bytes                : byte_length bytes, NUL-terminated, NUL-padded
/// ```
///
/// `back_refs[i]` is the back-reference for string `i`. Returns the file
/// bytes and the offset each string landed at, indexed by intern id.
pub fn encode(strings: &[Vec<u8>], back_refs: &[u32], serial: u32, order: ByteOrder) -> (Vec<u8>, Vec<u32>) {
    let data_size: usize = strings.iter().map(|s| 8 + padded_len(s.len(), ALIGN)).sum();

    let mut out = Emitter::new(order);
    FileHeader {
        entry_count: strings.len() as u32,
        data_size: data_size as u32,
        serial,
    }
    .emit(&mut out);

    let mut offsets = Vec::with_capacity(strings.len());
    for (s, &back_ref) in strings.iter().zip(back_refs) {
        offsets.push(out.offset() as u32);
        out.put_u32(padded_len(s.len(), ALIGN) as u32);
        out.put_u32(back_ref);
        out.put_padded_bytes(s, ALIGN);
    }

    (out.into_bytes(), offsets)
}

/// Parses a tag file, walking forward one string at a time until the
/// recorded entry count is consumed. Content is returned byte-exact up
/// to the first NUL; no semantic interpretation is attempted (comment
/// payloads in particular are historically odd and must survive intact).
pub fn decode(data: &[u8], order: ByteOrder) -> Result<Vec<TagStringRecord>> {
    let mut cur = Cursor::new(data, order);
    let header = FileHeader::parse(&mut cur)?;

    let mut records = Vec::with_capacity(header.entry_count as usize);
    for _ in 0..header.entry_count {
        let offset = cur.offset() as u32;
        let byte_length = cur.read_u32()? as usize;
        let back_ref = cur.read_u32()?;
        if byte_length == 0 || byte_length % ALIGN != 0 {
            return Err(Error::new(
                ErrorKind::Truncated,
                format!("tag string at offset {} has invalid length {}", offset, byte_length),
            ));
        }
        let raw = cur.read_bytes(byte_length)?;
        let content_len = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        records.push(TagStringRecord {
            offset,
            bytes: raw[..content_len].to_vec(),
            back_ref,
        });
    }

    let consumed = cur.offset() - HEADER_SIZE;
    if consumed != header.data_size as usize {
        return Err(Error::new(
            ErrorKind::Truncated,
            format!("tag file data_size is {} but body holds {} bytes", header.data_size, consumed),
        ));
    }

    Ok(records)
}
