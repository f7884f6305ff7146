use crate::binary::ByteOrder;
use crate::core::error::{Error, ErrorKind, Result};

/// Bounds-checked reader over an in-memory byte buffer.
pub struct Cursor<'a> {
    pub data: &'a [u8],
    pub pos: usize,
    pub order: ByteOrder,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8], order: ByteOrder) -> Self {
        Cursor { data, pos: 0, order }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn offset(&self) -> usize {
        self.pos
    }

    fn take(&mut self, n: usize, what: &str) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(Error::new(
                ErrorKind::Truncated,
                format!("{} at offset {} (need {}, have {})", what, self.pos, n, self.remaining()),
            ));
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1, "u8")?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let b = self.take(2, "u16")?;
        Ok(self.order.u16_from([b[0], b[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let b = self.take(4, "u32")?;
        Ok(self.order.u32_from([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let b = self.take(8, "u64")?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(b);
        Ok(self.order.u64_from(buf))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(self.read_u64()? as i64)
    }

    /// Reads exactly `n` raw bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n, "bytes")
    }

    /// Consumes a 4-byte signature, failing with `BadMagic` on mismatch.
    pub fn expect_magic(&mut self, magic: &[u8; 4]) -> Result<()> {
        let found = self.take(4, "magic")?;
        if found != magic {
            return Err(Error::new(
                ErrorKind::BadMagic,
                format!("expected {:02x?}, found {:02x?}", magic, found),
            ));
        }
        Ok(())
    }
}
