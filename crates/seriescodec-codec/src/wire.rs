//! Bounds-checked little-endian reads over an encoded message.

use crate::error::{CodecError, Result};

pub(crate) struct WireReader<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub(crate) fn new(src: &'a [u8], pos: usize) -> Self {
        Self { src, pos }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.src.len().saturating_sub(self.pos)
    }

    pub(crate) fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let available = self.remaining();
        if available < n || self.pos > self.src.len() {
            return Err(CodecError::MalformedFrame {
                offset: self.pos,
                needed: n,
                available,
            });
        }
        let out = &self.src[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub(crate) fn u32(&mut self) -> Result<u32> {
        self.array().map(u32::from_le_bytes)
    }

    pub(crate) fn u64(&mut self) -> Result<u64> {
        self.array().map(u64::from_le_bytes)
    }

    pub(crate) fn i64(&mut self) -> Result<i64> {
        self.array().map(i64::from_le_bytes)
    }

    /// Read the next u32 without consuming it.
    pub(crate) fn peek_u32(&self) -> Result<u32> {
        let mut probe = WireReader::new(self.src, self.pos);
        probe.u32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian_fields() {
        let buf = [0x07, 0x01, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];
        let mut reader = WireReader::new(&buf, 1);
        assert_eq!(reader.peek_u32().unwrap(), 1);
        assert_eq!(reader.position(), 1);
        assert_eq!(reader.u32().unwrap(), 1);
        assert_eq!(reader.i64().unwrap(), -1);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn short_read_reports_position() {
        let buf = [0u8; 6];
        let mut reader = WireReader::new(&buf, 4);
        let err = reader.u64().unwrap_err();
        assert!(matches!(
            err,
            CodecError::MalformedFrame {
                offset: 4,
                needed: 8,
                available: 2
            }
        ));
    }

    #[test]
    fn offset_past_end_has_nothing_available() {
        let reader = WireReader::new(&[1, 2], 10);
        assert_eq!(reader.remaining(), 0);
        assert!(reader.peek_u32().is_err());
    }
}
