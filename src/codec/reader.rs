// License: MIT

use crate::error::PmtError;

/// Bounds-checked cursor over an encoded buffer.
pub(crate) struct Reader<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Fail with `Truncated` unless `len` more bytes are available.
    pub(crate) fn ensure(&self, len: usize) -> Result<(), PmtError> {
        if len > self.remaining() {
            return Err(PmtError::truncated(self.pos, len, self.remaining()));
        }
        Ok(())
    }

    pub(crate) fn read_byte(&mut self) -> Result<u8, PmtError> {
        self.ensure(1)?;
        let byte = self.input[self.pos];
        self.pos += 1;
        Ok(byte)
    }

    pub(crate) fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], PmtError> {
        self.ensure(len)?;
        let bytes = &self.input[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    pub(crate) fn read_array<const N: usize>(&mut self) -> Result<[u8; N], PmtError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Unsigned LEB128.
    pub(crate) fn read_varint(&mut self) -> Result<u64, PmtError> {
        let start = self.pos;
        let mut result: u64 = 0;
        let mut shift: u32 = 0;

        loop {
            let byte = self.read_byte()?;
            let data = (byte & 0x7F) as u64;

            if shift >= 64 || (shift == 63 && data > 1) {
                return Err(PmtError::malformed("varint overflow", start));
            }

            result |= data << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
            shift += 7;
        }
    }

    /// A varint length that must fit in `usize`.
    pub(crate) fn read_len(&mut self) -> Result<usize, PmtError> {
        let start = self.pos;
        let len = self.read_varint()?;
        usize::try_from(len)
            .map_err(|_| PmtError::limit_exceeded(format!("length {} does not fit in memory", len), start))
    }
}
