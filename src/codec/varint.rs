//! RFC 3284 integers: base-128, most significant group first, high bit set
//! on every byte but the last.

use crate::error::DecodeError;

/// Reads bytes sequentially out of one VCDIFF section.
#[derive(Debug, Clone)]
pub(crate) struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    pub(crate) fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub(crate) fn read_u8(&mut self, what: &'static str) -> Result<u8, DecodeError> {
        let byte = *self
            .bytes
            .get(self.pos)
            .ok_or(DecodeError::Truncated { what })?;
        self.pos += 1;
        Ok(byte)
    }

    pub(crate) fn read_slice(
        &mut self,
        len: usize,
        what: &'static str,
    ) -> Result<&'a [u8], DecodeError> {
        if len > self.remaining() {
            return Err(DecodeError::Truncated { what });
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub(crate) fn read_u64(&mut self, what: &'static str) -> Result<u64, DecodeError> {
        let mut value: u64 = 0;
        loop {
            let byte = self.read_u8(what)?;
            if value > (u64::MAX >> 7) {
                return Err(DecodeError::VarintOverflow { bits: 64 });
            }
            value = (value << 7) | u64::from(byte & 0x7f);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
    }

    pub(crate) fn read_u32(&mut self, what: &'static str) -> Result<u32, DecodeError> {
        u32::try_from(self.read_u64(what)?).map_err(|_| DecodeError::VarintOverflow { bits: 32 })
    }

    /// Sizes and offsets are 32-bit in the format; widen to `usize` for indexing.
    pub(crate) fn read_size(&mut self, what: &'static str) -> Result<usize, DecodeError> {
        Ok(self.read_u32(what)? as usize)
    }
}

pub(crate) fn write_varint(out: &mut Vec<u8>, mut value: u64) {
    let mut groups = [0u8; 10];
    let mut n = 0;
    loop {
        groups[n] = (value & 0x7f) as u8;
        n += 1;
        value >>= 7;
        if value == 0 {
            break;
        }
    }
    for i in (0..n).rev() {
        let continuation = if i == 0 { 0 } else { 0x80 };
        out.push(groups[i] | continuation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc_example_encodes_big_endian_groups() {
        // 123456789 from RFC 3284 section 2.
        let mut out = Vec::new();
        write_varint(&mut out, 123_456_789);
        assert_eq!(out, vec![0xba, 0xef, 0x9a, 0x15]);

        let mut reader = ByteReader::new(&out);
        assert_eq!(reader.read_u64("test").unwrap(), 123_456_789);
        assert!(reader.is_empty());
    }

    #[test]
    fn zero_is_a_single_byte() {
        let mut out = Vec::new();
        write_varint(&mut out, 0);
        assert_eq!(out, vec![0]);
    }

    #[test]
    fn unterminated_varint_is_truncated() {
        let mut reader = ByteReader::new(&[0x81, 0x80]);
        assert_eq!(
            reader.read_u64("size"),
            Err(DecodeError::Truncated { what: "size" })
        );
    }

    #[test]
    fn oversized_value_rejected_for_u32() {
        let mut out = Vec::new();
        write_varint(&mut out, u64::from(u32::MAX) + 1);
        let mut reader = ByteReader::new(&out);
        assert_eq!(
            reader.read_u32("size"),
            Err(DecodeError::VarintOverflow { bits: 32 })
        );
    }

    #[test]
    fn runaway_continuation_overflows_u64() {
        let bytes = [0xff; 12];
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(
            reader.read_u64("size"),
            Err(DecodeError::VarintOverflow { bits: 64 })
        );
    }
}
