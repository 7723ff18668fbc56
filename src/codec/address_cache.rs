//! COPY address cache (RFC 3284 section 5.1) with the default sizes.

use crate::error::DecodeError;

use super::varint::ByteReader;

pub(crate) const NEAR_SIZE: usize = 4;
pub(crate) const SAME_SIZE: usize = 3;

pub(crate) const MODE_SELF: u8 = 0;
pub(crate) const MODE_HERE: u8 = 1;

const SAME_SLOTS: usize = SAME_SIZE * 256;

#[derive(Debug, Clone)]
pub(crate) struct AddressCache {
    near: [u64; NEAR_SIZE],
    next_slot: usize,
    /// Inline so a decode allocates nothing for the cache.
    same: [u64; SAME_SLOTS],
}

impl AddressCache {
    pub(crate) fn new() -> Self {
        Self {
            near: [0; NEAR_SIZE],
            next_slot: 0,
            same: [0; SAME_SLOTS],
        }
    }

    /// Every window starts from an empty cache.
    pub(crate) fn reset(&mut self) {
        self.near = [0; NEAR_SIZE];
        self.next_slot = 0;
        self.same.fill(0);
    }

    fn update(&mut self, address: u64) {
        self.near[self.next_slot] = address;
        self.next_slot = (self.next_slot + 1) % NEAR_SIZE;
        let slot = (address % SAME_SLOTS as u64) as usize;
        self.same[slot] = address;
    }

    /// Decode the address of a COPY in `mode`, where `here` is the current
    /// position in the source+target address space.
    pub(crate) fn decode(
        &mut self,
        here: u64,
        mode: u8,
        addresses: &mut ByteReader<'_>,
    ) -> Result<u64, DecodeError> {
        let mode = usize::from(mode);
        let address = if mode == usize::from(MODE_SELF) {
            addresses.read_u64("copy address")?
        } else if mode == usize::from(MODE_HERE) {
            let back = addresses.read_u64("copy address")?;
            here.checked_sub(back)
                .ok_or(DecodeError::InvalidAddress { address: back, here })?
        } else if mode < 2 + NEAR_SIZE {
            let offset = addresses.read_u64("copy address")?;
            self.near[mode - 2]
                .checked_add(offset)
                .ok_or(DecodeError::VarintOverflow { bits: 64 })?
        } else {
            let bucket = mode - (2 + NEAR_SIZE);
            let byte = addresses.read_u8("copy address")?;
            self.same[bucket * 256 + usize::from(byte)]
        };

        if address >= here {
            return Err(DecodeError::InvalidAddress { address, here });
        }
        self.update(address);
        Ok(address)
    }

    /// Pick the cheapest mode for `address` and append its encoding. Mirrors
    /// `decode`, so both sides keep the same cache state.
    pub(crate) fn encode(&mut self, here: u64, address: u64, out: &mut Vec<u8>) -> u8 {
        let mut best_mode = MODE_SELF;
        let mut best_value = address;

        let back = here - address;
        if back < best_value {
            best_mode = MODE_HERE;
            best_value = back;
        }
        for (i, near) in self.near.iter().enumerate() {
            if address >= *near && address - near < best_value {
                best_mode = (2 + i) as u8;
                best_value = address - near;
            }
        }

        let slot = (address % SAME_SLOTS as u64) as usize;
        if self.same[slot] == address {
            let mode = (2 + NEAR_SIZE + slot / 256) as u8;
            out.push((slot % 256) as u8);
            self.update(address);
            return mode;
        }

        super::varint::write_varint(out, best_value);
        self.update(address);
        best_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_then_decode_tracks_identical_state() {
        let addresses = [10u64, 12, 10, 300, 301, 10, 1000, 299];
        let mut encoder = AddressCache::new();
        let mut decoder = AddressCache::new();
        let here = 2000;

        for &address in &addresses {
            let mut buf = Vec::new();
            let mode = encoder.encode(here, address, &mut buf);
            let mut reader = ByteReader::new(&buf);
            let decoded = decoder.decode(here, mode, &mut reader).unwrap();
            assert_eq!(decoded, address, "mode {mode}");
            assert!(reader.is_empty());
        }
    }

    #[test]
    fn repeated_address_uses_same_cache() {
        let mut cache = AddressCache::new();
        let mut buf = Vec::new();
        cache.encode(5000, 4321, &mut buf);
        buf.clear();
        let mode = cache.encode(5000, 4321, &mut buf);
        assert!(usize::from(mode) >= 2 + NEAR_SIZE);
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn address_at_or_beyond_here_is_rejected() {
        let mut cache = AddressCache::new();
        let mut buf = Vec::new();
        super::super::varint::write_varint(&mut buf, 50);
        let mut reader = ByteReader::new(&buf);
        assert_eq!(
            cache.decode(50, MODE_SELF, &mut reader),
            Err(DecodeError::InvalidAddress {
                address: 50,
                here: 50
            })
        );
    }

    #[test]
    fn same_cache_is_inline_and_cleared_by_reset() {
        assert!(std::mem::size_of::<AddressCache>() >= SAME_SLOTS * 8);

        let mut cache = AddressCache::new();
        let mut buf = Vec::new();
        cache.encode(5000, 4321, &mut buf);
        let slot_byte = (4321 % SAME_SLOTS % 256) as u8;
        let bucket = 4321 % SAME_SLOTS / 256;
        let mode = (2 + NEAR_SIZE + bucket) as u8;

        let hit = [slot_byte];
        assert_eq!(
            cache.clone().decode(5000, mode, &mut ByteReader::new(&hit)),
            Ok(4321)
        );
        cache.reset();
        assert_eq!(cache.decode(5000, mode, &mut ByteReader::new(&hit)), Ok(0));
    }
}
