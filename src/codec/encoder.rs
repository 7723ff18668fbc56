//! Greedy dictionary-relative VCDIFF encoder.
//!
//! Produces single-window RFC 3284 streams whose COPY instructions point into
//! the dictionary. Used to build caches and fixtures for the decoder; it does
//! not look for matches inside the target itself.

use std::collections::HashMap;

use super::address_cache::AddressCache;
use super::code_table::{OPCODE_ADD_EXPLICIT, add_opcode, copy_opcode};
use super::varint::write_varint;
use super::vcdiff::{MAGIC, VERSION_RFC, WIN_SOURCE};

const BLOCK: usize = 4;
const MIN_MATCH: usize = BLOCK;
/// Candidate positions remembered per 4-byte block.
const MAX_CHAIN: usize = 16;

#[derive(Debug, Clone)]
pub struct VcdiffEncoder<'d> {
    dictionary: &'d [u8],
    blocks: HashMap<[u8; BLOCK], Vec<usize>>,
}

impl<'d> VcdiffEncoder<'d> {
    #[must_use]
    pub fn new(dictionary: &'d [u8]) -> Self {
        let mut blocks: HashMap<[u8; BLOCK], Vec<usize>> = HashMap::new();
        for (pos, window) in dictionary.windows(BLOCK).enumerate() {
            let mut key = [0u8; BLOCK];
            key.copy_from_slice(window);
            let chain = blocks.entry(key).or_default();
            if chain.len() < MAX_CHAIN {
                chain.push(pos);
            }
        }
        Self { dictionary, blocks }
    }

    /// Encode `target` as a delta against the dictionary.
    #[must_use]
    pub fn encode(&self, target: &[u8]) -> Vec<u8> {
        let source_len = self.dictionary.len();
        let mut data = Vec::new();
        let mut inst = Vec::new();
        let mut addr = Vec::new();
        let mut cache = AddressCache::new();

        let mut pending_add = 0usize;
        let mut pos = 0usize;
        while pos < target.len() {
            match self.longest_match(&target[pos..]) {
                Some((address, len)) => {
                    flush_add(&mut inst, &mut data, &target[pos - pending_add..pos]);
                    pending_add = 0;

                    let here = (source_len + pos) as u64;
                    let mode = cache.encode(here, address as u64, &mut addr);
                    let (opcode, explicit) = copy_opcode(len, mode);
                    inst.push(opcode);
                    if explicit {
                        write_varint(&mut inst, len as u64);
                    }
                    pos += len;
                }
                None => {
                    pending_add += 1;
                    pos += 1;
                }
            }
        }
        flush_add(&mut inst, &mut data, &target[pos - pending_add..pos]);

        let mut body = Vec::with_capacity(data.len() + inst.len() + addr.len() + 16);
        write_varint(&mut body, target.len() as u64);
        body.push(0);
        write_varint(&mut body, data.len() as u64);
        write_varint(&mut body, inst.len() as u64);
        write_varint(&mut body, addr.len() as u64);
        body.extend_from_slice(&data);
        body.extend_from_slice(&inst);
        body.extend_from_slice(&addr);

        let mut out = Vec::with_capacity(body.len() + 16);
        out.extend_from_slice(&MAGIC);
        out.push(VERSION_RFC);
        out.push(0);
        if source_len == 0 {
            out.push(0);
        } else {
            out.push(WIN_SOURCE);
            write_varint(&mut out, source_len as u64);
            write_varint(&mut out, 0);
        }
        write_varint(&mut out, body.len() as u64);
        out.extend_from_slice(&body);
        out
    }

    fn longest_match(&self, rest: &[u8]) -> Option<(usize, usize)> {
        let key: [u8; BLOCK] = rest.get(..BLOCK)?.try_into().ok()?;
        let chain = self.blocks.get(&key)?;
        chain
            .iter()
            .map(|&start| {
                let len = self.dictionary[start..]
                    .iter()
                    .zip(rest)
                    .take_while(|(a, b)| a == b)
                    .count();
                (start, len)
            })
            .filter(|&(_, len)| len >= MIN_MATCH)
            .max_by_key(|&(start, len)| (len, std::cmp::Reverse(start)))
    }
}

fn flush_add(inst: &mut Vec<u8>, data: &mut Vec<u8>, bytes: &[u8]) {
    if bytes.is_empty() {
        return;
    }
    match add_opcode(bytes.len()) {
        Some(opcode) => inst.push(opcode),
        None => {
            inst.push(OPCODE_ADD_EXPLICIT);
            write_varint(inst, bytes.len() as u64);
        }
    }
    data.extend_from_slice(bytes);
}

/// One-shot form of [`VcdiffEncoder::encode`].
#[must_use]
pub fn encode_delta(dictionary: &[u8], target: &[u8]) -> Vec<u8> {
    VcdiffEncoder::new(dictionary).encode(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::vcdiff::decode_delta;

    const DICTIONARY: &[u8] = br#"{"id":0,"id_str":"0","name":"","screen_name":"","location":"","description":"","url":null,"followers_count":0,"friends_count":0}"#;

    fn round_trip(dictionary: &[u8], target: &[u8]) -> Vec<u8> {
        let delta = encode_delta(dictionary, target);
        let mut buf = vec![0u8; target.len() + 8];
        decode_delta(dictionary, &delta, &mut buf).unwrap().to_vec()
    }

    #[test]
    fn profile_json_uses_dictionary_copies() {
        let target = br#"{"id":12,"id_str":"12","name":"Ann","screen_name":"ann","location":"","description":"Writer #books","url":null,"followers_count":3,"friends_count":9}"#;
        let delta = encode_delta(DICTIONARY, target);
        assert!(
            delta.len() < target.len() * 3 / 4,
            "delta of {} bytes for {} byte target",
            delta.len(),
            target.len()
        );
        assert_eq!(round_trip(DICTIONARY, target), target);
    }

    #[test]
    fn empty_dictionary_and_long_literals() {
        let target: Vec<u8> = (0..300u32).map(|i| (i * 7 % 251) as u8).collect();
        assert_eq!(round_trip(&[], &target), target);
    }

    #[test]
    fn empty_target() {
        assert!(round_trip(DICTIONARY, b"").is_empty());
    }
}
