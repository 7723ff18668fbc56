//! Dictionary-relative VCDIFF (RFC 3284) decoding into a caller-owned buffer.
//!
//! Accepts the RFC format and the open-vcdiff extension format ('S' version
//! byte), which adds interleaved sections and per-window Adler-32 checksums.
//! Secondary compressors and application-defined code tables are rejected.

use std::ops::Range;

use crate::error::DecodeError;

use super::address_cache::AddressCache;
use super::code_table::{CodeTable, InstKind, default_code_table};
use super::varint::ByteReader;

pub(crate) const MAGIC: [u8; 3] = [0xd6, 0xc3, 0xc4];
pub(crate) const VERSION_RFC: u8 = 0x00;
pub(crate) const VERSION_EXTENDED: u8 = b'S';

const HDR_SECONDARY: u8 = 0x01;
const HDR_CODETABLE: u8 = 0x02;
const HDR_APPHEADER: u8 = 0x04;

pub(crate) const WIN_SOURCE: u8 = 0x01;
pub(crate) const WIN_TARGET: u8 = 0x02;
pub(crate) const WIN_CHECKSUM: u8 = 0x04;

/// Dictionary-relative delta decoding into a reusable output buffer.
///
/// Implementations write the reconstructed bytes at offset 0 of `output` and
/// return exactly that prefix. `dictionary` and `delta` are never modified;
/// the contents of `output` are unspecified after an error.
pub trait DeltaDecoder {
    fn decode<'o>(
        &self,
        dictionary: &[u8],
        delta: &[u8],
        output: &'o mut [u8],
    ) -> Result<&'o [u8], DecodeError>;
}

/// The VCDIFF decoder used for the users/lookup cache.
#[derive(Debug, Clone, Copy, Default)]
pub struct VcdiffDecoder;

impl DeltaDecoder for VcdiffDecoder {
    fn decode<'o>(
        &self,
        dictionary: &[u8],
        delta: &[u8],
        output: &'o mut [u8],
    ) -> Result<&'o [u8], DecodeError> {
        decode_delta(dictionary, delta, output)
    }
}

/// Decode `delta` against `dictionary` into `output`, returning the written prefix.
pub fn decode_delta<'o>(
    dictionary: &[u8],
    delta: &[u8],
    output: &'o mut [u8],
) -> Result<&'o [u8], DecodeError> {
    let written = decode_into(dictionary, delta, output)?;
    Ok(&output[..written])
}

fn decode_into(dictionary: &[u8], delta: &[u8], output: &mut [u8]) -> Result<usize, DecodeError> {
    let mut input = ByteReader::new(delta);
    let magic = input
        .read_slice(MAGIC.len(), "header")
        .map_err(|_| DecodeError::BadMagic)?;
    if magic != MAGIC {
        return Err(DecodeError::BadMagic);
    }

    let extended = match input.read_u8("header")? {
        VERSION_RFC => false,
        VERSION_EXTENDED => true,
        _ => {
            return Err(DecodeError::Unsupported {
                feature: "format version",
            });
        }
    };

    let indicator = input.read_u8("header indicator")?;
    if indicator & HDR_SECONDARY != 0 {
        return Err(DecodeError::Unsupported {
            feature: "secondary compression",
        });
    }
    if indicator & HDR_CODETABLE != 0 {
        return Err(DecodeError::Unsupported {
            feature: "application-defined code table",
        });
    }
    if indicator & !(HDR_SECONDARY | HDR_CODETABLE | HDR_APPHEADER) != 0 {
        return Err(DecodeError::Unsupported {
            feature: "unknown header indicator bits",
        });
    }
    if indicator & HDR_APPHEADER != 0 {
        let len = input.read_size("application header length")?;
        input.read_slice(len, "application header")?;
    }

    let mut window = WindowDecoder {
        dictionary,
        table: default_code_table(),
        cache: AddressCache::new(),
        extended,
    };
    let mut written = 0;
    while !input.is_empty() {
        written = window.decode(&mut input, output, written)?;
    }
    Ok(written)
}

#[derive(Debug, Clone)]
enum SourceSegment {
    None,
    Dictionary(Range<usize>),
    /// Bytes produced by earlier windows of the same stream.
    Output(Range<usize>),
}

impl SourceSegment {
    fn len(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Dictionary(range) | Self::Output(range) => range.len(),
        }
    }
}

/// The three sections of one window. In the interleaved layout the data and
/// address sections are empty and everything is read in order from the
/// instruction section.
struct Sections<'a> {
    inst: ByteReader<'a>,
    data: ByteReader<'a>,
    addr: ByteReader<'a>,
    interleaved: bool,
}

impl<'a> Sections<'a> {
    fn data(&mut self) -> &mut ByteReader<'a> {
        if self.interleaved {
            &mut self.inst
        } else {
            &mut self.data
        }
    }

    fn addr(&mut self) -> &mut ByteReader<'a> {
        if self.interleaved {
            &mut self.inst
        } else {
            &mut self.addr
        }
    }
}

struct WindowDecoder<'d> {
    dictionary: &'d [u8],
    table: &'static CodeTable,
    cache: AddressCache,
    extended: bool,
}

impl WindowDecoder<'_> {
    /// Decode one window that starts at `start` in `output`; returns the new end.
    fn decode(
        &mut self,
        input: &mut ByteReader<'_>,
        output: &mut [u8],
        start: usize,
    ) -> Result<usize, DecodeError> {
        let indicator = input.read_u8("window indicator")?;
        let known = WIN_SOURCE | WIN_TARGET | if self.extended { WIN_CHECKSUM } else { 0 };
        if indicator & !known != 0 {
            return Err(invalid_window(format!(
                "unknown window indicator bits {indicator:#04x}"
            )));
        }

        let source = self.read_source_segment(input, indicator, start)?;

        let delta_len = input.read_size("delta encoding length")?;
        let mut body = ByteReader::new(input.read_slice(delta_len, "delta encoding")?);
        let target_len = body.read_size("target window length")?;
        if body.read_u8("delta indicator")? != 0 {
            return Err(DecodeError::Unsupported {
                feature: "secondary compression of window sections",
            });
        }
        let data_len = body.read_size("data section length")?;
        let inst_len = body.read_size("instruction section length")?;
        let addr_len = body.read_size("address section length")?;
        let checksum = if indicator & WIN_CHECKSUM != 0 {
            let value = body.read_u64("window checksum")?;
            Some(u32::try_from(value).map_err(|_| DecodeError::VarintOverflow { bits: 32 })?)
        } else {
            None
        };
        let data = body.read_slice(data_len, "data section")?;
        let inst = body.read_slice(inst_len, "instruction section")?;
        let addr = body.read_slice(addr_len, "address section")?;
        if !body.is_empty() {
            return Err(invalid_window(format!(
                "{} bytes after the address section",
                body.remaining()
            )));
        }

        let end = start
            .checked_add(target_len)
            .filter(|end| *end <= output.len())
            .ok_or(DecodeError::OutputOverflow {
                required: start.saturating_add(target_len),
                capacity: output.len(),
            })?;

        let mut sections = Sections {
            inst: ByteReader::new(inst),
            data: ByteReader::new(data),
            addr: ByteReader::new(addr),
            interleaved: self.extended && data.is_empty() && addr.is_empty(),
        };
        self.cache.reset();
        let produced = self.run_instructions(&mut sections, &source, output, start, target_len)?;

        if produced != target_len {
            return Err(invalid_window(format!(
                "window produced {produced} of {target_len} declared bytes"
            )));
        }
        if !sections.data.is_empty() || !sections.addr.is_empty() {
            return Err(invalid_window("unconsumed data or address bytes".into()));
        }
        if let Some(expected) = checksum {
            let actual = adler32(&output[start..end]);
            if actual != expected {
                return Err(DecodeError::ChecksumMismatch { expected, actual });
            }
        }
        Ok(end)
    }

    fn read_source_segment(
        &self,
        input: &mut ByteReader<'_>,
        indicator: u8,
        start: usize,
    ) -> Result<SourceSegment, DecodeError> {
        let from_dictionary = indicator & WIN_SOURCE != 0;
        let from_target = indicator & WIN_TARGET != 0;
        if from_dictionary && from_target {
            return Err(invalid_window(
                "both VCD_SOURCE and VCD_TARGET are set".into(),
            ));
        }
        if !from_dictionary && !from_target {
            return Ok(SourceSegment::None);
        }

        let len = input.read_size("source segment length")?;
        let pos = input.read_size("source segment position")?;
        let limit = if from_dictionary {
            self.dictionary.len()
        } else {
            start
        };
        let end = pos
            .checked_add(len)
            .filter(|end| *end <= limit)
            .ok_or_else(|| {
                invalid_window(format!(
                    "source segment {pos}+{len} exceeds {limit} available bytes"
                ))
            })?;
        Ok(if from_dictionary {
            SourceSegment::Dictionary(pos..end)
        } else {
            SourceSegment::Output(pos..end)
        })
    }

    fn run_instructions(
        &mut self,
        sections: &mut Sections<'_>,
        source: &SourceSegment,
        output: &mut [u8],
        start: usize,
        target_len: usize,
    ) -> Result<usize, DecodeError> {
        let source_len = source.len();
        let mut t = 0usize;

        while !sections.inst.is_empty() {
            let opcode = sections.inst.read_u8("instruction")?;
            let (first, second) = self.table[usize::from(opcode)];
            for inst in [first, second] {
                if inst.kind == InstKind::Noop {
                    continue;
                }
                let size = if inst.size == 0 {
                    sections.inst.read_size("instruction size")?
                } else {
                    usize::from(inst.size)
                };
                if size > target_len - t {
                    return Err(DecodeError::InvalidInstruction {
                        offset: t,
                        reason: "instruction overruns the target window",
                    });
                }
                let dst = start + t;

                match inst.kind {
                    InstKind::Add => {
                        let bytes = sections.data().read_slice(size, "add data")?;
                        output[dst..dst + size].copy_from_slice(bytes);
                    }
                    InstKind::Run => {
                        let byte = sections.data().read_u8("run byte")?;
                        output[dst..dst + size].fill(byte);
                    }
                    InstKind::Copy => {
                        let here = (source_len + t) as u64;
                        let address = self.cache.decode(here, inst.mode, sections.addr())?;
                        copy(output, self.dictionary, source, address, dst, size, start, t)?;
                    }
                    InstKind::Noop => {}
                }
                t += size;
            }
        }
        Ok(t)
    }
}

/// Resolve one COPY. Addresses below the source length read the source
/// segment; the rest read this window's own output and may overlap the
/// destination, which repeats the copied bytes.
fn copy(
    output: &mut [u8],
    dictionary: &[u8],
    source: &SourceSegment,
    address: u64,
    dst: usize,
    size: usize,
    start: usize,
    t: usize,
) -> Result<(), DecodeError> {
    let address = address as usize;
    let source_len = source.len();

    if address < source_len {
        if size > source_len - address {
            return Err(DecodeError::InvalidInstruction {
                offset: t,
                reason: "copy crosses the end of the source segment",
            });
        }
        match source {
            SourceSegment::Dictionary(range) => {
                let from = range.start + address;
                output[dst..dst + size].copy_from_slice(&dictionary[from..from + size]);
            }
            SourceSegment::Output(range) => {
                let from = range.start + address;
                output.copy_within(from..from + size, dst);
            }
            SourceSegment::None => {}
        }
    } else {
        let from = start + (address - source_len);
        for i in 0..size {
            output[dst + i] = output[from + i];
        }
    }
    Ok(())
}

fn invalid_window(reason: String) -> DecodeError {
    DecodeError::InvalidWindow { reason }
}

/// Adler-32 as used by the open-vcdiff window checksum.
pub(crate) fn adler32(bytes: &[u8]) -> u32 {
    const MOD: u32 = 65_521;
    // Largest run that cannot overflow `b` before the modulo.
    const NMAX: usize = 5552;

    let (mut a, mut b) = (1u32, 0u32);
    for chunk in bytes.chunks(NMAX) {
        for &byte in chunk {
            a += u32::from(byte);
            b += a;
        }
        a %= MOD;
        b %= MOD;
    }
    (b << 16) | a
}
