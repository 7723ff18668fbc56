//! Two-stage record codec: zlib around a dictionary-relative VCDIFF delta
//! around the user JSON.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::error::{Result, TweepError};
use crate::types::ProfileRecord;

use super::encoder::VcdiffEncoder;
use super::scratch::ScratchBuffer;
use super::vcdiff::{DeltaDecoder, VcdiffDecoder};

/// Decodes cached blobs into profile records.
///
/// Holds the inflate buffer between calls so a scan allocates it once; the
/// delta output goes to the caller's [`ScratchBuffer`].
#[derive(Debug, Default)]
pub struct RecordDecoder<D = VcdiffDecoder> {
    delta: D,
    inflated: Vec<u8>,
}

impl RecordDecoder<VcdiffDecoder> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: DeltaDecoder> RecordDecoder<D> {
    #[must_use]
    pub fn with_delta_decoder(delta: D) -> Self {
        Self {
            delta,
            inflated: Vec::new(),
        }
    }

    #[must_use]
    pub fn delta_decoder(&self) -> &D {
        &self.delta
    }

    /// Inflate, delta-decode and parse one blob. Any failing stage aborts the
    /// whole decode.
    pub fn decode(
        &mut self,
        compressed: &[u8],
        dictionary: &[u8],
        scratch: &mut ScratchBuffer,
    ) -> Result<ProfileRecord> {
        self.inflated.clear();
        ZlibDecoder::new(compressed)
            .read_to_end(&mut self.inflated)
            .map_err(|source| TweepError::OuterCompression { source })?;

        let json = self
            .delta
            .decode(dictionary, &self.inflated, scratch.as_mut_slice())?;

        serde_json::from_slice(json).map_err(|source| TweepError::Parse { source })
    }
}

/// Decode a single blob with a throwaway [`RecordDecoder`].
pub fn decode_record(
    compressed: &[u8],
    dictionary: &[u8],
    scratch: &mut ScratchBuffer,
) -> Result<ProfileRecord> {
    RecordDecoder::new().decode(compressed, dictionary, scratch)
}

/// Compress a user JSON document the way the crawler stores it.
pub fn encode_record(json: &[u8], encoder: &VcdiffEncoder<'_>) -> Result<Vec<u8>> {
    let delta = encoder.encode(json);
    let mut zlib = ZlibEncoder::new(Vec::with_capacity(delta.len()), Compression::default());
    zlib.write_all(&delta)?;
    Ok(zlib.finish()?)
}
