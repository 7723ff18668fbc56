//! Sequential pass over every cached profile blob.
//!
//! One dictionary load, one scratch buffer, one row at a time. The first
//! corrupt entry aborts the pass: the cache is an immutable offline artifact,
//! so a bad row means corruption rather than something to skip over.

use std::path::Path;

use crate::codec::{DeltaDecoder, Dictionary, RecordDecoder, ScratchBuffer, VcdiffDecoder};
use crate::constants::{DEFAULT_PROGRESS_INTERVAL, SCRATCH_BUFFER_CAPACITY};
use crate::error::Result;
use crate::types::ProfileRecord;

/// Returned by visitors to keep going or end the pass early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanControl {
    Continue,
    Stop,
}

/// Anything that can hand over cached blobs one row at a time.
pub trait BlobSource {
    /// Visit every row in storage order. An empty slice is a row with no
    /// cached record. Stops at the first error or `ScanControl::Stop`.
    fn for_each_blob(
        &mut self,
        visit: &mut dyn FnMut(&[u8]) -> Result<ScanControl>,
    ) -> Result<()>;
}

/// Adapts an iterator of byte buffers into a [`BlobSource`].
#[derive(Debug, Clone)]
pub struct IterSource<I>(pub I);

impl<I, B> BlobSource for IterSource<I>
where
    I: Iterator<Item = B>,
    B: AsRef<[u8]>,
{
    fn for_each_blob(
        &mut self,
        visit: &mut dyn FnMut(&[u8]) -> Result<ScanControl>,
    ) -> Result<()> {
        for blob in &mut self.0 {
            if visit(blob.as_ref())? == ScanControl::Stop {
                break;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub rows: u64,
    pub skipped_empty: u64,
    pub decoded: u64,
    pub stopped_early: bool,
}

/// Owns the dictionary, the record decoder and the scratch buffer for a pass.
#[derive(Debug)]
pub struct CorpusScanner<D = VcdiffDecoder> {
    dictionary: Dictionary,
    decoder: RecordDecoder<D>,
    scratch: ScratchBuffer,
    progress_interval: u64,
}

impl CorpusScanner<VcdiffDecoder> {
    /// Load the dictionary from disk; it is read exactly once per scanner.
    pub fn open(dictionary_path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Dictionary::load(dictionary_path)?))
    }

    #[must_use]
    pub fn new(dictionary: Dictionary) -> Self {
        Self::with_delta_decoder(dictionary, VcdiffDecoder)
    }
}

impl<D: DeltaDecoder> CorpusScanner<D> {
    #[must_use]
    pub fn with_delta_decoder(dictionary: Dictionary, delta: D) -> Self {
        Self {
            dictionary,
            decoder: RecordDecoder::with_delta_decoder(delta),
            scratch: ScratchBuffer::with_capacity(SCRATCH_BUFFER_CAPACITY),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    #[must_use]
    pub fn with_scratch_capacity(mut self, capacity: usize) -> Self {
        self.scratch = ScratchBuffer::with_capacity(capacity);
        self
    }

    /// Log progress every `interval` decoded records; 0 turns it off.
    #[must_use]
    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        self
    }

    #[must_use]
    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// A scanner for an independent partition: same dictionary storage, its
    /// own decoder state and scratch buffer.
    #[must_use]
    pub fn fork(&self) -> Self
    where
        D: Clone,
    {
        Self {
            dictionary: self.dictionary.clone(),
            decoder: RecordDecoder::with_delta_decoder(self.decoder.delta_decoder().clone()),
            scratch: ScratchBuffer::with_capacity(self.scratch.capacity()),
            progress_interval: self.progress_interval,
        }
    }

    /// Push form: decode every non-empty blob of `source` and hand the record
    /// to `on_record`, in source order.
    pub fn scan<S, F>(&mut self, source: &mut S, mut on_record: F) -> Result<ScanStats>
    where
        S: BlobSource + ?Sized,
        F: FnMut(ProfileRecord) -> Result<ScanControl>,
    {
        let Self {
            dictionary,
            decoder,
            scratch,
            progress_interval,
        } = self;
        let progress_interval = *progress_interval;
        let mut stats = ScanStats::default();

        source.for_each_blob(&mut |blob| {
            stats.rows += 1;
            if blob.is_empty() {
                stats.skipped_empty += 1;
                return Ok(ScanControl::Continue);
            }

            let record = decoder
                .decode(blob, dictionary.as_bytes(), scratch)
                .inspect_err(|err| {
                    tracing::error!(row = stats.rows, error = %err, "corrupt cache entry");
                })?;
            stats.decoded += 1;
            if progress_interval > 0 && stats.decoded % progress_interval == 0 {
                tracing::info!(decoded = stats.decoded, rows = stats.rows, "scan progress");
            }

            let control = on_record(record)?;
            if control == ScanControl::Stop {
                stats.stopped_early = true;
            }
            Ok(control)
        })?;

        tracing::debug!(
            rows = stats.rows,
            skipped_empty = stats.skipped_empty,
            decoded = stats.decoded,
            stopped_early = stats.stopped_early,
            "scan finished"
        );
        Ok(stats)
    }

    /// Pull form: a lazy, single-pass sequence of decoded records. Empty
    /// blobs are skipped; the first error is yielded and ends the sequence.
    pub fn records<I>(&mut self, blobs: I) -> Records<'_, I::IntoIter, D>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        Records {
            scanner: self,
            blobs: blobs.into_iter(),
            done: false,
        }
    }
}

pub struct Records<'s, I, D> {
    scanner: &'s mut CorpusScanner<D>,
    blobs: I,
    done: bool,
}

impl<I, D> Iterator for Records<'_, I, D>
where
    I: Iterator,
    I::Item: AsRef<[u8]>,
    D: DeltaDecoder,
{
    type Item = Result<ProfileRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let Some(blob) = self.blobs.next() else {
                self.done = true;
                return None;
            };
            let blob = blob.as_ref();
            if blob.is_empty() {
                continue;
            }
            let scanner = &mut *self.scanner;
            let result =
                scanner
                    .decoder
                    .decode(blob, scanner.dictionary.as_bytes(), &mut scanner.scratch);
            if result.is_err() {
                self.done = true;
            }
            return Some(result);
        }
    }
}

impl<I, D> std::iter::FusedIterator for Records<'_, I, D>
where
    I: Iterator,
    I::Item: AsRef<[u8]>,
    D: DeltaDecoder,
{
}
