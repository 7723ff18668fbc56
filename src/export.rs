//! CSV export of cohort members' bios.
//!
//! Each output row is `id,first,second,bio` where the two flags are `0`/`1`
//! and the bio column is always double-quoted. Profiles following neither
//! account produce no row; an empty bio still produces one.

use std::io::Write;

use crate::cache::SqliteCache;
use crate::codec::DeltaDecoder;
use crate::cohort::{Cohort, CohortPair, Membership};
use crate::error::Result;
use crate::scan::{BlobSource, CorpusScanner, ScanControl, ScanStats};
use crate::text::Tokenizer;
use crate::types::{ExportOptions, ProfileRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionRow {
    pub id: i64,
    pub membership: Membership,
    pub bio: String,
}

impl DescriptionRow {
    /// Join a decoded record against the cohorts; `None` filters it out.
    #[must_use]
    pub fn from_record(
        record: ProfileRecord,
        cohorts: &CohortPair,
        tokenizer: Option<&Tokenizer>,
    ) -> Option<Self> {
        let membership = cohorts.membership(record.id)?;
        let bio = match tokenizer {
            Some(tokenizer) => tokenizer.tokenize(&record.description),
            None => record.description,
        };
        Some(Self {
            id: record.id,
            membership,
            bio,
        })
    }
}

fn flag(member: bool) -> &'static str {
    if member { "1" } else { "0" }
}

#[derive(Debug)]
pub struct CsvRowWriter<W: Write> {
    out: W,
}

impl<W: Write> CsvRowWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn write_row(&mut self, row: &DescriptionRow) -> std::io::Result<()> {
        write!(
            self.out,
            "{},{},{},\"",
            row.id,
            flag(row.membership.first),
            flag(row.membership.second)
        )?;
        let mut pieces = row.bio.split('"');
        if let Some(first) = pieces.next() {
            self.out.write_all(first.as_bytes())?;
        }
        for piece in pieces {
            self.out.write_all(b"\"\"")?;
            self.out.write_all(piece.as_bytes())?;
        }
        self.out.write_all(b"\"\n")
    }

    pub fn into_inner(mut self) -> std::io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Scan consumer that filters, tokenizes and writes rows. Holds the running
/// counts so nothing outside the scan call is mutated.
#[derive(Debug)]
pub struct DescriptionSink<'c, W: Write> {
    cohorts: &'c CohortPair,
    tokenizer: Option<Tokenizer>,
    writer: CsvRowWriter<W>,
    rows_written: u64,
}

impl<'c, W: Write> DescriptionSink<'c, W> {
    pub fn new(cohorts: &'c CohortPair, tokenize: bool, writer: CsvRowWriter<W>) -> Self {
        Self {
            cohorts,
            tokenizer: tokenize.then(Tokenizer::new),
            writer,
            rows_written: 0,
        }
    }

    pub fn accept(&mut self, record: ProfileRecord) -> Result<ScanControl> {
        if let Some(row) = DescriptionRow::from_record(record, self.cohorts, self.tokenizer.as_ref())
        {
            self.writer.write_row(&row)?;
            self.rows_written += 1;
        }
        Ok(ScanControl::Continue)
    }

    #[must_use]
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    pub fn into_writer(self) -> std::io::Result<W> {
        self.writer.into_inner()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportStats {
    pub first_followers: usize,
    pub second_followers: usize,
    pub scan: ScanStats,
    pub rows_written: u64,
}

/// Scan `source` and write one row per cohort member to `sink`.
pub fn write_descriptions<D, S, W>(
    scanner: &mut CorpusScanner<D>,
    source: &mut S,
    sink: &mut DescriptionSink<'_, W>,
) -> Result<ScanStats>
where
    D: DeltaDecoder,
    S: BlobSource + ?Sized,
    W: Write,
{
    scanner.scan(source, |record| sink.accept(record))
}

/// The whole pass: load both cohorts, scan every cached profile, write CSV.
pub fn export_descriptions<W: Write>(
    cache: &SqliteCache,
    options: &ExportOptions,
    out: W,
) -> Result<(ExportStats, W)> {
    let cohorts = CohortPair::new(
        Cohort::load(cache, &options.first_screen_name, options.start_cursor)?,
        Cohort::load(cache, &options.second_screen_name, options.start_cursor)?,
    );

    let mut scanner = CorpusScanner::open(&options.dictionary_path)?
        .with_scratch_capacity(options.scratch_capacity)
        .with_progress_interval(options.progress_interval);
    let mut sink = DescriptionSink::new(&cohorts, options.tokenize, CsvRowWriter::new(out));
    let scan = write_descriptions(&mut scanner, &mut cache.profile_blobs(), &mut sink)?;

    let stats = ExportStats {
        first_followers: cohorts.first.len(),
        second_followers: cohorts.second.len(),
        scan,
        rows_written: sink.rows_written(),
    };
    tracing::info!(
        rows_written = stats.rows_written,
        decoded = stats.scan.decoded,
        skipped_empty = stats.scan.skipped_empty,
        "export finished"
    );
    Ok((stats, sink.into_writer()?))
}
