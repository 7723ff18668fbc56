//! Dump the bios of everyone following either of two accounts as CSV.
//!
//! ```text
//! dump-descriptions cache.sqlite alice bob > bios.csv
//! ```

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tweep_followers::cache::SqliteCache;
use tweep_followers::constants::{DEFAULT_DICTIONARY_PATH, INITIAL_CURSOR};
use tweep_followers::export::export_descriptions;
use tweep_followers::logging::{DEFAULT_DIRECTIVES, setup_logging};
use tweep_followers::types::ExportOptions;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogOutputFormat {
    Json,
    Pretty,
}

#[derive(Debug, Parser)]
#[clap(name = "dump-descriptions", version)]
struct Args {
    /// SQLite cache written by the crawler.
    database: PathBuf,

    /// First reference account.
    name1: String,

    /// Second reference account.
    name2: String,

    /// Shared delta dictionary.
    #[clap(long, env = "TWEEP_DICTIONARY", default_value = DEFAULT_DICTIONARY_PATH)]
    dictionary: PathBuf,

    /// Cursor of the first follower page to read.
    #[clap(long, default_value_t = INITIAL_CURSOR, allow_negative_numbers = true)]
    start_cursor: i64,

    /// Write bios as stored instead of tokenized.
    #[clap(long)]
    raw_descriptions: bool,

    #[clap(short = 'o', long = "output-format", default_value = "pretty")]
    output_format: LogOutputFormat,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    setup_logging(
        DEFAULT_DIRECTIVES,
        matches!(args.output_format, LogOutputFormat::Pretty),
    );

    tracing::info!(
        version = tweep_followers::TWEEP_FOLLOWERS_VERSION,
        database = %args.database.display(),
        first = %args.name1,
        second = %args.name2,
        "dumping follower descriptions"
    );

    let cache = SqliteCache::open_read_only(&args.database)?;
    let options = ExportOptions::builder()
        .cohorts(args.name1, args.name2)
        .dictionary_path(args.dictionary)
        .start_cursor(args.start_cursor)
        .tokenize(!args.raw_descriptions)
        .build();

    let stdout = std::io::stdout().lock();
    let (_stats, mut out) =
        export_descriptions(&cache, &options, std::io::BufWriter::new(stdout))
            .inspect_err(|err| tracing::error!(error = %err, "export failed"))?;
    out.flush()?;
    Ok(())
}
