#![deny(clippy::all, clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![cfg_attr(
    test,
    allow(
        clippy::useless_vec,
        clippy::uninlined_format_args,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )
)]
#![allow(clippy::module_name_repetitions)]
//
// Documentation lints: internal helpers don't all carry error/panic sections.
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
//
// Casts between usize/u64 are bounded by the scratch capacity and window
// sizes validated before use.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
//
// Pattern matching and builder ergonomics.
#![allow(clippy::manual_let_else)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)] // builders take owned values
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::unreadable_literal)] // binary-format constants read better as hex
#![allow(clippy::similar_names)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]

//! Offline reader for a crawler's cached Twitter profiles.
//!
//! Profiles are stored zlib-framed around a VCDIFF delta against a shared
//! dictionary. This crate decodes them, joins them against the follower
//! lists of two accounts and writes each follower's bio, tokenized, as CSV.

/// The tweep-followers crate version (matches `Cargo.toml`).
pub const TWEEP_FOLLOWERS_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cache;
pub mod codec;
pub mod cohort;
pub mod constants;
pub mod error;
pub mod export;
#[cfg(feature = "cli")]
pub mod logging;
pub mod scan;
pub mod text;
pub mod types;

pub use cache::{FollowerPage, FollowerPageSource, SqliteCache};
pub use codec::{
    DeltaDecoder, Dictionary, RecordDecoder, ScratchBuffer, VcdiffDecoder, VcdiffEncoder,
    decode_delta, decode_record, encode_delta, encode_record,
};
pub use cohort::{Cohort, CohortPair, Membership, read_follower_ids};
pub use error::{DecodeError, Result, TweepError};
pub use export::{
    CsvRowWriter, DescriptionRow, DescriptionSink, ExportStats, export_descriptions,
    write_descriptions,
};
pub use scan::{BlobSource, CorpusScanner, IterSource, Records, ScanControl, ScanStats};
pub use text::{Tokenizer, UnicodeWordSegmenter, WordSegmenter, tokenize, tokenize_bytes};
pub use types::{ExportOptions, ExportOptionsBuilder, ProfileRecord};
