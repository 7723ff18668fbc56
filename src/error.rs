use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while decoding a VCDIFF delta stream.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("delta stream does not start with the VCDIFF magic")]
    BadMagic,

    #[error("unsupported VCDIFF feature: {feature}")]
    Unsupported { feature: &'static str },

    #[error("delta stream truncated while reading {what}")]
    Truncated { what: &'static str },

    #[error("varint does not fit in {bits} bits")]
    VarintOverflow { bits: u32 },

    #[error("invalid window: {reason}")]
    InvalidWindow { reason: String },

    #[error("invalid instruction at target offset {offset}: {reason}")]
    InvalidInstruction { offset: usize, reason: &'static str },

    #[error("copy address {address} out of range (here = {here})")]
    InvalidAddress { address: u64, here: u64 },

    #[error("decoded output needs {required} bytes but scratch buffer holds {capacity}")]
    OutputOverflow { required: usize, capacity: usize },

    #[error("window checksum mismatch: expected {expected:#010x}, computed {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },
}

/// Crate-level error type.
#[derive(Debug, Error)]
pub enum TweepError {
    #[error("outer zlib layer is malformed: {source}")]
    OuterCompression {
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("decoded bytes are not a profile record: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to load dictionary {}: {source}", path.display())]
    Dictionary {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("sqlite error: {0}")]
    Cache(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid cache row: {reason}")]
    InvalidCacheRow { reason: String },

    #[error("follower page for {screen_name} at cursor {cursor} is malformed: {source}")]
    InvalidFollowerPage {
        screen_name: String,
        cursor: i64,
        #[source]
        source: serde_json::Error,
    },

    #[error("follower pages for {screen_name} loop back to cursor {cursor}")]
    CursorCycle { screen_name: String, cursor: i64 },
}

impl TweepError {
    /// True for the three per-record failure kinds that mark cache corruption.
    #[must_use]
    pub fn is_corrupt_record(&self) -> bool {
        matches!(
            self,
            Self::OuterCompression { .. } | Self::Decode(_) | Self::Parse { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, TweepError>;
