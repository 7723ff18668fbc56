//! Builder-style options for an export pass over the cache.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DICTIONARY_PATH, DEFAULT_PROGRESS_INTERVAL, INITIAL_CURSOR, SCRATCH_BUFFER_CAPACITY,
};

fn default_dictionary_path() -> PathBuf {
    PathBuf::from(DEFAULT_DICTIONARY_PATH)
}

fn default_scratch_capacity() -> usize {
    SCRATCH_BUFFER_CAPACITY
}

fn default_progress_interval() -> u64 {
    DEFAULT_PROGRESS_INTERVAL
}

fn default_start_cursor() -> i64 {
    INITIAL_CURSOR
}

fn default_true() -> bool {
    true
}

/// Tunable options for `export_descriptions`.
/// The two screen names pick the follower cohorts; everything else has a default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportOptions {
    pub first_screen_name: String,
    pub second_screen_name: String,
    #[serde(default = "default_dictionary_path")]
    pub dictionary_path: PathBuf,
    /// Size of the reusable output buffer handed to every delta decode.
    #[serde(default = "default_scratch_capacity")]
    pub scratch_capacity: usize,
    /// Log a progress event every this many decoded records. 0 disables it.
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,
    /// Cursor of the first follower page to read for each cohort.
    #[serde(default = "default_start_cursor")]
    pub start_cursor: i64,
    /// Emit tokenized bios. When false the bio is written as cached.
    #[serde(default = "default_true")]
    pub tokenize: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            first_screen_name: String::new(),
            second_screen_name: String::new(),
            dictionary_path: default_dictionary_path(),
            scratch_capacity: default_scratch_capacity(),
            progress_interval: default_progress_interval(),
            start_cursor: default_start_cursor(),
            tokenize: true,
        }
    }
}

impl ExportOptions {
    /// Start a fluent builder for `ExportOptions`.
    #[must_use]
    pub fn builder() -> ExportOptionsBuilder {
        ExportOptionsBuilder::default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExportOptionsBuilder {
    inner: ExportOptions,
}

impl ExportOptionsBuilder {
    pub fn cohorts<A: Into<String>, B: Into<String>>(mut self, first: A, second: B) -> Self {
        self.inner.first_screen_name = first.into();
        self.inner.second_screen_name = second.into();
        self
    }

    pub fn dictionary_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.inner.dictionary_path = path.into();
        self
    }

    #[must_use]
    pub fn scratch_capacity(mut self, capacity: usize) -> Self {
        self.inner.scratch_capacity = capacity;
        self
    }

    #[must_use]
    pub fn progress_interval(mut self, interval: u64) -> Self {
        self.inner.progress_interval = interval;
        self
    }

    #[must_use]
    pub fn start_cursor(mut self, cursor: i64) -> Self {
        self.inner.start_cursor = cursor;
        self
    }

    #[must_use]
    pub fn tokenize(mut self, enabled: bool) -> Self {
        self.inner.tokenize = enabled;
        self
    }

    #[must_use]
    pub fn build(self) -> ExportOptions {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let opts = ExportOptions::builder()
            .cohorts("hillaryclinton", "realDonaldTrump")
            .dictionary_path("/tmp/dict.fzm")
            .progress_interval(0)
            .tokenize(false)
            .build();
        assert_eq!(opts.first_screen_name, "hillaryclinton");
        assert_eq!(opts.second_screen_name, "realDonaldTrump");
        assert_eq!(opts.dictionary_path, PathBuf::from("/tmp/dict.fzm"));
        assert_eq!(opts.progress_interval, 0);
        assert_eq!(opts.scratch_capacity, SCRATCH_BUFFER_CAPACITY);
        assert_eq!(opts.start_cursor, INITIAL_CURSOR);
        assert!(!opts.tokenize);
    }

    #[test]
    fn deserialize_fills_defaults() {
        let opts: ExportOptions =
            serde_json::from_str(r#"{"first_screen_name":"a","second_screen_name":"b"}"#).unwrap();
        assert_eq!(opts.dictionary_path, PathBuf::from(DEFAULT_DICTIONARY_PATH));
        assert!(opts.tokenize);
    }
}
