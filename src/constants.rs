//! Constants shared across the decode, scan and export paths.

/// Capacity of the reusable output buffer. A decoded Twitter user JSON is a
/// few kilobytes; anything near this bound is treated as corruption.
pub const SCRATCH_BUFFER_CAPACITY: usize = 100_000;

/// Dictionary location relative to the working directory, as laid out by the
/// crawler that filled the cache.
pub const DEFAULT_DICTIONARY_PATH: &str = "./lib/vcdiff-dictionary.fzm";

/// Emit a progress event every this many decoded records.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 100_000;

/// Cursor passed to the first followers/ids request.
pub const INITIAL_CURSOR: i64 = -1;

/// `next_cursor` value marking the last page.
pub const END_OF_PAGES_CURSOR: i64 = 0;

pub const USERS_LOOKUP_TABLE: &str = "users_lookup_http_cache";
pub const FOLLOWERS_IDS_TABLE: &str = "followers_ids_http_cache";
