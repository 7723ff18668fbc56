//! The crawler's on-disk HTTP cache.

mod sqlite;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use sqlite::{ProfileBlobs, SqliteCache};

/// One cached followers/ids response. Other response fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowerPage {
    pub ids: Vec<i64>,
    pub next_cursor: i64,
}

/// Lookup of cached follower-ID pages by screen name and cursor.
pub trait FollowerPageSource {
    /// `Ok(None)` when no response was cached for this cursor.
    fn follower_page(&self, screen_name: &str, cursor: i64) -> Result<Option<FollowerPage>>;
}
