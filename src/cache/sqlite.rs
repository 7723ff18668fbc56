use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};

use crate::constants::{FOLLOWERS_IDS_TABLE, USERS_LOOKUP_TABLE};
use crate::error::{Result, TweepError};
use crate::scan::{BlobSource, ScanControl};

use super::{FollowerPage, FollowerPageSource};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS followers_ids_http_cache (
        id INTEGER PRIMARY KEY,
        screen_name TEXT NOT NULL,
        cursor INTEGER NOT NULL,
        created_at INTEGER NOT NULL,
        json TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS users_lookup_http_cache (
        id INTEGER PRIMARY KEY,
        created_at INTEGER NOT NULL,
        compressed_json BLOB
    );
";

/// SQLite database filled by the crawler.
#[derive(Debug)]
pub struct SqliteCache {
    conn: Connection,
}

impl SqliteCache {
    /// Open an existing cache without write access.
    pub fn open_read_only(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        tracing::debug!(path = %path.display(), "opened cache read-only");
        Ok(Self { conn })
    }

    /// Open or create a writable cache with both tables present.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    #[must_use]
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn insert_profile_blob(&self, id: i64, created_at: i64, blob: Option<&[u8]>) -> Result<()> {
        self.conn.execute(
            &format!(
                "INSERT INTO {USERS_LOOKUP_TABLE} (id, created_at, compressed_json) VALUES (?1, ?2, ?3)"
            ),
            params![id, created_at, blob],
        )?;
        Ok(())
    }

    pub fn insert_follower_page(
        &self,
        screen_name: &str,
        cursor: i64,
        created_at: i64,
        page: &FollowerPage,
    ) -> Result<()> {
        let json = serde_json::to_string(page).map_err(|source| {
            TweepError::InvalidFollowerPage {
                screen_name: screen_name.to_string(),
                cursor,
                source,
            }
        })?;
        self.conn.execute(
            &format!(
                "INSERT INTO {FOLLOWERS_IDS_TABLE} (screen_name, cursor, created_at, json) VALUES (?1, ?2, ?3, ?4)"
            ),
            params![screen_name, cursor, created_at, json],
        )?;
        Ok(())
    }

    /// Every users/lookup row, as a [`BlobSource`].
    #[must_use]
    pub fn profile_blobs(&self) -> ProfileBlobs<'_> {
        ProfileBlobs { conn: &self.conn }
    }
}

impl FollowerPageSource for SqliteCache {
    fn follower_page(&self, screen_name: &str, cursor: i64) -> Result<Option<FollowerPage>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT json FROM {FOLLOWERS_IDS_TABLE} WHERE screen_name = ?1 AND cursor = ?2"
        ))?;
        let json: Option<String> = stmt
            .query_row(params![screen_name, cursor], |row| row.get(0))
            .optional()?;
        json.map(|json| {
            serde_json::from_str(&json).map_err(|source| TweepError::InvalidFollowerPage {
                screen_name: screen_name.to_string(),
                cursor,
                source,
            })
        })
        .transpose()
    }
}

/// Streams `compressed_json` in row order. NULL reads as an empty blob.
#[derive(Debug)]
pub struct ProfileBlobs<'c> {
    conn: &'c Connection,
}

impl BlobSource for ProfileBlobs<'_> {
    fn for_each_blob(
        &mut self,
        visit: &mut dyn FnMut(&[u8]) -> Result<ScanControl>,
    ) -> Result<()> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT compressed_json FROM {USERS_LOOKUP_TABLE} ORDER BY id"
        ))?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let blob = match row.get_ref(0)? {
                ValueRef::Blob(bytes) | ValueRef::Text(bytes) => bytes,
                ValueRef::Null => &[][..],
                other => {
                    return Err(TweepError::InvalidCacheRow {
                        reason: format!(
                            "compressed_json has type {:?}, expected BLOB",
                            other.data_type()
                        ),
                    });
                }
            };
            if visit(blob)? == ScanControl::Stop {
                break;
            }
        }
        Ok(())
    }
}
