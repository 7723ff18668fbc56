//! The shared delta dictionary.

use std::path::Path;
use std::sync::Arc;

use crate::error::{Result, TweepError};

/// Reference bytes for every delta decode in a scan.
///
/// Loaded once and immutable afterwards. Clones share the same allocation, so
/// independent scan partitions can hold one each without copying.
#[derive(Debug, Clone)]
pub struct Dictionary {
    bytes: Arc<[u8]>,
}

impl Dictionary {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs_err::read(path).map_err(|source| TweepError::Dictionary {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "loaded delta dictionary");
        Ok(Self::from_bytes(bytes))
    }

    #[must_use]
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl AsRef<[u8]> for Dictionary {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}
