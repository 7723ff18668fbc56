//! Reusable fixed-capacity output buffer for delta decoding.

use crate::constants::SCRATCH_BUFFER_CAPACITY;

/// Preallocated decode target, exclusively borrowed by each decode call.
///
/// Its contents are undefined between calls: a decode either overwrites the
/// prefix it returns or fails, and nothing should read the buffer otherwise.
/// The capacity never grows; a record that does not fit is a decode error.
#[derive(Debug, Clone)]
pub struct ScratchBuffer {
    bytes: Box<[u8]>,
}

impl ScratchBuffer {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: vec![0u8; capacity].into_boxed_slice(),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

impl Default for ScratchBuffer {
    fn default() -> Self {
        Self::with_capacity(SCRATCH_BUFFER_CAPACITY)
    }
}
