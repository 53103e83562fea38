// SPDX-License-Identifier: AGPL-3.0-or-later

//! Key range queries (`GetKeyRange`) and their caller-owned output buffer.

use bytes::Bytes;

/// A bounded, optionally-reversed range of keys (spec §3 "KeyRange").
#[derive(Debug, Clone, Default)]
pub struct KeyRange {
    pub start_key: Bytes,
    pub start_key_inclusive: bool,
    pub end_key: Bytes,
    pub end_key_inclusive: bool,
    pub reverse: bool,
    pub max_returned: u32,
}

/// Caller-owned output for `get_key_range`. `capacity` bounds how many keys
/// are copied back; a range with more matches than `capacity` completes
/// with `Status::BufferOverrun` and `keys` holds the first `capacity`
/// matches in range order.
#[derive(Debug, Clone, Default)]
pub struct KeyRangeBuffer {
    pub keys: Vec<Bytes>,
    pub capacity: usize,
}

impl KeyRangeBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        KeyRangeBuffer {
            keys: Vec::new(),
            capacity,
        }
    }

    /// Copies `found` into `self.keys`, truncating to `capacity`. Returns
    /// `true` if `found` had to be truncated.
    pub(crate) fn fill(&mut self, found: Vec<Bytes>) -> bool {
        let overrun = found.len() > self.capacity;
        self.keys = found.into_iter().take(self.capacity).collect();
        overrun
    }
}
