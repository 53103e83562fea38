// SPDX-License-Identifier: AGPL-3.0-or-later

//! Correlates responses to requests by sequence number. A `DashMap`
//! stands in for the intrusive list + mutex (or arena + generation
//! counter) the design notes consider: lookup, insertion and removal are
//! all single-key operations so a lock-free map needs no extra
//! bookkeeping.

use dashmap::DashMap;
use tokio::time::Instant;

use crate::{
    operation::record::{OperationReply, PendingOperation},
    status::Status,
};

/// Matches `kinetic-c`'s `KINETIC_PDUS_PER_SESSION_MAX`: the maximum
/// number of requests a single session may have outstanding at once.
pub const MAX_OUTSTANDING: usize = 10;

#[derive(Default)]
pub struct OperationRegistry {
    inflight: DashMap<u64, PendingOperation>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        OperationRegistry {
            inflight: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.inflight.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inflight.is_empty()
    }

    /// Registers a new outstanding operation, or returns
    /// `MaxOutstandingExceeded` if the session is already at capacity.
    pub fn register(
        &self,
        sequence: u64,
        deadline: Instant,
    ) -> Result<tokio::sync::oneshot::Receiver<Result<OperationReply, Status>>, Status> {
        if self.inflight.len() >= MAX_OUTSTANDING {
            return Err(Status::MaxOutstandingExceeded);
        }
        let (op, rx) = PendingOperation::new(sequence, deadline);
        self.inflight.insert(sequence, op);
        Ok(rx)
    }

    /// Delivers a correlated response. Returns `false` if no operation
    /// with this sequence is outstanding (already timed out, or a stray
    /// ack for a sequence we never sent).
    pub fn complete(&self, sequence: u64, result: Result<OperationReply, Status>) -> bool {
        match self.inflight.remove(&sequence) {
            Some((_, op)) => {
                op.complete(result);
                true
            }
            None => false,
        }
    }

    /// Evicts and fails every operation whose deadline has passed.
    /// Returns how many were evicted, for logging.
    pub fn sweep_expired(&self, now: Instant) -> usize {
        let expired: Vec<u64> = self
            .inflight
            .iter()
            .filter(|entry| entry.deadline <= now)
            .map(|entry| *entry.key())
            .collect();
        for sequence in &expired {
            if let Some((_, op)) = self.inflight.remove(sequence) {
                op.complete(Err(Status::OperationTimedOut));
            }
        }
        expired.len()
    }

    /// Fails every outstanding operation, e.g. on session teardown.
    pub fn fail_all(&self, status: Status) {
        let sequences: Vec<u64> = self.inflight.iter().map(|entry| *entry.key()).collect();
        for sequence in sequences {
            if let Some((_, op)) = self.inflight.remove(&sequence) {
                op.complete(Err(status));
            }
        }
    }
}
