// SPDX-License-Identifier: AGPL-3.0-or-later

//! A single in-flight request: what the reader loop needs to resolve it
//! once a correlated response (or a timeout sweep) arrives.

use bytes::Bytes;
use tokio::sync::oneshot;
use tokio::time::Instant;

use crate::{proto, status::Status};

/// The decoded reply handed back to whoever is waiting on a sequence
/// number: the `Command` (header + status + optional body) plus any raw
/// value bytes that followed it.
pub type OperationReply = (proto::Command, Bytes);

/// One outstanding request. Lives in the `OperationRegistry` keyed by its
/// `sequence` from submission until either a matching response arrives
/// (`complete`) or the timeout sweep evicts it (`OperationTimedOut`).
pub struct PendingOperation {
    pub sequence: u64,
    pub deadline: Instant,
    reply_tx: oneshot::Sender<Result<OperationReply, Status>>,
}

impl PendingOperation {
    pub fn new(
        sequence: u64,
        deadline: Instant,
    ) -> (Self, oneshot::Receiver<Result<OperationReply, Status>>) {
        let (tx, rx) = oneshot::channel();
        (
            PendingOperation {
                sequence,
                deadline,
                reply_tx: tx,
            },
            rx,
        )
    }

    /// Resolves the caller's future. The receiver may already be gone
    /// (caller dropped the future); that is not an error here.
    pub fn complete(self, result: Result<OperationReply, Status>) {
        let _ = self.reply_tx.send(result);
    }
}
