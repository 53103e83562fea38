// SPDX-License-Identifier: AGPL-3.0-or-later

//! The timeout sweep: periodically evicts operations whose deadline has
//! passed, so a dropped response doesn't leave a future pending forever.

use std::{sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;

use crate::operation::OperationRegistry;

pub(crate) async fn run(registry: Arc<OperationRegistry>, cancel: CancellationToken, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let evicted = registry.sweep_expired(tokio::time::Instant::now());
                if evicted > 0 {
                    tracing::debug!(evicted, "timeout sweep evicted stale operations");
                }
            }
        }
    }
}
