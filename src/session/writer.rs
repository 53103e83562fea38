// SPDX-License-Identifier: AGPL-3.0-or-later

//! The per-session writer loop: the single place that owns the socket's
//! write half, serializing every outbound PDU onto one stream of bytes.

use std::time::Duration;

use tokio::{net::tcp::OwnedWriteHalf, sync::mpsc};
use tokio_util::sync::CancellationToken;

use crate::{session::io::write_all, wire::RequestPdu};

pub(crate) async fn run(
    mut write_half: OwnedWriteHalf,
    mut rx: mpsc::Receiver<RequestPdu>,
    cancel: CancellationToken,
    write_timeout: Duration,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            maybe_pdu = rx.recv() => {
                let Some(pdu) = maybe_pdu else { break };
                let framed = pdu.encode();
                if write_all(&mut write_half, &framed, write_timeout, &cancel).await.is_err() {
                    cancel.cancel();
                    break;
                }
            }
        }
    }
}
