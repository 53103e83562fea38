// SPDX-License-Identifier: AGPL-3.0-or-later

//! The per-session reader loop: frames PDUs off the socket, authenticates
//! responses, and correlates them to outstanding operations by
//! `ack_sequence`. Runs as its own task for the lifetime of the session.
//!
//! The reader blocks on socket reads indefinitely (spec §5): an idle or
//! slow-replying drive is not a reason to tear down the session. The sole
//! per-operation cancellation primitive is `timeout::run`'s deadline
//! sweep over the operation registry.

use std::sync::Arc;

use bytes::Bytes;
use prost::Message as _;
use tokio::{net::tcp::OwnedReadHalf, sync::oneshot};
use tokio_util::sync::CancellationToken;

use crate::{
    message,
    operation::OperationRegistry,
    proto,
    session::io::read_exact_indefinite,
    status::Status,
    wire::{HEADER_LEN, Pdu, PduHeader, pdu::decode_message},
};

async fn read_one_pdu(
    read_half: &mut OwnedReadHalf,
    cancel: &CancellationToken,
) -> Result<(proto::Message, Bytes), Status> {
    let mut header_buf = [0u8; HEADER_LEN];
    read_exact_indefinite(read_half, &mut header_buf, cancel).await?;
    let header = PduHeader::decode(&header_buf)?;

    let mut proto_buf = vec![0u8; header.proto_len as usize];
    read_exact_indefinite(read_half, &mut proto_buf, cancel).await?;

    let mut value_buf = vec![0u8; header.value_len as usize];
    if header.value_len > 0 {
        read_exact_indefinite(read_half, &mut value_buf, cancel).await?;
    }

    let message = decode_message(&proto_buf)?;
    Ok((message, Bytes::from(value_buf)))
}

/// Reads PDUs until the socket errors, the peer disappears, or `cancel`
/// fires. The first PDU must be the drive's unsolicited status; it is
/// delivered once over `unsolicited_tx` and never again. Every response
/// after that is authenticated and handed to `registry`.
pub(crate) async fn run(
    mut read_half: OwnedReadHalf,
    registry: Arc<OperationRegistry>,
    hmac_key: Vec<u8>,
    cancel: CancellationToken,
    unsolicited_tx: oneshot::Sender<proto::Command>,
) {
    let mut unsolicited_tx = Some(unsolicited_tx);
    loop {
        let (message, value) = match read_one_pdu(&mut read_half, &cancel).await {
            Ok(pair) => pair,
            Err(status) => {
                tracing::debug!(?status, "reader loop exiting");
                break;
            }
        };

        match Pdu::from_wire(message, value) {
            Pdu::Unsolicited(u) => match proto::Command::decode(u.message.command_bytes.as_slice()) {
                Ok(command) => match unsolicited_tx.take() {
                    Some(tx) => {
                        let _ = tx.send(command);
                    }
                    None => {
                        tracing::warn!("unsolicited PDU received after handshake; treating as teardown");
                        break;
                    }
                },
                Err(_) => {
                    tracing::warn!("malformed unsolicited PDU");
                    break;
                }
            },
            Pdu::Response(r) => match message::verify_and_unwrap(&r.message, &hmac_key) {
                Ok(command) => {
                    let ack_sequence = command.header.as_ref().map(|h| h.ack_sequence).unwrap_or(-1);
                    if ack_sequence < 0 || !registry.complete(ack_sequence as u64, Ok((command, r.value))) {
                        tracing::debug!(ack_sequence, "response for unknown or already-resolved sequence");
                    }
                }
                Err(status) => {
                    tracing::warn!(?status, "failed to authenticate response PDU; closing session");
                    registry.fail_all(Status::DataError);
                    cancel.cancel();
                    break;
                }
            },
            Pdu::Request(_) => unreachable!("the client never receives Request PDUs"),
        }
    }

    registry.fail_all(Status::ConnectionError);
    cancel.cancel();
}
