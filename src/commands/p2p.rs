// SPDX-License-Identifier: AGPL-3.0-or-later

//! `P2POperation`: asks the connected drive to push a batch of keys to
//! another drive on our behalf.

use bytes::Bytes;

use crate::{
    commands::check_status,
    p2p::{P2PCopyOperation, P2POperation, P2PResult},
    proto,
    session::Session,
    status::Status,
};

pub fn build(op: &P2POperation) -> proto::Command {
    let operations = op
        .operations
        .iter()
        .map(|leaf| proto::P2PCopyOperation {
            key: leaf.key.to_vec(),
            version: leaf.version.to_vec(),
            force: leaf.force,
            new_key: leaf.new_key.to_vec(),
            status: None,
        })
        .collect();
    let p2p = proto::P2POperation {
        host_address: op.host_address.clone(),
        port: op.port,
        tls: op.tls,
        operation: operations,
    };
    proto::Command {
        header: None,
        body: Some(proto::Body {
            p2p_operation: Some(p2p),
            ..Default::default()
        }),
        status: None,
    }
}

pub async fn push(session: &Session, op: &P2POperation) -> Result<P2PResult, Status> {
    let command = build(op);
    let (response, _) = session
        .submit(command, Bytes::new(), proto::MessageType::Peer2Peerpush)
        .await?;
    check_status(&response)?;

    let per_op = response
        .body
        .and_then(|b| b.p2p_operation)
        .map(|p| {
            p.operation
                .into_iter()
                .map(|leaf| P2PCopyOperation {
                    key: leaf.key.into(),
                    version: leaf.version.into(),
                    force: leaf.force,
                    new_key: leaf.new_key.into(),
                    status: leaf.status.map(|s| Status::from_wire(s.code())),
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(P2PResult::rollup(per_op))
}
