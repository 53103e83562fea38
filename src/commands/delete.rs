// SPDX-License-Identifier: AGPL-3.0-or-later

//! `Delete`: removes `entry.key`, enforcing the optimistic `db_version`
//! check unless `entry.force` is set.

use bytes::Bytes;

use crate::{commands::check_status, entry::Entry, proto, session::Session, status::Status};

pub fn build(entry: &Entry) -> proto::Command {
    let key_value = proto::KeyValue {
        key: entry.key.to_vec(),
        db_version: entry.db_version.clone().unwrap_or_default().to_vec(),
        force: entry.force,
        synchronization: proto::Synchronization::from(entry.synchronization) as i32,
        ..Default::default()
    };
    proto::Command {
        header: None,
        body: Some(proto::Body {
            key_value: Some(key_value),
            ..Default::default()
        }),
        status: None,
    }
}

pub async fn delete(session: &Session, entry: &Entry) -> Result<(), Status> {
    if !entry.has_key() {
        return Err(Status::MissingKey);
    }
    let command = build(entry);
    let (response, _) = session.submit(command, Bytes::new(), proto::MessageType::Delete).await?;
    check_status(&response)
}
