// SPDX-License-Identifier: AGPL-3.0-or-later

//! `Put`: stores `entry.value` under `entry.key`, enforcing the optimistic
//! `db_version` check unless `entry.force` is set.

use bytes::Bytes;

use crate::{
    commands::check_status,
    entry::Entry,
    proto,
    session::Session,
    status::Status,
};

pub fn build(entry: &Entry) -> (proto::Command, Bytes) {
    let key_value = proto::KeyValue {
        key: entry.key.to_vec(),
        new_version: entry.new_version.clone().unwrap_or_default().to_vec(),
        db_version: entry.db_version.clone().unwrap_or_default().to_vec(),
        tag: entry.tag.to_vec(),
        algorithm: proto::Algorithm::from(entry.algorithm) as i32,
        synchronization: proto::Synchronization::from(entry.synchronization) as i32,
        force: entry.force,
        metadata_only: false,
    };
    let command = proto::Command {
        header: None,
        body: Some(proto::Body {
            key_value: Some(key_value),
            ..Default::default()
        }),
        status: None,
    };
    (command, entry.value.clone())
}

/// Stores `entry.value` under `entry.key`. On success, `entry.db_version`
/// is updated to the version now on the drive (the `new_version` it
/// acknowledged, or whatever `KeyValue.db_version` it returns instead) so
/// the caller can chain a version-checked `put` without re-fetching.
pub async fn put(session: &Session, entry: &mut Entry) -> Result<(), Status> {
    if !entry.has_key() {
        return Err(Status::MissingKey);
    }
    if !entry.has_value_buffer() {
        return Err(Status::MissingValueBuffer);
    }
    let (command, value) = build(entry);
    let (response, _) = session.submit(command, value, proto::MessageType::Put).await?;
    check_status(&response)?;

    let acked_version = response
        .body
        .and_then(|b| b.key_value)
        .and_then(|kv| (!kv.db_version.is_empty()).then(|| Bytes::from(kv.db_version)));
    entry.db_version = acked_version.or_else(|| entry.new_version.clone());
    Ok(())
}
