// SPDX-License-Identifier: AGPL-3.0-or-later

//! `Get`/`GetNext`/`GetPrevious`: fetch a record by key or by its
//! neighbor in key order (spec §4.9 command family table).

use bytes::Bytes;

use crate::{
    commands::check_status,
    entry::Entry,
    proto,
    session::Session,
    status::Status,
};

/// Which neighbor (if any) of `entry.key` to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Exact,
    Next,
    Previous,
}

impl Direction {
    fn message_type(self) -> proto::MessageType {
        match self {
            Direction::Exact => proto::MessageType::Get,
            Direction::Next => proto::MessageType::Getnext,
            Direction::Previous => proto::MessageType::Getprevious,
        }
    }
}

pub fn build(entry: &Entry) -> proto::Command {
    let key_value = proto::KeyValue {
        key: entry.key.to_vec(),
        metadata_only: entry.metadata_only,
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

/// Fetches `entry.key` (or its neighbor, per `direction`) and overwrites
/// `entry`'s metadata and (unless `metadata_only`) value in place.
pub async fn get(session: &Session, entry: &mut Entry, direction: Direction) -> Result<(), Status> {
    if !entry.has_key() {
        return Err(Status::MissingKey);
    }
    let command = build(entry);
    let (response, value) = session.submit(command, Bytes::new(), direction.message_type()).await?;
    check_status(&response)?;

    if let Some(body) = response.body {
        if let Some(kv) = body.key_value {
            entry.key = Bytes::from(kv.key);
            entry.tag = Bytes::from(kv.tag);
            entry.algorithm = kv.algorithm().into();
            entry.db_version = (!kv.db_version.is_empty()).then(|| Bytes::from(kv.db_version));
        }
    }
    if !entry.metadata_only {
        entry.value = value;
    }
    Ok(())
}
