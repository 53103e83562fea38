// SPDX-License-Identifier: AGPL-3.0-or-later

//! `GetKeyRange`: lists keys within `[start_key, end_key]`, honoring
//! inclusivity and reverse-order flags.
//!
//! Open Question resolution (BUFFER_OVERRUN propagation): when the drive
//! returns more keys than the caller's buffer holds, the buffer is still
//! filled up to its capacity and `Status::BufferOverrun` is returned —
//! callers that ignore the error silently get a truncated-but-valid
//! prefix rather than nothing.

use bytes::Bytes;

use crate::{
    commands::check_status,
    key_range::{KeyRange, KeyRangeBuffer},
    proto,
    session::Session,
    status::Status,
};

pub fn build(range: &KeyRange, max_returned: u32) -> proto::Command {
    let range_msg = proto::Range {
        start_key: range.start_key.to_vec(),
        start_key_inclusive: range.start_key_inclusive,
        end_key: range.end_key.to_vec(),
        end_key_inclusive: range.end_key_inclusive,
        reverse: range.reverse,
        max_returned: max_returned as i32,
        keys: Vec::new(),
    };
    proto::Command {
        header: None,
        body: Some(proto::Body {
            range: Some(range_msg),
            ..Default::default()
        }),
        status: None,
    }
}

pub async fn get_key_range(
    session: &Session,
    range: &KeyRange,
    buffer: &mut KeyRangeBuffer,
) -> Result<(), Status> {
    let requested = range.max_returned.max(buffer.capacity as u32);
    let command = build(range, requested);
    let (response, _) = session
        .submit(command, Bytes::new(), proto::MessageType::Getkeyrange)
        .await?;
    check_status(&response)?;

    let found = response
        .body
        .and_then(|b| b.range)
        .map(|r| r.keys.into_iter().map(Bytes::from).collect())
        .unwrap_or_default();

    if buffer.fill(found) {
        return Err(Status::BufferOverrun);
    }
    Ok(())
}
