// SPDX-License-Identifier: AGPL-3.0-or-later

//! Command builders and response parsers: pure functions mapping between
//! the caller-visible types (`Entry`, `KeyRange`, ...) and the wire
//! `Command`/`Body`, plus thin `Session`-calling wrappers for each
//! command family.

pub mod admin;
pub mod delete;
pub mod flush;
pub mod get;
pub mod key_range;
pub mod noop;
pub mod p2p;
pub mod put;

use crate::{proto, status::Status};

pub(crate) fn status_of(command: &proto::Command) -> Status {
    let code = command
        .status
        .as_ref()
        .map(|s| s.code())
        .unwrap_or(proto::StatusCode::InternalError);
    Status::from_wire(code)
}

pub(crate) fn check_status(command: &proto::Command) -> Result<(), Status> {
    let status = status_of(command);
    if status.is_success() { Ok(()) } else { Err(status) }
}
