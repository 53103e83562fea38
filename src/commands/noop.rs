// SPDX-License-Identifier: AGPL-3.0-or-later

//! `NoOp`: round-trips an empty command. Used as the liveness probe
//! (spec §4.9 command family table).

use bytes::Bytes;

use crate::{commands::check_status, proto, session::Session, status::Status};

pub fn build() -> proto::Command {
    proto::Command {
        header: None,
        body: None,
        status: None,
    }
}

pub async fn noop(session: &Session) -> Result<(), Status> {
    let (response, _) = session.submit(build(), Bytes::new(), proto::MessageType::Noop).await?;
    check_status(&response)
}
