// SPDX-License-Identifier: AGPL-3.0-or-later

//! `FlushAllData`: forces every pending write-back entry to stable
//! storage.

use bytes::Bytes;

use crate::{commands::check_status, proto, session::Session, status::Status};

pub fn build() -> proto::Command {
    proto::Command {
        header: None,
        body: None,
        status: None,
    }
}

pub async fn flush(session: &Session) -> Result<(), Status> {
    let (response, _) = session
        .submit(build(), Bytes::new(), proto::MessageType::Flushalldata)
        .await?;
    check_status(&response)
}
