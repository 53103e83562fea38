// SPDX-License-Identifier: AGPL-3.0-or-later

//! Cancellable, timed I/O building blocks shared by the reader and writer
//! loops.

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

use crate::status::Status;

/// Races `fut` against `timeout` and `cancel`; whichever resolves first
/// wins. Used so a stalled socket read/write can neither hang forever nor
/// survive past session shutdown.
pub async fn with_timeout<F, T>(
    fut: F,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<T, Status>
where
    F: std::future::Future<Output = std::io::Result<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Status::ConnectionError),
        res = tokio::time::timeout(timeout, fut) => match res {
            Ok(Ok(v)) => Ok(v),
            Ok(Err(_)) => Err(Status::SocketError),
            Err(_) => Err(Status::SocketTimeout),
        },
    }
}

pub async fn read_exact<R: AsyncRead + Unpin>(
    reader: &mut R,
    buf: &mut [u8],
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<(), Status> {
    with_timeout(reader.read_exact(buf), timeout, cancel).await?;
    Ok(())
}

/// Like `read_exact`, but blocks indefinitely instead of racing a timeout —
/// only `cancel` or the socket itself can end the wait. The reader loop
/// uses this: an idle or slow-to-reply drive is not a session-ending event,
/// only `timeout::run`'s per-operation sweep decides that.
pub async fn read_exact_indefinite<R: AsyncRead + Unpin>(
    reader: &mut R,
    buf: &mut [u8],
    cancel: &CancellationToken,
) -> Result<(), Status> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(Status::ConnectionError),
        res = reader.read_exact(buf) => res.map(|_| ()).map_err(|_| Status::SocketError),
    }
}

pub async fn write_all<W: AsyncWrite + Unpin>(
    writer: &mut W,
    buf: &[u8],
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<(), Status> {
    with_timeout(writer.write_all(buf), timeout, cancel).await
}
