// SPDX-License-Identifier: AGPL-3.0-or-later

//! `Session`: one authenticated connection to a drive. Owns the
//! writer/reader/timeout-sweep tasks and the operation registry that
//! correlates responses back to callers.
//!
//! Blocking-vs-callback unification (spec §9 REDESIGN FLAG, adopted):
//! `submit` always returns a `Future`. Calling code that wants the old
//! synchronous behavior awaits it; calling code that wants the old
//! callback behavior uses `submit_async`, which spawns the await and
//! returns `Status::SuccessPending` immediately.

use std::{
    sync::{
        Arc,
        atomic::{AtomicI64, AtomicU8, Ordering},
    },
    time::Duration,
};

use bytes::Bytes;
use tokio::{
    net::TcpStream,
    sync::{Mutex, mpsc, oneshot},
    task::JoinHandle,
    time::Instant,
};
use tokio_util::sync::CancellationToken;

use crate::{
    cfg::config::SessionConfig,
    client::Bus,
    message,
    operation::{MAX_OUTSTANDING, OperationRegistry},
    proto,
    session::{io::with_timeout, reader, timeout, writer},
    status::Status,
    wire::RequestPdu,
};

const STATE_CONNECTING: u8 = 0;
const STATE_AWAIT_UNSOLICITED: u8 = 1;
const STATE_READY: u8 = 2;
const STATE_DRAINING: u8 = 3;
const STATE_CLOSED: u8 = 4;

pub struct Session {
    config: SessionConfig,
    write_tx: mpsc::Sender<RequestPdu>,
    registry: Arc<OperationRegistry>,
    sequence: AtomicI64,
    connection_id: i64,
    state: AtomicU8,
    cancel: CancellationToken,
    bus: Arc<Bus>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Session {
    /// Opens the TCP connection, spawns the writer/reader/timeout-sweep
    /// tasks, and blocks until the drive's unsolicited status PDU
    /// establishes this session's `connectionID`.
    ///
    /// Open Question resolution (connectionID reuse): every `connect`
    /// starts fresh and adopts whatever `connectionID` the drive hands
    /// back; reconnecting after a socket failure is a brand new
    /// `Session`, never a resume of the old one.
    pub async fn connect(config: SessionConfig, bus: Arc<Bus>) -> Result<Arc<Session>, Status> {
        if config.host.is_empty() {
            return Err(Status::HostEmpty);
        }
        if config.hmac_key.is_empty() {
            return Err(Status::HmacRequired);
        }

        let cancel = CancellationToken::new();
        let addr = format!("{}:{}", config.host, config.port);
        let stream = with_timeout(TcpStream::connect(&addr), config.connect_timeout, &cancel)
            .await
            .map_err(|_| Status::ConnectionError)?;
        stream.set_nodelay(true).map_err(|_| Status::SocketError)?;
        let (read_half, write_half) = stream.into_split();

        let registry = Arc::new(OperationRegistry::new());
        let (write_tx, write_rx) = mpsc::channel::<RequestPdu>(MAX_OUTSTANDING);
        let (unsolicited_tx, unsolicited_rx) = oneshot::channel();

        let writer_task = tokio::spawn(writer::run(
            write_half,
            write_rx,
            cancel.clone(),
            config.response_timeout,
        ));
        let reader_task = tokio::spawn(reader::run(
            read_half,
            registry.clone(),
            config.hmac_key.clone().into_bytes(),
            cancel.clone(),
            unsolicited_tx,
        ));
        let timeout_task = tokio::spawn(timeout::run(
            registry.clone(),
            cancel.clone(),
            Duration::from_millis(250),
        ));

        let state = AtomicU8::new(STATE_AWAIT_UNSOLICITED);
        let handshake = match unsolicited_rx.await {
            Ok(command) => command,
            Err(_) => {
                cancel.cancel();
                return Err(Status::ConnectionError);
            }
        };
        let connection_id = handshake.header.as_ref().map(|h| h.connection_id).unwrap_or(0);
        state.store(STATE_READY, Ordering::SeqCst);

        Ok(Arc::new(Session {
            config,
            write_tx,
            registry,
            sequence: AtomicI64::new(1),
            connection_id,
            state,
            cancel,
            bus,
            tasks: Mutex::new(vec![writer_task, reader_task, timeout_task]),
        }))
    }

    pub fn connection_id(&self) -> i64 {
        self.connection_id
    }

    fn is_ready(&self) -> bool {
        self.state.load(Ordering::SeqCst) == STATE_READY
    }

    /// Submits a command and awaits its response. This is the single
    /// entry point both `execute()`-style synchronous calls and
    /// `submit_async`'s spawned continuation go through.
    pub async fn submit(
        &self,
        command: proto::Command,
        value: Bytes,
        message_type: proto::MessageType,
    ) -> Result<(proto::Command, Bytes), Status> {
        let auth = message::Auth::Hmac {
            identity: self.config.identity,
            key: self.config.hmac_key.as_bytes(),
        };
        self.dispatch(command, value, message_type, auth).await
    }

    /// Like `submit`, but authenticates with a PIN instead of the
    /// session's HMAC identity — used for the admin-plane pin operations
    /// (`SecureErase`/`InstantErase`/lock/unlock).
    pub async fn submit_with_pin(
        &self,
        command: proto::Command,
        pin: &[u8],
        message_type: proto::MessageType,
    ) -> Result<(proto::Command, Bytes), Status> {
        self.dispatch(command, Bytes::new(), message_type, message::Auth::Pin { pin })
            .await
    }

    async fn dispatch(
        &self,
        mut command: proto::Command,
        value: Bytes,
        message_type: proto::MessageType,
        auth: message::Auth<'_>,
    ) -> Result<(proto::Command, Bytes), Status> {
        if !self.is_ready() {
            return Err(Status::SessionInvalid);
        }

        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        let header = message::build_header(
            self.config.cluster_version,
            self.connection_id,
            sequence,
            message_type,
            self.config.response_timeout.as_millis() as i64,
            0,
        );
        command.header = Some(header);

        let deadline = Instant::now() + self.config.response_timeout;
        let rx = self.registry.register(sequence as u64, deadline)?;

        let message = message::build_message(&command, auth);
        let request = RequestPdu { message, value };

        if self.write_tx.send(request).await.is_err() {
            self.registry.complete(sequence as u64, Err(Status::SessionInvalid));
            return Err(Status::SessionInvalid);
        }

        match rx.await {
            Ok(result) => result,
            Err(_) => Err(Status::SessionInvalid),
        }
    }

    /// Fire-and-callback variant of `submit`: runs the request on a
    /// spawned task and invokes `on_complete` on the shared bus once it
    /// resolves, returning `SuccessPending` without waiting.
    pub fn submit_async<F>(
        self: &Arc<Self>,
        command: proto::Command,
        value: Bytes,
        message_type: proto::MessageType,
        on_complete: F,
    ) -> Status
    where
        F: FnOnce(Result<(proto::Command, Bytes), Status>) + Send + 'static,
    {
        let session = Arc::clone(self);
        let bus = self.bus.clone();
        tokio::spawn(async move {
            let result = session.submit(command, value, message_type).await;
            bus.submit(move || on_complete(result));
        });
        Status::SuccessPending
    }

    /// Stops accepting new operations, cancels the writer/reader/sweep
    /// tasks, fails anything still outstanding, and waits for the tasks
    /// to exit.
    pub async fn disconnect(&self) {
        self.state.store(STATE_DRAINING, Ordering::SeqCst);
        self.cancel.cancel();

        let mut tasks = self.tasks.lock().await;
        for task in tasks.drain(..) {
            let _ = task.await;
        }
        drop(tasks);

        self.registry.fail_all(Status::SessionInvalid);
        self.state.store(STATE_CLOSED, Ordering::SeqCst);
    }
}
