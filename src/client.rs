// SPDX-License-Identifier: AGPL-3.0-or-later

//! Process-wide state: the shared callback bus and the handle returned by
//! `Client::init`.
//!
//! Per the design notes, this handle is explicit and passed by the
//! caller to every `Session::connect` — never an ambient global. A
//! process may run more than one `Client` (e.g. in tests) without them
//! interfering.

use std::sync::Arc;

use tokio::{sync::mpsc, task::JoinHandle};
use tracing_appender::non_blocking::WorkerGuard;

use crate::cfg::{config::ClientConfig, logger};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A small worker pool that runs reader-loop callbacks and user-supplied
/// closures off the session's own I/O tasks, so a slow callback never
/// stalls the writer/reader loop that invoked it.
pub struct Bus {
    job_tx: mpsc::UnboundedSender<Job>,
    workers: Vec<JoinHandle<()>>,
}

impl Bus {
    fn new(worker_count: usize) -> Arc<Bus> {
        let (job_tx, job_rx) = mpsc::unbounded_channel::<Job>();
        let job_rx = Arc::new(tokio::sync::Mutex::new(job_rx));
        let workers = (0..worker_count.max(1))
            .map(|_| {
                let job_rx = job_rx.clone();
                tokio::spawn(async move {
                    loop {
                        let job = {
                            let mut rx = job_rx.lock().await;
                            rx.recv().await
                        };
                        match job {
                            Some(job) => job(),
                            None => break,
                        }
                    }
                })
            })
            .collect();
        Arc::new(Bus { job_tx, workers })
    }

    /// Schedules `job` to run on a worker task. Never blocks the caller.
    pub fn submit(&self, job: impl FnOnce() + Send + 'static) {
        if self.job_tx.send(Box::new(job)).is_err() {
            tracing::warn!("bus submit after shutdown, job dropped");
        }
    }

    async fn shutdown(self: Arc<Self>) {
        match Arc::into_inner(self) {
            Some(bus) => {
                drop(bus.job_tx);
                for worker in bus.workers {
                    let _ = worker.await;
                }
            }
            None => tracing::warn!("bus shutdown requested while sessions still hold a handle"),
        }
    }
}

/// The process-wide handle created once by `Client::init` and shared by
/// every `Session` for the life of the process (or test).
pub struct Client {
    bus: Arc<Bus>,
    _log_guard: Option<WorkerGuard>,
}

impl Client {
    /// Installs logging and starts the shared callback bus.
    pub fn init(cfg: &ClientConfig) -> anyhow::Result<Client> {
        let log_guard = logger::init_logger(cfg).ok();
        let bus = Bus::new(cfg.max_threadpool_threads);
        Ok(Client {
            bus,
            _log_guard: log_guard,
        })
    }

    pub fn bus(&self) -> Arc<Bus> {
        self.bus.clone()
    }

    /// Drains the callback bus. Sessions must be disconnected first;
    /// this does not touch any open socket.
    pub async fn shutdown(self) {
        self.bus.shutdown().await;
    }
}
