// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! mr-worker: the MapReduce execution plane.
//!
//! A Worker registers with the Manager, heartbeats over UDP once the
//! registration is acknowledged, and serves task messages one at a time
//! on its TCP listener. Map and reduce tasks pipe files through the
//! job's user-supplied executables.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod config;
mod error;
mod heartbeat;
mod map;
mod reduce;

pub use config::WorkerConfig;
pub use error::WorkerError;

use mr_core::WorkerAddr;
use mr_wire::Message;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Context shared between the listener and the heartbeat emitter.
pub(crate) struct Shared {
    pub config: WorkerConfig,
    /// This worker's address as the Manager knows it.
    pub addr: WorkerAddr,
    pub shutdown: CancellationToken,
}

impl Shared {
    fn manager(&self) -> (&str, u16) {
        (self.config.manager_host.as_str(), self.config.manager_port)
    }
}

/// The Worker process: its bound listener plus shared context.
pub struct Worker {
    shared: Arc<Shared>,
    tcp: TcpListener,
    addr: SocketAddr,
}

impl Worker {
    /// Bind the task listener. With port 0 the bound port becomes the
    /// worker's identity.
    pub async fn bind(config: WorkerConfig) -> Result<Self, WorkerError> {
        let tcp = TcpListener::bind((config.host.as_str(), config.port)).await?;
        let addr = tcp.local_addr()?;
        let worker_addr = WorkerAddr::new(config.host.clone(), addr.port());
        let shared = Arc::new(Shared {
            config,
            addr: worker_addr,
            shutdown: CancellationToken::new(),
        });
        Ok(Self { shared, tcp, addr })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shared.shutdown.clone()
    }

    /// Register with the Manager and serve task messages until
    /// shutdown. A failing task tears the worker down: it stops
    /// heartbeating so the Manager declares it dead and reassigns.
    pub async fn run(self) -> Result<(), WorkerError> {
        info!("worker {} listening, registering with manager", self.shared.addr);
        mr_wire::send_message(
            self.shared.manager(),
            &Message::Register {
                worker_host: self.shared.addr.host.clone(),
                worker_port: self.shared.addr.port,
            },
        )
        .await?;

        let mut emitter: Option<JoinHandle<()>> = None;
        let result = self.serve(&mut emitter).await;

        self.shared.shutdown.cancel();
        if let Some(emitter) = emitter {
            let _ = emitter.await;
        }
        info!("worker {} shutting down", self.shared.addr);
        result
    }

    async fn serve(&self, emitter: &mut Option<JoinHandle<()>>) -> Result<(), WorkerError> {
        loop {
            let accepted = tokio::select! {
                _ = self.shared.shutdown.cancelled() => return Ok(()),
                accepted = self.tcp.accept() => accepted,
            };
            let (mut stream, _) = match accepted {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("accept error: {}", e);
                    continue;
                }
            };
            let message =
                match mr_wire::read_message(&mut stream, self.shared.config.recv_timeout).await {
                    Ok(message) => message,
                    Err(e) => {
                        debug!("discarding undecodable message: {}", e);
                        continue;
                    }
                };
            debug!(?message, "worker received");

            match message {
                Message::RegisterAck { .. } => {
                    info!("registered with manager");
                    if emitter.is_none() {
                        *emitter = Some(tokio::spawn(heartbeat::emit(Arc::clone(&self.shared))));
                    }
                }
                Message::NewMapTask {
                    task_id,
                    input_paths,
                    executable,
                    output_directory,
                    num_partitions,
                    ..
                } => {
                    info!("received map task {}", task_id);
                    map::run(&map::MapTask {
                        task_id,
                        input_paths,
                        executable,
                        output_directory,
                        num_partitions,
                    })
                    .await?;
                    info!("finished map task {}", task_id);
                    self.send_finished(task_id).await;
                }
                Message::NewReduceTask {
                    task_id,
                    input_paths,
                    executable,
                    output_directory,
                    ..
                } => {
                    info!("received reduce task {}", task_id);
                    reduce::run(&reduce::ReduceTask {
                        task_id,
                        input_paths,
                        executable,
                        output_directory,
                    })
                    .await?;
                    info!("finished reduce task {}", task_id);
                    self.send_finished(task_id).await;
                }
                Message::Shutdown => {
                    info!("shutdown received");
                    self.shared.shutdown.cancel();
                }
                other => debug!(?other, "unexpected message on worker socket"),
            }
        }
    }

    /// Report a completed task. Best-effort: a vanished Manager is not
    /// this worker's problem.
    async fn send_finished(&self, task_id: u32) {
        let message = Message::Finished {
            task_id,
            worker_host: self.shared.addr.host.clone(),
            worker_port: self.shared.addr.port,
        };
        if let Err(e) = mr_wire::send_message(self.shared.manager(), &message).await {
            warn!("could not report finished task {}: {}", task_id, e);
        }
    }
}
