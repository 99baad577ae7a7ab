// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TCP control listener: accepts one-message connections and routes by
//! message type. Malformed payloads are logged and dropped; the loop
//! only exits on shutdown.

use crate::Shared;
use mr_core::{JobSpec, WorkerAddr};
use mr_wire::Message;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

pub(crate) async fn accept_loop(shared: &Arc<Shared>, tcp: TcpListener) {
    loop {
        let accepted = tokio::select! {
            _ = shared.shutdown.cancelled() => break,
            accepted = tcp.accept() => accepted,
        };
        match accepted {
            Ok((stream, _)) => {
                let shared = Arc::clone(shared);
                tokio::spawn(async move {
                    handle_connection(&shared, stream).await;
                });
            }
            Err(e) => error!("accept error: {}", e),
        }
    }
}

async fn handle_connection(shared: &Arc<Shared>, mut stream: TcpStream) {
    let message = match mr_wire::read_message(&mut stream, shared.config.recv_timeout).await {
        Ok(message) => message,
        Err(e) => {
            debug!("discarding undecodable message: {}", e);
            return;
        }
    };
    debug!(?message, "manager received");

    match message {
        Message::Register { worker_host, worker_port } => {
            handle_register(shared, WorkerAddr::new(worker_host, worker_port)).await;
        }
        Message::NewManagerJob {
            input_directory,
            output_directory,
            mapper_executable,
            reducer_executable,
            num_mappers,
            num_reducers,
        } => {
            handle_new_job(
                shared,
                JobSpec {
                    input_directory,
                    output_directory,
                    mapper_executable,
                    reducer_executable,
                    num_mappers,
                    num_reducers,
                },
            );
        }
        Message::Finished { task_id, worker_host, worker_port } => {
            handle_finished(shared, task_id, WorkerAddr::new(worker_host, worker_port));
        }
        Message::Shutdown => handle_shutdown(shared).await,
        other => debug!(?other, "unexpected message on control socket"),
    }
}

/// Add (or revive) the worker and acknowledge on a fresh connection
/// back to it. A refused acknowledgement kills the registration on the
/// spot.
async fn handle_register(shared: &Arc<Shared>, addr: WorkerAddr) {
    shared.state.lock().register(addr.clone());
    info!("registered worker {}", addr);

    let ack = Message::RegisterAck {
        worker_host: addr.host.clone(),
        worker_port: addr.port,
    };
    match mr_wire::send_message((addr.host.as_str(), addr.port), &ack).await {
        Ok(()) => shared.wake.notify_waiters(),
        Err(e) => {
            warn!("register ack to {} failed ({}), marking dead", addr, e);
            shared.state.lock().mark_dead(&addr);
        }
    }
}

/// Recreate the output directory and queue the job.
fn handle_new_job(shared: &Arc<Shared>, spec: JobSpec) {
    if spec.output_directory.is_dir() {
        if let Err(e) = std::fs::remove_dir_all(&spec.output_directory) {
            error!("cannot clear output directory {}: {}", spec.output_directory.display(), e);
            return;
        }
    }
    if let Err(e) = std::fs::create_dir_all(&spec.output_directory) {
        error!("cannot create output directory {}: {}", spec.output_directory.display(), e);
        return;
    }

    let id = shared.state.lock().enqueue_job(spec);
    info!("queued job {}", id);
    shared.wake.notify_waiters();
}

fn handle_finished(shared: &Arc<Shared>, task_id: u32, addr: WorkerAddr) {
    match shared.state.lock().finish(&addr) {
        Some(_) => {
            debug!("worker {} finished task {}", addr, task_id);
            shared.wake.notify_waiters();
        }
        // The worker may have been declared dead mid-task, or this is a
        // duplicate report after reassignment.
        None => debug!("ignoring finished from unknown or cleared worker {}", addr),
    }
}

/// Flip the shutdown flag, then fan the message out to every worker not
/// already dead. Per-worker refusals are swallowed; those workers are
/// gone anyway.
async fn handle_shutdown(shared: &Arc<Shared>) {
    info!("shutdown requested");
    shared.shutdown.cancel();

    let targets = shared.state.lock().live_workers();
    for addr in targets {
        match mr_wire::send_message((addr.host.as_str(), addr.port), &Message::Shutdown).await {
            Ok(()) => debug!("forwarded shutdown to {}", addr),
            Err(e) if e.is_connection_refused() => debug!("worker {} already gone", addr),
            Err(e) => warn!("could not forward shutdown to {}: {}", addr, e),
        }
    }
}
