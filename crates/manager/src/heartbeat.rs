// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker liveness: the UDP heartbeat listener and the ageing ticker.
//!
//! Heartbeats only ever reset the miss counter (and revive the dead);
//! the ticker is the sole place a worker can be declared dead for
//! silence, so the two never race on the same transition.

use crate::Shared;
use mr_core::WorkerAddr;
use mr_wire::Message;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tracing::{debug, info, warn};

/// Receive heartbeat datagrams until shutdown. Undecodable datagrams
/// and heartbeats from unregistered workers are dropped.
pub(crate) async fn listen(shared: Arc<Shared>, udp: UdpSocket) {
    let mut buf = [0u8; 4096];
    loop {
        let received = tokio::select! {
            _ = shared.shutdown.cancelled() => break,
            received = udp.recv_from(&mut buf) => received,
        };
        let len = match received {
            Ok((len, _)) => len,
            Err(e) => {
                warn!("heartbeat recv error: {}", e);
                continue;
            }
        };
        match mr_wire::decode(&buf[..len]) {
            Ok(Message::Heartbeat { worker_host, worker_port }) => {
                let addr = WorkerAddr::new(worker_host, worker_port);
                let revived = shared.state.lock().heartbeat(&addr);
                if revived {
                    info!("worker {} revived by heartbeat", addr);
                    shared.wake.notify_waiters();
                }
            }
            Ok(other) => debug!(?other, "unexpected message on heartbeat socket"),
            Err(e) => debug!("discarding undecodable heartbeat: {}", e),
        }
    }
}

/// Every heartbeat interval, bump each live worker's miss counter and
/// declare the silent ones dead, putting their tasks back in the queue.
pub(crate) async fn age(shared: Arc<Shared>) {
    let mut tick = tokio::time::interval(shared.config.heartbeat_interval);
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // interval() fires immediately; consume that so the first real tick
    // lands one full period after startup.
    tick.tick().await;

    loop {
        tokio::select! {
            _ = shared.shutdown.cancelled() => break,
            _ = tick.tick() => {}
        }
        let died = shared.state.lock().age_workers(shared.config.miss_limit);
        if died.is_empty() {
            continue;
        }
        for addr in &died {
            info!("worker {} died", addr);
        }
        shared.wake.notify_waiters();
    }
}
