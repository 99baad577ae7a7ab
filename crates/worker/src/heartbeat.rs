// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Heartbeat emitter: one UDP datagram to the Manager every interval
//! from the moment registration is acknowledged until shutdown.

use crate::Shared;
use mr_wire::Message;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

pub(crate) async fn emit(shared: Arc<Shared>) {
    let message = Message::Heartbeat {
        worker_host: shared.addr.host.clone(),
        worker_port: shared.addr.port,
    };
    let payload = match mr_wire::encode(&message) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("cannot encode heartbeat: {}", e);
            return;
        }
    };

    // Resolve the manager once and bind a socket of the matching
    // address family; localhost may resolve to v6 first.
    let target = match tokio::net::lookup_host(shared.manager()).await {
        Ok(mut addrs) => match addrs.next() {
            Some(addr) => addr,
            None => {
                warn!("manager address resolved to nothing, heartbeats disabled");
                return;
            }
        },
        Err(e) => {
            warn!("cannot resolve manager address: {}", e);
            return;
        }
    };
    let bind_addr = if target.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
    let socket = match UdpSocket::bind(bind_addr).await {
        Ok(socket) => socket,
        Err(e) => {
            warn!("cannot bind heartbeat socket: {}", e);
            return;
        }
    };

    let mut tick = tokio::time::interval(shared.config.heartbeat_interval);
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = shared.shutdown.cancelled() => break,
            _ = tick.tick() => {}
        }
        // Loss is tolerated by design; a failed send is just a skipped beat.
        if let Err(e) = socket.send_to(&payload, target).await {
            debug!("heartbeat send failed: {}", e);
        }
    }
}
