// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! mr-manager: the MapReduce control plane.
//!
//! One Manager instance owns four concurrent activities: the TCP
//! listener (registrations, job submissions, task completions,
//! shutdown), the UDP heartbeat listener, the heartbeat ageing ticker,
//! and the job executor. They share a single `ManagerState` behind one
//! mutex and coordinate through a [`tokio::sync::Notify`] plus a
//! cancellation token for shutdown.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod config;
mod dispatch;
mod error;
mod executor;
mod heartbeat;
mod listener;
mod state;

pub use config::ManagerConfig;
pub use error::ManagerError;

use parking_lot::Mutex;
use state::ManagerState;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Context shared by every Manager activity.
pub(crate) struct Shared {
    pub config: ManagerConfig,
    pub state: Mutex<ManagerState>,
    /// Pinged whenever shared state changes in a way a waiting loop
    /// might care about: job enqueued, worker registered or revived,
    /// task finished or re-enqueued.
    pub wake: Notify,
    pub shutdown: CancellationToken,
}

impl Shared {
    /// Park until woken, cancelled, or `timeout` elapses. Callers
    /// re-check their condition afterwards, so a missed notify only
    /// costs one poll interval.
    pub async fn wait_for_wake(&self, timeout: Duration) {
        tokio::select! {
            _ = self.shutdown.cancelled() => {}
            _ = self.wake.notified() => {}
            _ = tokio::time::sleep(timeout) => {}
        }
    }
}

/// The Manager process: bound sockets plus the shared context.
pub struct Manager {
    shared: Arc<Shared>,
    tcp: TcpListener,
    udp: UdpSocket,
    addr: SocketAddr,
}

impl Manager {
    /// Bind the TCP control socket and the UDP heartbeat socket on the
    /// configured address. Both live on the same port; with port 0 a
    /// free pair is searched for.
    pub async fn bind(config: ManagerConfig) -> Result<Self, ManagerError> {
        let (tcp, udp) = bind_pair(&config.host, config.port).await?;
        let addr = tcp.local_addr()?;
        let shared = Arc::new(Shared {
            config,
            state: Mutex::new(ManagerState::default()),
            wake: Notify::new(),
            shutdown: CancellationToken::new(),
        });
        Ok(Self { shared, tcp, udp, addr })
    }

    /// Address of the bound TCP control socket.
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Token observed by every activity; cancelling it is equivalent to
    /// receiving a `shutdown` message minus the forwarding to workers.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shared.shutdown.clone()
    }

    /// Run all Manager activities until shutdown.
    pub async fn run(self) -> Result<(), ManagerError> {
        info!("manager listening on {}", self.addr);
        let heartbeats = tokio::spawn(heartbeat::listen(Arc::clone(&self.shared), self.udp));
        let ageing = tokio::spawn(heartbeat::age(Arc::clone(&self.shared)));
        let executor = tokio::spawn(executor::run(Arc::clone(&self.shared)));

        listener::accept_loop(&self.shared, self.tcp).await;

        let _ = tokio::join!(heartbeats, ageing, executor);
        info!("manager shutting down");
        Ok(())
    }
}

/// Bind TCP and UDP on the same port. A fixed port binds directly; port
/// 0 retries until a port is free for both sockets.
async fn bind_pair(host: &str, port: u16) -> Result<(TcpListener, UdpSocket), ManagerError> {
    if port != 0 {
        let tcp = TcpListener::bind((host, port)).await?;
        let udp = UdpSocket::bind((host, port)).await?;
        return Ok((tcp, udp));
    }
    for _ in 0..16 {
        let tcp = TcpListener::bind((host, 0)).await?;
        let chosen = tcp.local_addr()?.port();
        if let Ok(udp) = UdpSocket::bind((host, chosen)).await {
            return Ok((tcp, udp));
        }
    }
    Err(ManagerError::Io(std::io::Error::new(
        std::io::ErrorKind::AddrInUse,
        "no port free for both tcp and udp",
    )))
}
