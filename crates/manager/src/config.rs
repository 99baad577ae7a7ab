// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Manager configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Tunables for one Manager instance. The timing fields default to the
/// protocol's nominal values; tests shrink them to keep liveness
/// scenarios fast.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    pub host: String,
    /// TCP and UDP port. 0 picks an ephemeral port.
    pub port: u16,
    /// Parent for per-job shared temporary directories. Defaults to the
    /// OS temp dir; point it at the shared filesystem in a real cluster.
    pub shared_dir: Option<PathBuf>,
    /// Period of the heartbeat ageing ticker.
    pub heartbeat_interval: Duration,
    /// Ticks without a heartbeat before a worker is declared dead.
    pub miss_limit: u32,
    /// Fallback poll for the executor and assignment loops.
    pub poll_interval: Duration,
    /// Backoff when a job cannot start (no workers, missing input dir).
    pub retry_interval: Duration,
    /// Per-socket receive timeout on the control listener.
    pub recv_timeout: Duration,
}

impl ManagerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            shared_dir: None,
            heartbeat_interval: Duration::from_secs(2),
            miss_limit: 5,
            poll_interval: Duration::from_millis(100),
            retry_interval: Duration::from_secs(2),
            recv_timeout: Duration::from_secs(1),
        }
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self::new("localhost", 6000)
    }
}
