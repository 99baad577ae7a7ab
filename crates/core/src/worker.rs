// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker identity and liveness state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Network address of a worker, the key under which the Manager tracks it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkerAddr {
    pub host: String,
    pub port: u16,
}

impl WorkerAddr {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { host: host.into(), port }
    }
}

impl fmt::Display for WorkerAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Liveness state of a registered worker.
///
/// Transitions: Ready→Busy on dispatch, Busy→Ready on `finished`,
/// any→Dead on missed heartbeats or a refused connection, Dead→Ready
/// when the worker re-registers or a heartbeat from it arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Ready,
    Busy,
    Dead,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkerState::Ready => "ready",
            WorkerState::Busy => "busy",
            WorkerState::Dead => "dead",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
