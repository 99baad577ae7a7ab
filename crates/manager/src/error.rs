// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Errors surfaced by the Manager's own machinery. Per-worker network
/// failures are not errors here; they mark the worker dead and the
/// scheduler routes around them.
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Protocol(#[from] mr_wire::ProtocolError),
}
