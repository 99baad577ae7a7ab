// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors that tear a Worker down. Task failures are deliberately fatal:
/// the dead-worker machinery on the Manager is what reassigns the task.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Protocol(#[from] mr_wire::ProtocolError),

    #[error("executable {} failed: {status}", path.display())]
    Executable { path: PathBuf, status: ExitStatus },
}
