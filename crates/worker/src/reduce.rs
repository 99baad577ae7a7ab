// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reduce task execution: k-way merge the sorted intermediate files
//! into the reduce executable's stdin, capture its stdout in a local
//! staging file, and move that into the job's output directory.

use crate::WorkerError;
use mr_core::{reduce_output_name, MergedLines};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

pub(crate) struct ReduceTask {
    pub task_id: u32,
    pub input_paths: Vec<PathBuf>,
    pub executable: PathBuf,
    pub output_directory: PathBuf,
}

pub(crate) async fn run(task: &ReduceTask) -> Result<(), WorkerError> {
    let readers = task
        .input_paths
        .iter()
        .map(|path| std::fs::File::open(path).map(std::io::BufReader::new))
        .collect::<std::io::Result<Vec<_>>>()?;
    let merged = MergedLines::new(readers)?;

    let scratch = tempfile::Builder::new()
        .prefix(&format!("mapreduce-local-task{:05}-", task.task_id))
        .tempdir()?;
    debug!("created local tmpdir {}", scratch.path().display());

    let name = reduce_output_name(task.task_id);
    let staged = scratch.path().join(&name);
    let outfile = std::fs::File::create(&staged)?;

    // stdout goes straight to the staging file, so feeding stdin cannot
    // deadlock on an unread pipe.
    let mut child = Command::new(&task.executable)
        .stdin(Stdio::piped())
        .stdout(Stdio::from(outfile))
        .spawn()?;
    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| std::io::Error::other("reduce child stdin not captured"))?;

    for line in merged {
        let line = line?;
        stdin.write_all(line.as_bytes()).await?;
        stdin.write_all(b"\n").await?;
    }
    // Close stdin so the executable sees EOF and finishes.
    drop(stdin);

    let status = child.wait().await?;
    if !status.success() {
        return Err(WorkerError::Executable { path: task.executable.clone(), status });
    }

    move_file(&staged, &task.output_directory.join(&name))?;
    Ok(())
}

/// Prefer an atomic rename; fall back to copy+unlink when the staging
/// directory and the output directory sit on different filesystems.
fn move_file(src: &Path, dst: &Path) -> std::io::Result<()> {
    match std::fs::rename(src, dst) {
        Ok(()) => Ok(()),
        Err(_) => {
            std::fs::copy(src, dst)?;
            std::fs::remove_file(src)
        }
    }
}

#[cfg(test)]
#[path = "reduce_tests.rs"]
mod tests;
