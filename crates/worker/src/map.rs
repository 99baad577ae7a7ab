// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Map task execution: pipe each input file through the map executable,
//! route every output line to one of R partition files by key hash,
//! then sort each partition into the shared output directory.

use crate::WorkerError;
use mr_core::{map_output_name, partition_index};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncBufReadExt;
use tokio::process::Command;
use tracing::debug;

pub(crate) struct MapTask {
    pub task_id: u32,
    pub input_paths: Vec<PathBuf>,
    pub executable: PathBuf,
    pub output_directory: PathBuf,
    pub num_partitions: u32,
}

pub(crate) async fn run(task: &MapTask) -> Result<(), WorkerError> {
    // Clamp so a degenerate R still yields one partition to write into.
    let num_partitions = task.num_partitions.max(1);
    let scratch = tempfile::Builder::new()
        .prefix(&format!("mapreduce-local-task{:05}-", task.task_id))
        .tempdir()?;
    debug!("created local tmpdir {}", scratch.path().display());

    // Partition files stay open across all inputs and are closed (by
    // scope) before the sort pass reads them back.
    {
        let mut partitions = open_partitions(scratch.path(), task.task_id, num_partitions)?;
        for input in &task.input_paths {
            debug!("mapping input {}", input.display());
            pipe_through_mapper(&task.executable, input, &mut partitions).await?;
        }
        for partition in &mut partitions {
            partition.flush()?;
        }
    }

    for p in 0..num_partitions {
        let name = map_output_name(task.task_id, p);
        sort_into(&scratch.path().join(&name), &task.output_directory.join(&name))?;
    }
    Ok(())
}

fn open_partitions(
    dir: &Path,
    task_id: u32,
    num_partitions: u32,
) -> std::io::Result<Vec<std::io::BufWriter<std::fs::File>>> {
    (0..num_partitions)
        .map(|p| {
            let path = dir.join(map_output_name(task_id, p));
            let file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
            Ok(std::io::BufWriter::new(file))
        })
        .collect()
}

/// Run the map executable with stdin bound to `input`, appending each
/// stdout line verbatim to the partition its key hashes to.
async fn pipe_through_mapper(
    executable: &Path,
    input: &Path,
    partitions: &mut [std::io::BufWriter<std::fs::File>],
) -> Result<(), WorkerError> {
    let num_partitions = partitions.len() as u32;
    let infile = std::fs::File::open(input)?;
    let mut child = Command::new(executable)
        .stdin(Stdio::from(infile))
        .stdout(Stdio::piped())
        .spawn()?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| std::io::Error::other("map child stdout not captured"))?;

    let mut lines = tokio::io::BufReader::new(stdout).lines();
    while let Some(line) = lines.next_line().await? {
        let p = partition_index(&line, num_partitions);
        let partition = &mut partitions[p as usize];
        partition.write_all(line.as_bytes())?;
        partition.write_all(b"\n")?;
    }

    let status = child.wait().await?;
    if !status.success() {
        return Err(WorkerError::Executable { path: executable.to_path_buf(), status });
    }
    Ok(())
}

/// Sort `src` by full-line byte order into `dst`.
fn sort_into(src: &Path, dst: &Path) -> std::io::Result<()> {
    let bytes = std::fs::read(src)?;
    let mut lines: Vec<&[u8]> = bytes.split(|&b| b == b'\n').collect();
    // A well-formed file ends with a newline; drop the empty tail that
    // split produces for it.
    if lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.sort_unstable();

    let mut out = std::io::BufWriter::new(std::fs::File::create(dst)?);
    for line in lines {
        out.write_all(line)?;
        out.write_all(b"\n")?;
    }
    out.flush()
}

#[cfg(test)]
#[path = "map_tests.rs"]
mod tests;
