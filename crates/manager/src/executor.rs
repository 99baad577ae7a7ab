// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The job executor: takes the head job, runs its map phase into a
//! shared temporary directory, regroups the intermediates into reduce
//! tasks, runs the reduce phase into the job's output directory, and
//! only then dequeues the job.

use crate::{dispatch, ManagerError, Shared};
use mr_core::{Job, TaskPhase};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tracing::{info, warn};

pub(crate) async fn run(shared: Arc<Shared>) {
    loop {
        if shared.shutdown.is_cancelled() {
            break;
        }
        let job = shared.state.lock().jobs.front().cloned();
        match job {
            Some(job) => {
                if let Err(e) = run_job(&shared, &job).await {
                    // Leave the job queued; input problems may be
                    // transient on a shared filesystem.
                    warn!("job {} stalled: {}", job.id, e);
                    shared.wait_for_wake(shared.config.retry_interval).await;
                }
            }
            None => shared.wait_for_wake(shared.config.poll_interval).await,
        }
    }
}

/// Execute one job through both phases. Returning without dequeuing
/// (shutdown, no workers, listing errors) leaves it to be retried.
async fn run_job(shared: &Arc<Shared>, job: &Job) -> Result<(), ManagerError> {
    let spec = &job.spec;
    let files = sorted_listing(&spec.input_directory)?;
    let map_tasks = mr_core::round_robin(files, spec.num_mappers);

    let tmp = shared_tmpdir(shared, job)?;
    info!("created tmpdir {}", tmp.path().display());

    if !shared.state.lock().has_workers() {
        info!("no workers registered, leaving job {} queued", job.id);
        shared.wait_for_wake(shared.config.retry_interval).await;
        return Ok(());
    }

    dispatch::run_phase(
        shared,
        TaskPhase::Map,
        map_tasks,
        tmp.path(),
        &spec.mapper_executable,
        Some(spec.num_reducers),
    )
    .await;
    if shared.shutdown.is_cancelled() {
        return Ok(());
    }

    let intermediates = sorted_listing(tmp.path())?;
    let reduce_tasks = mr_core::group_by_partition(intermediates, spec.num_reducers);
    dispatch::run_phase(
        shared,
        TaskPhase::Reduce,
        reduce_tasks,
        &spec.output_directory,
        &spec.reducer_executable,
        None,
    )
    .await;
    if shared.shutdown.is_cancelled() {
        return Ok(());
    }

    shared.state.lock().jobs.pop_front();
    info!("job {} complete, cleaning up tmpdir {}", job.id, tmp.path().display());
    Ok(())
}

/// Per-job shared scratch directory. The `TempDir` guard removes it on
/// every exit path, including shutdown mid-phase.
fn shared_tmpdir(shared: &Arc<Shared>, job: &Job) -> std::io::Result<TempDir> {
    let prefix = format!("mapreduce-shared-job{:05}-", job.id.0);
    let mut builder = tempfile::Builder::new();
    builder.prefix(&prefix);
    match &shared.config.shared_dir {
        Some(dir) => builder.tempdir_in(dir),
        None => builder.tempdir(),
    }
}

/// Directory entries, lexicographically sorted for deterministic
/// partitioning.
fn sorted_listing(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        files.push(entry?.path());
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
