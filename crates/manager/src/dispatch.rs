// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-phase task assignment: FIFO tasks meet the first ready worker in
//! registration order. The send happens off-lock; the state mutation
//! commits only after the send succeeds and re-checks that the worker
//! is still ready.

use crate::Shared;
use mr_core::{Task, TaskPhase, WorkerAddr};
use mr_wire::Message;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Drive one phase to completion: every task dispatched and every
/// `finished` received (or shutdown). Tasks reclaimed by the liveness
/// machinery reappear at the queue tail and are retried here.
pub(crate) async fn run_phase(
    shared: &Arc<Shared>,
    phase: TaskPhase,
    tasks: Vec<Task>,
    output_directory: &Path,
    executable: &Path,
    num_partitions: Option<u32>,
) {
    debug!("dispatching {} {} tasks", tasks.len(), phase);
    shared.state.lock().begin_phase(tasks);

    loop {
        if shared.shutdown.is_cancelled() {
            return;
        }

        let candidate = {
            let state = shared.state.lock();
            state
                .tasks
                .front()
                .cloned()
                .and_then(|task| state.first_ready().map(|addr| (addr, task)))
        };

        let Some((addr, task)) = candidate else {
            if shared.state.lock().phase_done() {
                break;
            }
            shared.wait_for_wake(shared.config.poll_interval).await;
            continue;
        };

        let message = task_message(phase, &task, &addr, output_directory, executable, num_partitions);
        match mr_wire::send_message((addr.host.as_str(), addr.port), &message).await {
            Ok(()) => match shared.state.lock().commit_dispatch(&addr) {
                Some(task) => info!("assigned {} task {} to worker {}", phase, task.id, addr),
                None => debug!("worker {} no longer ready, retrying task {}", addr, task.id),
            },
            Err(e) => {
                if e.is_connection_refused() {
                    warn!("connection to worker {} refused, marking dead", addr);
                } else {
                    warn!("could not reach worker {} ({}), marking dead", addr, e);
                }
                shared.state.lock().mark_dead(&addr);
            }
        }
    }
    debug!("{} phase complete", phase);
}

fn task_message(
    phase: TaskPhase,
    task: &Task,
    addr: &WorkerAddr,
    output_directory: &Path,
    executable: &Path,
    num_partitions: Option<u32>,
) -> Message {
    match phase {
        TaskPhase::Map => Message::NewMapTask {
            task_id: task.id,
            input_paths: task.input_paths.clone(),
            executable: executable.to_path_buf(),
            output_directory: output_directory.to_path_buf(),
            num_partitions: num_partitions.unwrap_or(1),
            worker_host: addr.host.clone(),
            worker_port: addr.port,
        },
        TaskPhase::Reduce => Message::NewReduceTask {
            task_id: task.id,
            input_paths: task.input_paths.clone(),
            executable: executable.to_path_buf(),
            output_directory: output_directory.to_path_buf(),
            worker_host: addr.host.clone(),
            worker_port: addr.port,
        },
    }
}
