// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tagged control-plane messages. The `message_type` string on the wire
//! is the serde tag; an unknown tag is a decode error, not a silent
//! fallthrough.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "message_type", rename_all = "snake_case")]
pub enum Message {
    /// Worker announces itself to the Manager (TCP, W→M).
    Register { worker_host: String, worker_port: u16 },

    /// Manager acknowledges a registration (TCP, M→W), echoing the
    /// worker's address. Receipt starts the worker's heartbeat emitter.
    RegisterAck { worker_host: String, worker_port: u16 },

    /// Periodic keep-alive (UDP, W→M). Loss is tolerated.
    Heartbeat { worker_host: String, worker_port: u16 },

    /// Job submission (TCP, client→M).
    NewManagerJob {
        input_directory: PathBuf,
        output_directory: PathBuf,
        mapper_executable: PathBuf,
        reducer_executable: PathBuf,
        num_mappers: u32,
        num_reducers: u32,
    },

    /// Map task assignment (TCP, M→W).
    NewMapTask {
        task_id: u32,
        input_paths: Vec<PathBuf>,
        executable: PathBuf,
        output_directory: PathBuf,
        num_partitions: u32,
        worker_host: String,
        worker_port: u16,
    },

    /// Reduce task assignment (TCP, M→W).
    NewReduceTask {
        task_id: u32,
        input_paths: Vec<PathBuf>,
        executable: PathBuf,
        output_directory: PathBuf,
        worker_host: String,
        worker_port: u16,
    },

    /// Worker reports task completion (TCP, W→M).
    Finished { task_id: u32, worker_host: String, worker_port: u16 },

    /// Cluster shutdown (TCP, client→M, forwarded M→W).
    Shutdown,
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
