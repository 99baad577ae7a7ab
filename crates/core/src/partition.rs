// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Input partitioning and key routing.
//!
//! Map-phase partitioning deals a sorted file listing round-robin into M
//! task buckets. Between phases, each map-output line is routed to a
//! reduce partition by hashing the key (the line up to the first TAB)
//! with MD5 and reducing modulo R. MD5 is load-bearing: retried map tasks
//! on different workers must route identical keys identically.

use crate::filename::partition_index_of;
use crate::task::Task;
use std::path::PathBuf;

/// Deal `files` (already sorted) round-robin into `buckets` tasks: the
/// file at position i goes to bucket `i % buckets`. Produces exactly
/// `buckets` tasks even when there are fewer files; the surplus tasks
/// carry empty input lists.
pub fn round_robin(files: Vec<PathBuf>, buckets: u32) -> Vec<Task> {
    let mut tasks: Vec<Task> =
        (0..buckets).map(|id| Task::new(id, Vec::new())).collect();
    if tasks.is_empty() {
        return tasks;
    }
    for (i, file) in files.into_iter().enumerate() {
        tasks[i % buckets as usize].input_paths.push(file);
    }
    tasks
}

/// Group intermediate `files` (already sorted) into `num_partitions`
/// reduce tasks keyed by the partition index encoded in each filename.
/// Files whose names do not carry an index in range are ignored.
pub fn group_by_partition(files: Vec<PathBuf>, num_partitions: u32) -> Vec<Task> {
    let mut tasks: Vec<Task> =
        (0..num_partitions).map(|id| Task::new(id, Vec::new())).collect();
    for file in files {
        let index = file
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(partition_index_of);
        if let Some(index) = index.filter(|&i| i < num_partitions) {
            tasks[index as usize].input_paths.push(file);
        }
    }
    tasks
}

/// Partition index for one map-output line: 0 when there is a single
/// partition, otherwise MD5 of the key interpreted as a 128-bit integer,
/// modulo `num_partitions`.
pub fn partition_index(line: &str, num_partitions: u32) -> u32 {
    if num_partitions <= 1 {
        return 0;
    }
    let key = line.split('\t').next().unwrap_or(line);
    let digest = md5::compute(key.as_bytes());
    (u128::from_be_bytes(digest.0) % u128::from(num_partitions)) as u32
}

#[cfg(test)]
#[path = "partition_tests.rs"]
mod tests;
