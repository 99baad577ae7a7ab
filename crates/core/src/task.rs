// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task records tracked by the Manager during one phase of one job.

use std::fmt;
use std::path::PathBuf;

/// Which phase a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPhase {
    Map,
    Reduce,
}

impl fmt::Display for TaskPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskPhase::Map => write!(f, "map"),
            TaskPhase::Reduce => write!(f, "reduce"),
        }
    }
}

/// One unit of work: a dense 0-based id within its phase plus the ordered
/// list of input files. An empty input list is legal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: u32,
    pub input_paths: Vec<PathBuf>,
}

impl Task {
    pub fn new(id: u32, input_paths: Vec<PathBuf>) -> Self {
        Self { id, input_paths }
    }
}
