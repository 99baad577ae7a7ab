// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Streaming k-way merge of sorted line files.
//!
//! Holds one pending line per source in a min-heap, so memory stays
//! bounded by the number of inputs rather than their size. Ties compare
//! by source index, which keeps the merge stable.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::io::{self, BufRead};

/// Iterator over the lexicographically sorted union of several sorted
/// line streams. Yields lines without their trailing newline.
pub struct MergedLines<R> {
    readers: Vec<R>,
    heap: BinaryHeap<Reverse<(String, usize)>>,
}

impl<R: BufRead> MergedLines<R> {
    pub fn new(readers: Vec<R>) -> io::Result<Self> {
        let mut merged = Self { readers, heap: BinaryHeap::new() };
        for source in 0..merged.readers.len() {
            merged.advance(source)?;
        }
        Ok(merged)
    }

    /// Pull the next line from `source` into the heap, if any remains.
    fn advance(&mut self, source: usize) -> io::Result<()> {
        let mut line = String::new();
        if self.readers[source].read_line(&mut line)? == 0 {
            return Ok(());
        }
        if line.ends_with('\n') {
            line.pop();
        }
        self.heap.push(Reverse((line, source)));
        Ok(())
    }
}

impl<R: BufRead> Iterator for MergedLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let Reverse((line, source)) = self.heap.pop()?;
        match self.advance(source) {
            Ok(()) => Some(Ok(line)),
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;
