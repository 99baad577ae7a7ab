// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::path::PathBuf;
use yare::parameterized;

fn paths(names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(PathBuf::from).collect()
}

#[test]
fn round_robin_deals_in_order() {
    let tasks = round_robin(paths(&["a", "b", "c", "d", "e"]), 2);
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id, 0);
    assert_eq!(tasks[0].input_paths, paths(&["a", "c", "e"]));
    assert_eq!(tasks[1].id, 1);
    assert_eq!(tasks[1].input_paths, paths(&["b", "d"]));
}

#[test]
fn round_robin_with_more_buckets_than_files() {
    let tasks = round_robin(paths(&["a", "b"]), 3);
    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks[0].input_paths, paths(&["a"]));
    assert_eq!(tasks[1].input_paths, paths(&["b"]));
    assert!(tasks[2].input_paths.is_empty());
}

#[test]
fn round_robin_with_no_files() {
    let tasks = round_robin(Vec::new(), 4);
    assert_eq!(tasks.len(), 4);
    assert!(tasks.iter().all(|t| t.input_paths.is_empty()));
}

#[test]
fn group_by_partition_uses_trailing_index() {
    let files = paths(&[
        "/tmp/job/maptask00000-part00000",
        "/tmp/job/maptask00000-part00001",
        "/tmp/job/maptask00001-part00000",
        "/tmp/job/maptask00001-part00001",
    ]);
    let tasks = group_by_partition(files, 2);
    assert_eq!(tasks[0].input_paths, paths(&[
        "/tmp/job/maptask00000-part00000",
        "/tmp/job/maptask00001-part00000",
    ]));
    assert_eq!(tasks[1].input_paths, paths(&[
        "/tmp/job/maptask00000-part00001",
        "/tmp/job/maptask00001-part00001",
    ]));
}

#[test]
fn group_by_partition_skips_stray_files() {
    let files = paths(&["/tmp/job/.nfs000", "/tmp/job/maptask00000-part00001"]);
    let tasks = group_by_partition(files, 2);
    assert!(tasks[0].input_paths.is_empty());
    assert_eq!(tasks[1].input_paths.len(), 1);
}

#[test]
fn group_by_partition_ignores_out_of_range_index() {
    let files = paths(&["/tmp/job/maptask00000-part00009"]);
    let tasks = group_by_partition(files, 2);
    assert!(tasks.iter().all(|t| t.input_paths.is_empty()));
}

#[test]
fn single_partition_short_circuits() {
    assert_eq!(partition_index("anything\t1", 1), 0);
    assert_eq!(partition_index("", 1), 0);
}

// MD5 digests are stable, so these indices are pinned for all time:
// md5("foo") = acbd18db4cc2f85cedef654fccc4a4d8, md5("world") ends ...35e7.
#[parameterized(
    foo   = { "foo\t1", 2, 0 },
    bar   = { "bar\t1", 2, 0 },
    baz   = { "baz\t1", 2, 0 },
    world = { "world\t1", 2, 1 },
    key   = { "key\t1", 2, 1 },
    mod3  = { "bar\t1", 3, 0 },
    mod3b = { "world\t1", 3, 2 },
)]
fn partition_index_is_md5_mod_r(line: &str, r: u32, expect: u32) {
    assert_eq!(partition_index(line, r), expect);
}

#[test]
fn key_stops_at_first_tab() {
    assert_eq!(partition_index("foo\t1", 2), partition_index("foo\t2\t3", 2));
}

#[test]
fn line_without_tab_hashes_whole_line() {
    assert_eq!(partition_index("foo", 2), partition_index("foo\tanything", 2));
}

#[test]
fn identical_lines_route_identically() {
    for r in [2, 3, 5, 16] {
        let a = partition_index("some key\tvalue", r);
        let b = partition_index("some key\tvalue", r);
        assert_eq!(a, b);
        assert!(a < r);
    }
}
