// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::path::PathBuf;

fn addr(port: u16) -> WorkerAddr {
    WorkerAddr::new("localhost", port)
}

fn spec() -> JobSpec {
    JobSpec {
        input_directory: PathBuf::from("/in"),
        output_directory: PathBuf::from("/out"),
        mapper_executable: PathBuf::from("/bin/map"),
        reducer_executable: PathBuf::from("/bin/reduce"),
        num_mappers: 2,
        num_reducers: 2,
    }
}

fn state_with_phase(workers: &[u16], tasks: u32) -> ManagerState {
    let mut state = ManagerState::default();
    for &port in workers {
        state.register(addr(port));
    }
    state.begin_phase((0..tasks).map(|id| Task::new(id, Vec::new())).collect());
    state
}

#[test]
fn register_appends_in_order() {
    let state = state_with_phase(&[6001, 6002, 6003], 0);
    let ports: Vec<u16> = state.workers.iter().map(|w| w.addr.port).collect();
    assert_eq!(ports, [6001, 6002, 6003]);
    assert!(state.workers.iter().all(|w| w.state == WorkerState::Ready));
}

#[test]
fn reregister_revives_without_duplicating() {
    let mut state = state_with_phase(&[6001, 6002], 0);
    state.mark_dead(&addr(6001));
    state.register(addr(6001));
    assert_eq!(state.workers.len(), 2);
    assert_eq!(state.workers[0].state, WorkerState::Ready);
    assert_eq!(state.workers[0].missed, 0);
}

#[test]
fn reregister_of_busy_worker_reclaims_its_task() {
    let mut state = state_with_phase(&[6001], 1);
    state.commit_dispatch(&addr(6001)).unwrap();
    assert!(state.tasks.is_empty());

    state.register(addr(6001));
    assert_eq!(state.tasks.len(), 1);
    assert!(state.assigned.is_empty());
    assert_eq!(state.workers[0].state, WorkerState::Ready);
}

#[test]
fn heartbeat_zeroes_counter_and_revives() {
    let mut state = state_with_phase(&[6001], 0);
    state.workers[0].missed = 3;
    assert!(!state.heartbeat(&addr(6001)));
    assert_eq!(state.workers[0].missed, 0);

    state.mark_dead(&addr(6001));
    assert!(state.heartbeat(&addr(6001)));
    assert_eq!(state.workers[0].state, WorkerState::Ready);
}

#[test]
fn heartbeat_from_stranger_is_ignored() {
    let mut state = state_with_phase(&[6001], 0);
    assert!(!state.heartbeat(&addr(9999)));
    assert_eq!(state.workers.len(), 1);
}

#[test]
fn ageing_declares_dead_at_limit() {
    let mut state = state_with_phase(&[6001], 0);
    for _ in 0..4 {
        assert!(state.age_workers(5).is_empty());
    }
    assert_eq!(state.age_workers(5), [addr(6001)]);
    assert_eq!(state.workers[0].state, WorkerState::Dead);
    // Already dead: no second death notification.
    assert!(state.age_workers(5).is_empty());
}

#[test]
fn death_of_busy_worker_reenqueues_its_task_at_the_tail() {
    let mut state = state_with_phase(&[6001, 6002], 3);
    let first = state.commit_dispatch(&addr(6001)).unwrap();
    assert_eq!(first.id, 0);

    state.workers[0].missed = 4;
    let died = state.age_workers(5);
    assert_eq!(died, [addr(6001)]);
    assert!(state.assigned.is_empty());
    // Task 0 went back behind tasks 1 and 2.
    let order: Vec<u32> = state.tasks.iter().map(|t| t.id).collect();
    assert_eq!(order, [1, 2, 0]);
}

#[test]
fn death_of_idle_worker_moves_no_tasks() {
    let mut state = state_with_phase(&[6001], 2);
    state.workers[0].missed = 4;
    state.age_workers(5);
    assert_eq!(state.tasks.len(), 2);
}

#[test]
fn finish_clears_assignment_and_readies_worker() {
    let mut state = state_with_phase(&[6001], 1);
    state.commit_dispatch(&addr(6001)).unwrap();
    assert_eq!(state.workers[0].state, WorkerState::Busy);

    let task = state.finish(&addr(6001)).unwrap();
    assert_eq!(task.id, 0);
    assert_eq!(state.workers[0].state, WorkerState::Ready);
    assert!(state.phase_done());
}

#[test]
fn duplicate_finish_is_ignored() {
    let mut state = state_with_phase(&[6001], 1);
    state.commit_dispatch(&addr(6001)).unwrap();
    assert!(state.finish(&addr(6001)).is_some());
    assert!(state.finish(&addr(6001)).is_none());
    assert!(state.finish(&addr(9999)).is_none());
}

#[test]
fn busy_iff_assigned() {
    // Invariant: a worker is busy exactly when it has an assigned task.
    let mut state = state_with_phase(&[6001, 6002], 2);
    state.commit_dispatch(&addr(6001)).unwrap();
    state.commit_dispatch(&addr(6002)).unwrap();
    for worker in &state.workers {
        assert_eq!(
            worker.state == WorkerState::Busy,
            state.assigned.contains_key(&worker.addr)
        );
    }
    state.finish(&addr(6001));
    state.workers[1].missed = 5;
    state.age_workers(5);
    for worker in &state.workers {
        assert_eq!(
            worker.state == WorkerState::Busy,
            state.assigned.contains_key(&worker.addr)
        );
    }
}

#[test]
fn first_ready_scans_registration_order() {
    let mut state = state_with_phase(&[6001, 6002, 6003], 3);
    assert_eq!(state.first_ready(), Some(addr(6001)));
    state.commit_dispatch(&addr(6001)).unwrap();
    assert_eq!(state.first_ready(), Some(addr(6002)));
    state.mark_dead(&addr(6002));
    assert_eq!(state.first_ready(), Some(addr(6003)));
}

#[test]
fn commit_dispatch_refuses_non_ready_worker() {
    let mut state = state_with_phase(&[6001], 1);
    state.mark_dead(&addr(6001));
    assert!(state.commit_dispatch(&addr(6001)).is_none());
    assert_eq!(state.tasks.len(), 1);
}

#[test]
fn job_ids_are_dense_from_zero() {
    let mut state = ManagerState::default();
    assert_eq!(state.enqueue_job(spec()).0, 0);
    assert_eq!(state.enqueue_job(spec()).0, 1);
    assert_eq!(state.enqueue_job(spec()).0, 2);
    assert_eq!(state.jobs.len(), 3);
}

#[test]
fn live_workers_excludes_the_dead() {
    let mut state = state_with_phase(&[6001, 6002, 6003], 1);
    state.commit_dispatch(&addr(6001)).unwrap();
    state.mark_dead(&addr(6002));
    assert_eq!(state.live_workers(), [addr(6001), addr(6003)]);
}
