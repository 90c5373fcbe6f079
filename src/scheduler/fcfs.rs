//! First-Come-First-Served scheduler.
//!
//! # Algorithm
//!
//! 1. Walk the ready list in admission order.
//! 2. Charge a context switch before every process except the first.
//! 3. Run the process to completion, charging each instruction to both the
//!    entry's CPU time and the clock.
//! 4. Stamp the end time and mark the entry done.
//!
//! Final clock for N processes with costs `c_i` and penalty `p`:
//! `Σ c_i + p * (N - 1)`.

use log::{debug, info, warn};

use super::{ensure_ready_processes, ProcessMap, SchedulingAlgorithm};
use crate::error::{Result, SimError};
use crate::models::{OperatingSystemModel, ProcessId, ProcessState};

/// First-Come-First-Served, non-preemptive.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fcfs;

impl SchedulingAlgorithm for Fcfs {
    fn name(&self) -> &'static str {
        "FCFS"
    }

    fn run(&self, model: &mut OperatingSystemModel, processes: &mut ProcessMap) -> Result<()> {
        fcfs_scheduler(model, processes)
    }

    fn description(&self) -> &'static str {
        "First-Come-First-Served"
    }
}

/// Runs every ready process to completion in admission order.
///
/// # Errors
/// - [`SimError::ProcessNotFound`] if a ready entry has no process in
///   `processes`.
/// - [`SimError::Validation`] if a process id is ready more than once.
///
/// Nothing is executed when an error is returned.
///
/// # Example
/// ```
/// use sched_sim::models::{OperatingSystemModel, Process, ProcessState};
/// use sched_sim::scheduler::{fcfs_scheduler, ProcessMap};
///
/// let mut os = OperatingSystemModel::new(500, 0);
/// let mut processes = ProcessMap::new();
/// processes.insert(1, Process::from_mnemonics(1, &["LOAD", "ADD", "STORE"]));
/// processes.insert(2, Process::from_mnemonics(2, &["LOAD", "MUL", "DIV"]));
/// os.add_process(1, ProcessState::Ready, 0);
/// os.add_process(2, ProcessState::Ready, 0);
///
/// fcfs_scheduler(&mut os, &mut processes).unwrap();
/// assert_eq!(os.current_time(), 51);
/// ```
pub fn fcfs_scheduler(model: &mut OperatingSystemModel, processes: &mut ProcessMap) -> Result<()> {
    ensure_ready_processes(model, processes)?;

    let handles = model.ready_handles().to_vec();
    let mut previous: Option<ProcessId> = None;
    let mut completed = 0usize;

    for handle in handles {
        let pid = model.entry_at(handle).process_id();
        if model.entry_at(handle).is_done() {
            warn!("process {pid} already done; skipping");
            continue;
        }
        let process = processes
            .get_mut(&pid)
            .ok_or(SimError::ProcessNotFound { process_id: pid })?;

        if let Some(prev) = previous {
            model.switch_context(prev, pid);
        }
        previous = Some(pid);

        model.entry_at_mut(handle).set_state(ProcessState::Current);
        debug!("FCFS dispatch process {pid} at t={}", model.current_time());

        while !process.is_finished() {
            let cost = process.execute_next_instruction();
            model.entry_at_mut(handle).charge_cpu(cost);
            model.advance_time(cost);
        }

        let now = model.current_time();
        model.entry_at_mut(handle).complete(now);
        completed += 1;
        debug!(
            "process {pid} done at t={now} (cpu={})",
            model.entry_at(handle).cpu_time()
        );
    }

    info!(
        "FCFS completed {completed} process(es), total time {}",
        model.current_time()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Process;

    fn setup(penalty: u64, programs: &[&[&str]]) -> (OperatingSystemModel, ProcessMap) {
        let mut os = OperatingSystemModel::new(500, penalty);
        let mut processes = ProcessMap::new();
        for (i, &program) in programs.iter().enumerate() {
            let id = i as ProcessId + 1;
            processes.insert(id, Process::from_mnemonics(id, program));
            os.add_process(id, ProcessState::Ready, os.current_time());
        }
        (os, processes)
    }

    #[test]
    fn test_fcfs_two_processes_no_penalty() {
        let (mut os, mut processes) =
            setup(0, &[&["LOAD", "ADD", "STORE"], &["LOAD", "MUL", "DIV"]]);
        fcfs_scheduler(&mut os, &mut processes).unwrap();

        assert_eq!(os.current_time(), 51);
        let e1 = os.entry(1).unwrap();
        let e2 = os.entry(2).unwrap();
        assert_eq!(e1.cpu_time(), 31);
        assert_eq!(e1.end_time(), Some(31));
        assert_eq!(e1.state(), ProcessState::Done);
        assert_eq!(e2.cpu_time(), 20);
        assert_eq!(e2.end_time(), Some(51));
        assert_eq!(e2.state(), ProcessState::Done);
    }

    #[test]
    fn test_fcfs_total_time_formula() {
        let programs: [&[&str]; 4] = [
            &["LOAD", "STORE"],      // 30
            &["ADD", "SUB", "MUL"],  // 7
            &["DIV"],                // 5
            &["STORE", "STORE"],     // 40
        ];
        let (mut os, mut processes) = setup(20, &programs);
        fcfs_scheduler(&mut os, &mut processes).unwrap();

        assert_eq!(os.current_time(), 82 + 20 * 3);
        // Second process waits for the first plus one switch
        let e2 = os.entry(2).unwrap();
        assert_eq!(e2.end_time(), Some(30 + 20 + 7));
        assert_eq!(e2.waiting_time(), Some(50));
    }

    #[test]
    fn test_fcfs_single_process_no_penalty_charged() {
        let (mut os, mut processes) = setup(20, &[&["LOAD", "ADD", "STORE"]]);
        fcfs_scheduler(&mut os, &mut processes).unwrap();
        assert_eq!(os.current_time(), 31);
    }

    #[test]
    fn test_fcfs_empty_ready_list() {
        let mut os = OperatingSystemModel::new(500, 20);
        let mut processes = ProcessMap::new();
        fcfs_scheduler(&mut os, &mut processes).unwrap();
        assert_eq!(os.current_time(), 0);
    }

    #[test]
    fn test_fcfs_cpu_time_matches_executed_costs() {
        let program = ["LOAD", "FOO", "MUL", " ADD ", "STORE"];
        let expected = Process::from_mnemonics(1, &program).total_cost();
        let (mut os, mut processes) = setup(0, &[&program]);
        fcfs_scheduler(&mut os, &mut processes).unwrap();
        assert_eq!(os.entry(1).unwrap().cpu_time(), expected);
    }

    #[test]
    fn test_fcfs_missing_process_fails_fast() {
        let (mut os, mut processes) = setup(0, &[&["LOAD"], &["STORE"]]);
        processes.remove(&2);

        let err = fcfs_scheduler(&mut os, &mut processes).unwrap_err();
        assert!(matches!(err, SimError::ProcessNotFound { process_id: 2 }));
        // Nothing ran
        assert_eq!(os.current_time(), 0);
        assert_eq!(os.entry(1).unwrap().cpu_time(), 0);
    }

    #[test]
    fn test_fcfs_ignores_non_ready_entries() {
        let mut os = OperatingSystemModel::new(500, 0);
        let mut processes = ProcessMap::new();
        processes.insert(1, Process::from_mnemonics(1, &["LOAD"]));
        os.add_process(1, ProcessState::Ready, 0);
        os.add_process(9, ProcessState::Current, 0);

        fcfs_scheduler(&mut os, &mut processes).unwrap();
        assert_eq!(os.current_time(), 10);
        assert_eq!(os.entry(9).unwrap().state(), ProcessState::Current);
        assert_eq!(os.entry(9).unwrap().end_time(), None);
    }

    #[test]
    fn test_fcfs_duplicate_ready_id_rejected() {
        let (mut os, mut processes) = setup(20, &[&["LOAD"], &["STORE"]]);
        os.add_process(2, ProcessState::Ready, 0);

        let err = fcfs_scheduler(&mut os, &mut processes).unwrap_err();
        assert!(matches!(err, SimError::Validation(_)));
        assert_eq!(os.current_time(), 0);
        assert!(os.process_table().iter().all(|e| !e.is_done()));
    }

    #[test]
    fn test_fcfs_huge_penalty_saturates_clock() {
        let (mut os, mut processes) = setup(u64::MAX, &[&["ADD"], &["ADD"]]);
        fcfs_scheduler(&mut os, &mut processes).unwrap();

        assert_eq!(os.current_time(), u64::MAX);
        assert_eq!(os.entry(1).unwrap().end_time(), Some(1));
        assert_eq!(os.entry(2).unwrap().end_time(), Some(u64::MAX));
        assert_eq!(os.entry(2).unwrap().cpu_time(), 1);
        assert!(os.all_done());
    }
}
