//! Round-Robin scheduler.
//!
//! # Algorithm
//!
//! 1. Seed a FIFO working queue with the ready list's entry handles.
//! 2. Pop the head; charge a context switch unless this is the first dispatch.
//! 3. Execute whole instructions while each one fits in the remaining quantum.
//! 4. If the process is unfinished, the unused part of the quantum elapses
//!    as forfeited time (not CPU time) and the entry goes to the tail.
//! 5. Otherwise stamp the end time and drop it from the queue.
//!
//! Instructions are atomic: one that does not fit the remaining quantum is
//! deferred to the next slice, never split. An instruction costing more than
//! the whole quantum runs alone as an overrun when it opens a fresh slice,
//! otherwise the process could never progress.

use log::{debug, info, trace, warn};
use std::collections::VecDeque;

use super::{ensure_ready_processes, ProcessMap, SchedulingAlgorithm};
use crate::error::{Result, SimError};
use crate::models::{OperatingSystemModel, Process, ProcessId, ProcessState};

/// Round Robin with a fixed quantum and non-splittable instructions.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRobin;

impl SchedulingAlgorithm for RoundRobin {
    fn name(&self) -> &'static str {
        "RR"
    }

    fn run(&self, model: &mut OperatingSystemModel, processes: &mut ProcessMap) -> Result<()> {
        round_robin_scheduler(model, processes)
    }

    fn description(&self) -> &'static str {
        "Round Robin"
    }
}

/// Runs every ready process to completion in quantum-sized slices.
///
/// # Errors
/// - [`SimError::ProcessNotFound`] if a ready entry has no process.
/// - [`SimError::Validation`] if a process id is ready more than once.
/// - [`SimError::InvalidConfig`] if the model's quantum is zero.
///
/// Nothing is executed when an error is returned.
///
/// # Example
/// ```
/// use sched_sim::models::{OperatingSystemModel, Process, ProcessState};
/// use sched_sim::scheduler::{round_robin_scheduler, ProcessMap};
///
/// let mut os = OperatingSystemModel::new(200, 0);
/// let mut processes = ProcessMap::new();
/// processes.insert(1, Process::from_mnemonics(1, &["LOAD", "ADD", "STORE"]));
/// processes.insert(2, Process::from_mnemonics(2, &["ADD", "SUB", "ADD", "STORE"]));
/// os.add_process(1, ProcessState::Ready, 0);
/// os.add_process(2, ProcessState::Ready, 0);
///
/// round_robin_scheduler(&mut os, &mut processes).unwrap();
/// assert_eq!(os.entry(1).unwrap().end_time(), Some(31));
/// assert_eq!(os.entry(2).unwrap().end_time(), Some(54));
/// ```
pub fn round_robin_scheduler(
    model: &mut OperatingSystemModel,
    processes: &mut ProcessMap,
) -> Result<()> {
    let quantum = model.quantum();
    if quantum == 0 {
        return Err(SimError::invalid_config("round robin quantum must be positive"));
    }
    ensure_ready_processes(model, processes)?;

    let mut queue: VecDeque<usize> = model.ready_handles().iter().copied().collect();
    let mut previous: Option<ProcessId> = None;
    let mut slices = 0usize;
    let mut preemptions = 0usize;

    while let Some(handle) = queue.pop_front() {
        let pid = model.entry_at(handle).process_id();
        if model.entry_at(handle).is_done() {
            warn!("process {pid} already done; dropping from queue");
            continue;
        }
        let process = processes
            .get_mut(&pid)
            .ok_or(SimError::ProcessNotFound { process_id: pid })?;

        if let Some(prev) = previous {
            model.switch_context(prev, pid);
        }
        previous = Some(pid);
        slices += 1;

        model.entry_at_mut(handle).set_state(ProcessState::Current);
        let slice_start = model.current_time();
        let quantum_remaining = run_slice(model, handle, process, quantum);

        if process.is_finished() {
            let now = model.current_time();
            model.entry_at_mut(handle).complete(now);
            debug!(
                "process {pid} done at t={now} (cpu={})",
                model.entry_at(handle).cpu_time()
            );
        } else {
            model.advance_time(quantum_remaining);
            model.entry_at_mut(handle).set_state(ProcessState::Ready);
            queue.push_back(handle);
            preemptions += 1;
            trace!(
                "process {pid} preempted: slice {slice_start}..{}, forfeited {quantum_remaining}",
                model.current_time()
            );
        }
    }

    info!(
        "RR (q={quantum}) ran {slices} slice(s) with {preemptions} preemption(s), total time {}",
        model.current_time()
    );
    Ok(())
}

/// Executes whole instructions within one quantum.
///
/// Returns the unused quantum. The slice stops at the first instruction that
/// does not fit, except on a fresh slice where an oversized instruction runs
/// alone.
fn run_slice(
    model: &mut OperatingSystemModel,
    handle: usize,
    process: &mut Process,
    quantum: u64,
) -> u64 {
    let mut quantum_remaining = quantum;

    while quantum_remaining > 0 && !process.is_finished() {
        let next_cost = process.peek_next_instruction_cost();
        if next_cost > quantum_remaining {
            if quantum_remaining < quantum {
                break;
            }
            warn!(
                "process {}: instruction cost {next_cost} exceeds quantum {quantum}; running it as an overrun",
                process.id()
            );
        }

        let cost = process.execute_next_instruction();
        model.entry_at_mut(handle).charge_cpu(cost);
        model.advance_time(cost);
        quantum_remaining = quantum_remaining.saturating_sub(cost);
    }

    quantum_remaining
}
