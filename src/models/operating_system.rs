//! Operating system model.
//!
//! Holds the global simulated clock, the process table, the ready list and
//! the scheduling knobs. Schedulers receive the model by `&mut` and are its
//! only mutators while they run.
//!
//! # Ready list
//!
//! The ready list stores handles (indices) into the process table rather
//! than copies, so a scheduler updating an entry through the ready list
//! updates the canonical table entry.

use log::debug;
use serde::{Deserialize, Serialize};

use super::{ProcessId, ProcessState, ProcessTableEntry};
use crate::error::SimError;

/// Default Round-Robin time slice (ns).
pub const DEFAULT_QUANTUM: u64 = 500;

/// Default context-switch cost (ns).
pub const DEFAULT_CONTEXT_SWITCH_PENALTY: u64 = 20;

/// Simulated single-CPU operating system.
///
/// # Example
/// ```
/// use sched_sim::models::{OperatingSystemModel, ProcessState};
///
/// let mut os = OperatingSystemModel::new(200, 0);
/// os.add_process(1, ProcessState::Ready, os.current_time());
/// os.add_process(2, ProcessState::Current, os.current_time());
///
/// assert_eq!(os.process_table().len(), 2);
/// assert_eq!(os.ready_list().count(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ModelRecord")]
pub struct OperatingSystemModel {
    current_time: u64,
    quantum: u64,
    context_switch_penalty: u64,
    process_table: Vec<ProcessTableEntry>,
    ready_list: Vec<usize>,
}

#[derive(Deserialize)]
struct ModelRecord {
    current_time: u64,
    quantum: u64,
    context_switch_penalty: u64,
    process_table: Vec<ProcessTableEntry>,
    ready_list: Vec<usize>,
}

impl TryFrom<ModelRecord> for OperatingSystemModel {
    type Error = SimError;

    /// Ready handles must index the table in strictly ascending order, as
    /// `add_process` produces them.
    fn try_from(record: ModelRecord) -> Result<Self, Self::Error> {
        let len = record.process_table.len();
        let mut previous: Option<usize> = None;
        for &handle in &record.ready_list {
            if handle >= len {
                return Err(SimError::invalid_state(format!(
                    "ready handle {handle} outside process table of {len} entr(ies)"
                )));
            }
            if previous.is_some_and(|p| handle <= p) {
                return Err(SimError::invalid_state(format!(
                    "ready handle {handle} out of admission order"
                )));
            }
            previous = Some(handle);
        }
        Ok(Self {
            current_time: record.current_time,
            quantum: record.quantum,
            context_switch_penalty: record.context_switch_penalty,
            process_table: record.process_table,
            ready_list: record.ready_list,
        })
    }
}

impl OperatingSystemModel {
    /// Creates a model at time zero with an empty process table.
    pub fn new(quantum: u64, context_switch_penalty: u64) -> Self {
        Self {
            current_time: 0,
            quantum,
            context_switch_penalty,
            process_table: Vec::new(),
            ready_list: Vec::new(),
        }
    }

    /// Current simulated time (ns).
    pub fn current_time(&self) -> u64 {
        self.current_time
    }

    /// Round-Robin time slice (ns).
    pub fn quantum(&self) -> u64 {
        self.quantum
    }

    /// Cost of each context switch (ns).
    pub fn context_switch_penalty(&self) -> u64 {
        self.context_switch_penalty
    }

    /// Every entry ever admitted, in admission order.
    pub fn process_table(&self) -> &[ProcessTableEntry] {
        &self.process_table
    }

    /// Entries that were ready at admission, in admission order.
    pub fn ready_list(&self) -> impl Iterator<Item = &ProcessTableEntry> + '_ {
        self.ready_list.iter().map(|&idx| &self.process_table[idx])
    }

    /// First table entry with the given id.
    pub fn entry(&self, process_id: ProcessId) -> Option<&ProcessTableEntry> {
        self.process_table
            .iter()
            .find(|e| e.process_id() == process_id)
    }

    /// Whether every admitted entry has completed.
    pub fn all_done(&self) -> bool {
        self.process_table.iter().all(ProcessTableEntry::is_done)
    }

    /// Admits a process.
    ///
    /// Appends a fresh entry to the process table. Entries admitted as
    /// [`ProcessState::Ready`] are also appended to the ready list. Existing
    /// entries are never touched.
    pub fn add_process(&mut self, process_id: ProcessId, state: ProcessState, start_time: u64) {
        let idx = self.process_table.len();
        self.process_table
            .push(ProcessTableEntry::new(process_id, state, start_time));
        if state == ProcessState::Ready {
            self.ready_list.push(idx);
        }
        debug!("admitted process {process_id} as {state} at t={start_time}");
    }

    /// Charges one context switch to the clock.
    ///
    /// The ids only feed the log; the time advance is always
    /// `context_switch_penalty`. The clock saturates at `u64::MAX`.
    pub fn switch_context(&mut self, from: ProcessId, to: ProcessId) {
        self.current_time = self.current_time.saturating_add(self.context_switch_penalty);
        debug!(
            "context switch {from} -> {to} (+{}), t={}",
            self.context_switch_penalty, self.current_time
        );
    }

    pub(crate) fn advance_time(&mut self, delta: u64) {
        self.current_time = self.current_time.saturating_add(delta);
    }

    pub(crate) fn ready_handles(&self) -> &[usize] {
        &self.ready_list
    }

    pub(crate) fn entry_at(&self, handle: usize) -> &ProcessTableEntry {
        &self.process_table[handle]
    }

    pub(crate) fn entry_at_mut(&mut self, handle: usize) -> &mut ProcessTableEntry {
        &mut self.process_table[handle]
    }
}

impl Default for OperatingSystemModel {
    fn default() -> Self {
        Self::new(DEFAULT_QUANTUM, DEFAULT_CONTEXT_SWITCH_PENALTY)
    }
}
