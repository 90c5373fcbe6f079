//! Process table entries.
//!
//! The engine's view of a process: lifecycle state, timestamps and CPU time.
//! Entries are correlated with [`Process`](super::Process) objects only by id.
//!
//! # Derived metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Turnaround | `end_time - start_time` |
//! | Waiting | `turnaround - cpu_time` |

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ProcessId;
use crate::error::SimError;

/// Lifecycle state of a process table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessState {
    /// Admitted and waiting for the CPU.
    #[serde(rename = "PR_READY")]
    Ready,
    /// Holding the CPU.
    #[serde(rename = "PR_CURR")]
    Current,
    /// Finished; `end_time` is set.
    #[serde(rename = "PR_DONE")]
    Done,
}

impl ProcessState {
    /// Conventional state label (`PR_READY`, `PR_CURR`, `PR_DONE`).
    pub fn label(self) -> &'static str {
        match self {
            Self::Ready => "PR_READY",
            Self::Current => "PR_CURR",
            Self::Done => "PR_DONE",
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Scheduling metadata for one admitted process.
///
/// # Invariants
/// - `end_time` is `Some` exactly when a scheduler has marked the entry done.
/// - `cpu_time` only grows.
/// - `start_time` never changes after admission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EntryRecord")]
pub struct ProcessTableEntry {
    process_id: ProcessId,
    state: ProcessState,
    start_time: u64,
    end_time: Option<u64>,
    cpu_time: u64,
}

#[derive(Deserialize)]
struct EntryRecord {
    process_id: ProcessId,
    state: ProcessState,
    start_time: u64,
    #[serde(default)]
    end_time: Option<u64>,
    #[serde(default)]
    cpu_time: u64,
}

impl TryFrom<EntryRecord> for ProcessTableEntry {
    type Error = SimError;

    fn try_from(record: EntryRecord) -> Result<Self, Self::Error> {
        let done = record.state == ProcessState::Done;
        if done != record.end_time.is_some() {
            return Err(SimError::invalid_state(format!(
                "entry {}: state {} with end time {:?}",
                record.process_id, record.state, record.end_time
            )));
        }
        Ok(Self {
            process_id: record.process_id,
            state: record.state,
            start_time: record.start_time,
            end_time: record.end_time,
            cpu_time: record.cpu_time,
        })
    }
}

impl ProcessTableEntry {
    /// Creates an entry with no CPU time and no end time.
    pub fn new(process_id: ProcessId, state: ProcessState, start_time: u64) -> Self {
        Self {
            process_id,
            state,
            start_time,
            end_time: None,
            cpu_time: 0,
        }
    }

    /// Process identifier.
    pub fn process_id(&self) -> ProcessId {
        self.process_id
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// Admission time.
    pub fn start_time(&self) -> u64 {
        self.start_time
    }

    /// Completion time, once done.
    pub fn end_time(&self) -> Option<u64> {
        self.end_time
    }

    /// Accumulated CPU time.
    pub fn cpu_time(&self) -> u64 {
        self.cpu_time
    }

    /// Whether the entry has completed.
    pub fn is_done(&self) -> bool {
        self.state == ProcessState::Done
    }

    /// Turnaround time: `end_time - start_time`. `None` until done.
    ///
    /// Saturates at zero for entries admitted with a start time later than
    /// the clock at which they finished.
    pub fn turnaround_time(&self) -> Option<u64> {
        self.end_time
            .map(|end| end.saturating_sub(self.start_time))
    }

    /// Waiting time: `turnaround - cpu_time`. `None` until done.
    pub fn waiting_time(&self) -> Option<u64> {
        self.turnaround_time()
            .map(|turnaround| turnaround.saturating_sub(self.cpu_time))
    }

    pub(crate) fn charge_cpu(&mut self, cost: u64) {
        self.cpu_time = self.cpu_time.saturating_add(cost);
    }

    pub(crate) fn set_state(&mut self, state: ProcessState) {
        self.state = state;
    }

    pub(crate) fn complete(&mut self, end_time: u64) {
        debug_assert!(self.end_time.is_none(), "entry completed twice");
        self.end_time = Some(end_time);
        self.state = ProcessState::Done;
    }
}
