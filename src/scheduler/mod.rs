//! CPU scheduling algorithms and run metrics.
//!
//! Both algorithms take the operating system model by exclusive reference
//! plus a map from process id to [`Process`], run every ready process to
//! completion, and leave their results in the model's process table.
//!
//! # Algorithms
//!
//! | Algorithm | Preemption | Dispatch order |
//! |-----------|------------|----------------|
//! | FCFS | none | admission order |
//! | Round Robin | at quantum expiry, between instructions | FIFO with re-queue |
//!
//! Every hand-over between two different dispatches is charged through
//! [`OperatingSystemModel::switch_context`].
//!
//! # KPI
//!
//! [`SimulationKpi`] derives turnaround and waiting times from the finished
//! process table.

mod fcfs;
mod kpi;
mod round_robin;

pub use fcfs::{fcfs_scheduler, Fcfs};
pub use kpi::{ProcessMetrics, SimulationKpi};
pub use round_robin::{round_robin_scheduler, RoundRobin};

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt::{self, Debug};
use std::str::FromStr;

use crate::error::{Result, SimError};
use crate::models::{OperatingSystemModel, Process, ProcessId};
use crate::validation::{ValidationError, ValidationErrorKind};

/// Processes indexed by id, as handed to a scheduler.
pub type ProcessMap = HashMap<ProcessId, Process>;

/// A run-to-completion scheduling algorithm.
pub trait SchedulingAlgorithm: Debug {
    /// Short name (e.g., "FCFS", "RR").
    fn name(&self) -> &'static str;

    /// Runs every ready entry of `model` to completion.
    ///
    /// # Errors
    /// - [`SimError::ProcessNotFound`] if a ready entry has no process in
    ///   `processes`.
    /// - [`SimError::Validation`] if two ready entries share a process id.
    ///
    /// The model is untouched in both cases.
    fn run(&self, model: &mut OperatingSystemModel, processes: &mut ProcessMap) -> Result<()>;

    /// Human-readable description.
    fn description(&self) -> &'static str {
        self.name()
    }
}

/// Selectable scheduling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerKind {
    /// First-Come-First-Served.
    Fcfs,
    /// Round Robin.
    #[serde(rename = "rr")]
    RoundRobin,
}

impl SchedulerKind {
    /// Algorithm implementing this policy.
    pub fn algorithm(self) -> &'static dyn SchedulingAlgorithm {
        match self {
            Self::Fcfs => &Fcfs,
            Self::RoundRobin => &RoundRobin,
        }
    }

    /// Runs the policy against the model.
    pub fn run(self, model: &mut OperatingSystemModel, processes: &mut ProcessMap) -> Result<()> {
        self.algorithm().run(model, processes)
    }
}

impl fmt::Display for SchedulerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fcfs => "fcfs",
            Self::RoundRobin => "rr",
        })
    }
}

impl FromStr for SchedulerKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fcfs" => Ok(Self::Fcfs),
            "rr" | "round-robin" | "round_robin" => Ok(Self::RoundRobin),
            other => Err(SimError::invalid_config(format!(
                "unknown scheduler '{other}' (expected 'fcfs' or 'rr')"
            ))),
        }
    }
}

/// Checks that every ready entry has its own process.
///
/// Fails with `ProcessNotFound` for the first ready entry lacking a process,
/// then with `Validation` listing every id that appears twice in the ready
/// list.
fn ensure_ready_processes(model: &OperatingSystemModel, processes: &ProcessMap) -> Result<()> {
    if let Some(missing) = model
        .ready_list()
        .find(|e| !processes.contains_key(&e.process_id()))
    {
        return Err(SimError::ProcessNotFound {
            process_id: missing.process_id(),
        });
    }

    let mut seen = HashSet::new();
    let duplicates: Vec<ValidationError> = model
        .ready_list()
        .filter(|e| !seen.insert(e.process_id()))
        .map(|e| {
            ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Process {} is ready more than once", e.process_id()),
            )
        })
        .collect();
    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(SimError::Validation(duplicates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProcessState;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("fcfs".parse::<SchedulerKind>().unwrap(), SchedulerKind::Fcfs);
        assert_eq!("RR".parse::<SchedulerKind>().unwrap(), SchedulerKind::RoundRobin);
        assert!("sjf".parse::<SchedulerKind>().is_err());
        assert_eq!(SchedulerKind::RoundRobin.to_string(), "rr");
    }

    #[test]
    fn test_kind_serde_names() {
        let json = serde_json::to_string(&SchedulerKind::RoundRobin).unwrap();
        assert_eq!(json, "\"rr\"");
        let kind: SchedulerKind = serde_json::from_str("\"fcfs\"").unwrap();
        assert_eq!(kind, SchedulerKind::Fcfs);
    }

    #[test]
    fn test_algorithm_names() {
        assert_eq!(SchedulerKind::Fcfs.algorithm().name(), "FCFS");
        assert_eq!(SchedulerKind::RoundRobin.algorithm().name(), "RR");
        assert_eq!(
            SchedulerKind::RoundRobin.algorithm().description(),
            "Round Robin"
        );
    }

    #[test]
    fn test_missing_process_detected() {
        let mut os = OperatingSystemModel::new(100, 0);
        os.add_process(1, ProcessState::Ready, 0);
        os.add_process(2, ProcessState::Ready, 0);
        let mut processes = ProcessMap::new();
        processes.insert(1, Process::from_mnemonics(1, &["ADD"]));

        match ensure_ready_processes(&os, &processes) {
            Err(SimError::ProcessNotFound { process_id }) => assert_eq!(process_id, 2),
            other => panic!("expected ProcessNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_ready_id_detected() {
        let mut os = OperatingSystemModel::new(100, 0);
        os.add_process(1, ProcessState::Ready, 0);
        os.add_process(2, ProcessState::Ready, 0);
        os.add_process(1, ProcessState::Ready, 0);
        let mut processes = ProcessMap::new();
        processes.insert(1, Process::from_mnemonics(1, &["ADD"]));
        processes.insert(2, Process::from_mnemonics(2, &["ADD"]));

        match ensure_ready_processes(&os, &processes) {
            Err(SimError::Validation(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].kind, ValidationErrorKind::DuplicateId);
                assert!(errors[0].message.contains('1'));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_kind_run_dispatches() {
        let mut os = OperatingSystemModel::new(100, 0);
        os.add_process(1, ProcessState::Ready, 0);
        let mut processes = ProcessMap::new();
        processes.insert(1, Process::from_mnemonics(1, &["LOAD", "STORE"]));

        SchedulerKind::RoundRobin.run(&mut os, &mut processes).unwrap();
        assert_eq!(os.current_time(), 30);
        assert!(os.all_done());
    }
}
