//! Run quality metrics (KPIs).
//!
//! Computes per-process and aggregate performance indicators from a
//! finished operating system model.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total time | Final simulated clock |
//! | Turnaround | `end_time - start_time` |
//! | Waiting | `turnaround - cpu_time` |
//! | CPU utilization | `Σ cpu_time / total time` |
//!
//! Entries that have not completed carry no turnaround and are skipped.

use serde::{Deserialize, Serialize};

use crate::models::{OperatingSystemModel, ProcessId, ProcessTableEntry};

/// Timing of one completed process (ns).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessMetrics {
    /// Process identifier.
    pub process_id: ProcessId,
    /// Completion minus admission.
    pub turnaround_time: u64,
    /// Time spent executing instructions.
    pub cpu_time: u64,
    /// Turnaround minus CPU time.
    pub waiting_time: u64,
}

impl ProcessMetrics {
    /// Derives metrics from an entry. `None` until the entry is done.
    pub fn from_entry(entry: &ProcessTableEntry) -> Option<Self> {
        Some(Self {
            process_id: entry.process_id(),
            turnaround_time: entry.turnaround_time()?,
            cpu_time: entry.cpu_time(),
            waiting_time: entry.waiting_time()?,
        })
    }
}

/// Aggregate indicators for one simulation run.
///
/// Averages are over completed processes; all times are in ns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationKpi {
    /// Final simulated clock.
    pub total_time: u64,
    /// Per-process metrics in process-table order.
    pub processes: Vec<ProcessMetrics>,
    /// Mean turnaround time.
    pub avg_turnaround_time: f64,
    /// Mean waiting time.
    pub avg_waiting_time: f64,
    /// Mean CPU time.
    pub avg_cpu_time: f64,
    /// Fraction of the total time spent executing instructions (0.0..1.0).
    pub cpu_utilization: f64,
}

impl SimulationKpi {
    /// Computes KPIs from a model after its scheduler has run.
    pub fn calculate(model: &OperatingSystemModel) -> Self {
        let processes: Vec<ProcessMetrics> = model
            .process_table()
            .iter()
            .filter_map(ProcessMetrics::from_entry)
            .collect();

        let total_time = model.current_time();
        let count = processes.len();
        let mean = |f: fn(&ProcessMetrics) -> u64| -> f64 {
            if count == 0 {
                0.0
            } else {
                processes.iter().map(f).sum::<u64>() as f64 / count as f64
            }
        };

        let avg_turnaround_time = mean(|m| m.turnaround_time);
        let avg_waiting_time = mean(|m| m.waiting_time);
        let avg_cpu_time = mean(|m| m.cpu_time);

        let busy: u64 = processes.iter().map(|m| m.cpu_time).sum();
        let cpu_utilization = if total_time == 0 {
            0.0
        } else {
            busy as f64 / total_time as f64
        };

        Self {
            total_time,
            processes,
            avg_turnaround_time,
            avg_waiting_time,
            avg_cpu_time,
            cpu_utilization,
        }
    }

    /// Metrics for one process.
    pub fn process(&self, process_id: ProcessId) -> Option<&ProcessMetrics> {
        self.processes.iter().find(|m| m.process_id == process_id)
    }

    /// Number of completed processes.
    pub fn completed_count(&self) -> usize {
        self.processes.len()
    }
}
