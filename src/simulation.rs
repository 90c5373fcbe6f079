//! Single-run simulation driver.
//!
//! Wires the pieces together the way every caller needs them:
//! 1. Build an operating system model from a [`SimulationConfig`].
//! 2. Admit each process as ready at the current clock, in ascending id order.
//! 3. Validate the admission.
//! 4. Run exactly one scheduler.
//! 5. Derive KPIs from the finished process table.

use log::info;

use crate::config::SimulationConfig;
use crate::error::{Result, SimError};
use crate::models::{OperatingSystemModel, Process, ProcessState};
use crate::scheduler::{ProcessMap, SchedulerKind, SimulationKpi};
use crate::validation::validate_admission;

/// Result of one simulation run.
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    /// Policy that ran.
    pub scheduler: SchedulerKind,
    /// Model after the scheduler finished.
    pub model: OperatingSystemModel,
    /// Metrics derived from the model.
    pub kpi: SimulationKpi,
}

/// Runs complete simulations for a fixed configuration.
///
/// # Example
/// ```
/// use sched_sim::config::SimulationConfig;
/// use sched_sim::models::Process;
/// use sched_sim::scheduler::SchedulerKind;
/// use sched_sim::simulation::Simulation;
///
/// let config = SimulationConfig::new().with_quantum(200).with_context_switch_penalty(0);
/// let processes = vec![
///     Process::from_mnemonics(1, &["LOAD", "ADD", "STORE"]),
///     Process::from_mnemonics(2, &["ADD", "SUB", "ADD", "STORE"]),
/// ];
///
/// let outcome = Simulation::new(config)
///     .run(SchedulerKind::RoundRobin, processes)
///     .unwrap();
/// assert_eq!(outcome.kpi.total_time, 54);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Simulation {
    config: SimulationConfig,
}

impl Simulation {
    /// Creates a driver for the given configuration.
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Admits `processes`, runs `scheduler`, and returns the outcome.
    ///
    /// # Errors
    /// - [`SimError::InvalidConfig`] for a zero quantum.
    /// - [`SimError::Validation`] for duplicate process ids.
    pub fn run(&self, scheduler: SchedulerKind, processes: Vec<Process>) -> Result<SimulationOutcome> {
        self.config.validate()?;

        let mut model =
            OperatingSystemModel::new(self.config.quantum, self.config.context_switch_penalty);
        let mut ids: Vec<_> = processes.iter().map(Process::id).collect();
        ids.sort_unstable();
        for &id in &ids {
            model.add_process(id, ProcessState::Ready, model.current_time());
        }

        let mut map = ProcessMap::with_capacity(processes.len());
        for process in processes {
            map.insert(process.id(), process);
        }

        validate_admission(&model, &map).map_err(SimError::Validation)?;

        scheduler.run(&mut model, &mut map)?;

        let kpi = SimulationKpi::calculate(&model);
        info!(
            "{} run: {} process(es), total {} ns, avg turnaround {:.1} ns, avg waiting {:.1} ns",
            scheduler.algorithm().name(),
            kpi.completed_count(),
            kpi.total_time,
            kpi.avg_turnaround_time,
            kpi.avg_waiting_time
        );

        Ok(SimulationOutcome {
            scheduler,
            model,
            kpi,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn programs() -> Vec<Process> {
        vec![
            Process::from_mnemonics(2, &["LOAD", "MUL", "DIV"]),
            Process::from_mnemonics(1, &["LOAD", "ADD", "STORE"]),
        ]
    }

    #[test]
    fn test_admission_in_id_order() {
        let config = SimulationConfig::new().with_context_switch_penalty(0);
        let outcome = Simulation::new(config)
            .run(SchedulerKind::Fcfs, programs())
            .unwrap();

        let order: Vec<_> = outcome
            .model
            .process_table()
            .iter()
            .map(|e| e.process_id())
            .collect();
        assert_eq!(order, vec![1, 2]);
        assert_eq!(outcome.kpi.total_time, 51);
        assert_eq!(outcome.model.entry(1).unwrap().end_time(), Some(31));
    }

    #[test]
    fn test_default_penalty_applied() {
        let outcome = Simulation::default()
            .run(SchedulerKind::Fcfs, programs())
            .unwrap();
        assert_eq!(outcome.kpi.total_time, 71);
        assert_eq!(outcome.scheduler, SchedulerKind::Fcfs);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let processes = vec![
            Process::from_mnemonics(1, &["ADD"]),
            Process::from_mnemonics(1, &["SUB"]),
        ];
        let err = Simulation::default()
            .run(SchedulerKind::RoundRobin, processes)
            .unwrap_err();
        assert!(matches!(err, SimError::Validation(_)));
    }

    #[test]
    fn test_zero_quantum_rejected() {
        let config = SimulationConfig::new().with_quantum(0);
        let err = Simulation::new(config)
            .run(SchedulerKind::RoundRobin, programs())
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig { .. }));
    }

    #[test]
    fn test_no_processes() {
        let outcome = Simulation::default()
            .run(SchedulerKind::RoundRobin, Vec::new())
            .unwrap();
        assert_eq!(outcome.kpi.total_time, 0);
        assert_eq!(outcome.kpi.completed_count(), 0);
    }
}
