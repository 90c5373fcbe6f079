//! Parameter sweep over workload mix and quantum.
//!
//! # Grid
//!
//! - FCFS once per CPU-instruction probability.
//! - Round Robin once per (quantum, probability) pair.
//!
//! Every run simulates a freshly generated workload. All workloads come
//! from one `SmallRng` seeded from the config (or from the OS, in which case
//! the drawn seed is recorded in the report so the sweep can be replayed).
//!
//! # Report
//!
//! [`SweepReport`] holds one [`SweepPoint`] per run and renders to JSON,
//! CSV, or a plain-text summary table.

use log::info;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{SimulationConfig, SweepConfig};
use crate::error::{Result, SimError};
use crate::scheduler::{SchedulerKind, SimulationKpi};
use crate::simulation::Simulation;
use crate::workload::create_process;

/// File name of the JSON report.
pub const JSON_REPORT: &str = "sweep_report.json";

/// File name of the CSV report.
pub const CSV_REPORT: &str = "sweep_report.csv";

/// Aggregate result of one sweep run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    /// Policy that ran.
    pub scheduler: SchedulerKind,
    /// Quantum configured on the model (ns).
    pub quantum: u64,
    /// CPU-instruction probability of the workload.
    pub cpu_probability: f64,
    /// Final simulated clock (ns).
    pub total_time: u64,
    /// Mean turnaround time (ns).
    pub avg_turnaround_time: f64,
    /// Mean waiting time (ns).
    pub avg_waiting_time: f64,
    /// Mean CPU time (ns).
    pub avg_cpu_time: f64,
    /// Fraction of the run spent executing instructions.
    pub cpu_utilization: f64,
}

impl SweepPoint {
    fn from_kpi(scheduler: SchedulerKind, quantum: u64, cpu_probability: f64, kpi: &SimulationKpi) -> Self {
        Self {
            scheduler,
            quantum,
            cpu_probability,
            total_time: kpi.total_time,
            avg_turnaround_time: kpi.avg_turnaround_time,
            avg_waiting_time: kpi.avg_waiting_time,
            avg_cpu_time: kpi.avg_cpu_time,
            cpu_utilization: kpi.cpu_utilization,
        }
    }
}

/// All results of a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Grid that produced the report.
    pub config: SweepConfig,
    /// Seed actually used for workload generation.
    pub seed: u64,
    /// One point per run, FCFS first, then RR by quantum.
    pub points: Vec<SweepPoint>,
}

impl SweepReport {
    /// FCFS points in probability order.
    pub fn fcfs_points(&self) -> impl Iterator<Item = &SweepPoint> + '_ {
        self.points
            .iter()
            .filter(|p| p.scheduler == SchedulerKind::Fcfs)
    }

    /// Round-Robin points for one quantum, in probability order.
    pub fn rr_points(&self, quantum: u64) -> impl Iterator<Item = &SweepPoint> + '_ {
        self.points
            .iter()
            .filter(move |p| p.scheduler == SchedulerKind::RoundRobin && p.quantum == quantum)
    }

    /// Writes `sweep_report.json` into `dir`, creating it if needed.
    pub fn write_json(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = prepare(dir.as_ref(), JSON_REPORT)?;
        let json = serde_json::to_string_pretty(self).map_err(SimError::Serialization)?;
        fs::write(&path, json).map_err(|e| SimError::io(&path, e))?;
        Ok(path)
    }

    /// Writes `sweep_report.csv` into `dir`, creating it if needed.
    pub fn write_csv(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = prepare(dir.as_ref(), CSV_REPORT)?;
        fs::write(&path, self.to_csv()).map_err(|e| SimError::io(&path, e))?;
        Ok(path)
    }

    /// CSV rendering, one row per point.
    pub fn to_csv(&self) -> String {
        CsvTable(self).to_string()
    }

    /// Text table: average turnaround per probability, one column per policy.
    pub fn render_summary(&self) -> String {
        SummaryTable(self).to_string()
    }
}

struct CsvTable<'a>(&'a SweepReport);

impl fmt::Display for CsvTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "scheduler,quantum,cpu_probability,total_time,avg_turnaround_time,avg_waiting_time,avg_cpu_time,cpu_utilization"
        )?;
        for p in &self.0.points {
            writeln!(
                f,
                "{},{},{:.1},{},{:.3},{:.3},{:.3},{:.6}",
                p.scheduler,
                p.quantum,
                p.cpu_probability,
                p.total_time,
                p.avg_turnaround_time,
                p.avg_waiting_time,
                p.avg_cpu_time,
                p.cpu_utilization
            )?;
        }
        Ok(())
    }
}

struct SummaryTable<'a>(&'a SweepReport);

impl fmt::Display for SummaryTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        write!(f, "{:>8} {:>12}", "cpu_prob", "FCFS")?;
        for q in &report.config.quanta {
            write!(f, " {:>12}", format!("RR q={q}"))?;
        }
        writeln!(f)?;

        for &prob in &report.config.cpu_probabilities {
            write!(f, "{prob:>8.1}")?;
            let fcfs = report
                .fcfs_points()
                .find(|p| p.cpu_probability == prob)
                .map(|p| p.avg_turnaround_time);
            write_cell(f, fcfs)?;
            for &q in &report.config.quanta {
                let rr = report
                    .rr_points(q)
                    .find(|p| p.cpu_probability == prob)
                    .map(|p| p.avg_turnaround_time);
                write_cell(f, rr)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn write_cell(f: &mut fmt::Formatter<'_>, value: Option<f64>) -> fmt::Result {
    match value {
        Some(v) => write!(f, " {v:>12.1}"),
        None => write!(f, " {:>12}", "-"),
    }
}

fn prepare(dir: &Path, file: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| SimError::io(dir, e))?;
    Ok(dir.join(file))
}

/// Runs the sweep grid.
#[derive(Debug, Clone)]
pub struct ParameterSweep {
    config: SweepConfig,
}

impl ParameterSweep {
    /// Creates a sweep over the given grid.
    pub fn new(config: SweepConfig) -> Self {
        Self { config }
    }

    /// Runs every grid point and collects the report.
    ///
    /// # Errors
    /// Invalid grids are rejected before any simulation runs.
    pub fn run(&self) -> Result<SweepReport> {
        self.config.validate()?;

        let seed = self.config.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut points = Vec::with_capacity(
            self.config.cpu_probabilities.len() * (self.config.quanta.len() + 1),
        );
        info!("running sweep with seed {seed}");

        for &prob in &self.config.cpu_probabilities {
            info!("[FCFS] starting simulation for cpu_probability = {prob:.1}");
            let point = self.run_point(&mut rng, SchedulerKind::Fcfs, self.config.fcfs_quantum, prob)?;
            info!(
                "[FCFS] finished cpu_probability = {prob:.1}; total time {} ns",
                point.total_time
            );
            points.push(point);
        }

        for &quantum in &self.config.quanta {
            for &prob in &self.config.cpu_probabilities {
                info!("[RR] starting simulation for quantum = {quantum} ns, cpu_probability = {prob:.1}");
                let point = self.run_point(&mut rng, SchedulerKind::RoundRobin, quantum, prob)?;
                info!(
                    "[RR] finished quantum = {quantum} ns, cpu_probability = {prob:.1}; total time {} ns",
                    point.total_time
                );
                points.push(point);
            }
        }

        Ok(SweepReport {
            config: self.config.clone(),
            seed,
            points,
        })
    }

    fn run_point(
        &self,
        rng: &mut SmallRng,
        scheduler: SchedulerKind,
        quantum: u64,
        cpu_probability: f64,
    ) -> Result<SweepPoint> {
        let processes = (1..=self.config.num_processes)
            .map(|id| create_process(&mut *rng, id, self.config.num_instructions, cpu_probability))
            .collect::<Result<Vec<_>>>()?;

        let config = SimulationConfig::new()
            .with_quantum(quantum)
            .with_context_switch_penalty(self.config.context_switch_penalty);
        let outcome = Simulation::new(config).run(scheduler, processes)?;

        Ok(SweepPoint::from_kpi(scheduler, quantum, cpu_probability, &outcome.kpi))
    }
}
