//! Simulation and sweep configuration.
//!
//! Both configs deserialize from JSON with every field optional; missing
//! fields take the defaults below.
//!
//! | Field | Default |
//! |-------|---------|
//! | `quantum` | 500 ns |
//! | `context_switch_penalty` | 20 ns |
//! | sweep `cpu_probabilities` | 0.0, 0.1, ..., 0.9 |
//! | sweep `quanta` | 100, 200, ..., 900 ns |
//! | sweep `num_processes` | 16 |
//! | sweep `num_instructions` | 32000 |
//! | sweep `fcfs_quantum` | 500 ns |

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Result, SimError};
use crate::models::{DEFAULT_CONTEXT_SWITCH_PENALTY, DEFAULT_QUANTUM};

/// Knobs fixed for the lifetime of one operating system model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Round-Robin time slice (ns). Must be positive.
    pub quantum: u64,
    /// Cost of each context switch (ns).
    pub context_switch_penalty: u64,
}

impl SimulationConfig {
    /// Creates a config with default knobs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the quantum.
    pub fn with_quantum(mut self, quantum: u64) -> Self {
        self.quantum = quantum;
        self
    }

    /// Sets the context-switch penalty.
    pub fn with_context_switch_penalty(mut self, penalty: u64) -> Self {
        self.context_switch_penalty = penalty;
        self
    }

    /// Rejects a zero quantum.
    pub fn validate(&self) -> Result<()> {
        if self.quantum == 0 {
            return Err(SimError::invalid_config("quantum must be positive"));
        }
        Ok(())
    }

    /// Loads and validates a config from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config: Self = read_json(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            quantum: DEFAULT_QUANTUM,
            context_switch_penalty: DEFAULT_CONTEXT_SWITCH_PENALTY,
        }
    }
}

/// Parameter grid for a workload sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// CPU-instruction probabilities to evaluate, each in `[0, 1]`.
    pub cpu_probabilities: Vec<f64>,
    /// Round-Robin quanta to evaluate (ns).
    pub quanta: Vec<u64>,
    /// Processes per simulated workload.
    pub num_processes: u32,
    /// Instructions per generated process.
    pub num_instructions: usize,
    /// Quantum handed to the model for FCFS runs (unused by FCFS itself).
    pub fcfs_quantum: u64,
    /// Context-switch penalty for every run (ns).
    pub context_switch_penalty: u64,
    /// RNG seed; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl SweepConfig {
    /// Creates the default sweep grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the CPU-instruction probabilities.
    pub fn with_cpu_probabilities(mut self, probabilities: Vec<f64>) -> Self {
        self.cpu_probabilities = probabilities;
        self
    }

    /// Sets the Round-Robin quanta.
    pub fn with_quanta(mut self, quanta: Vec<u64>) -> Self {
        self.quanta = quanta;
        self
    }

    /// Sets the workload size.
    pub fn with_workload(mut self, num_processes: u32, num_instructions: usize) -> Self {
        self.num_processes = num_processes;
        self.num_instructions = num_instructions;
        self
    }

    /// Sets the context-switch penalty.
    pub fn with_context_switch_penalty(mut self, penalty: u64) -> Self {
        self.context_switch_penalty = penalty;
        self
    }

    /// Fixes the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks ranges, probabilities and workload size.
    pub fn validate(&self) -> Result<()> {
        if self.cpu_probabilities.is_empty() {
            return Err(SimError::invalid_config("cpu_probabilities is empty"));
        }
        if let Some(&bad) = self
            .cpu_probabilities
            .iter()
            .find(|p| !(0.0..=1.0).contains(*p))
        {
            return Err(SimError::InvalidProbability { value: bad });
        }
        if self.quanta.is_empty() {
            return Err(SimError::invalid_config("quanta is empty"));
        }
        if self.quanta.contains(&0) || self.fcfs_quantum == 0 {
            return Err(SimError::invalid_config("quanta must be positive"));
        }
        if self.num_processes == 0 {
            return Err(SimError::invalid_config("num_processes must be positive"));
        }
        Ok(())
    }

    /// Loads and validates a sweep config from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config: Self = read_json(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            cpu_probabilities: (0..10u8).map(|i| f64::from(i) / 10.0).collect(),
            quanta: (1..10).map(|i| i * 100).collect(),
            num_processes: 16,
            num_instructions: 32_000,
            fcfs_quantum: DEFAULT_QUANTUM,
            context_switch_penalty: DEFAULT_CONTEXT_SWITCH_PENALTY,
            seed: None,
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).map_err(|e| SimError::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| {
        SimError::invalid_config(format!("{}: {e}", path.display()))
    })
}
