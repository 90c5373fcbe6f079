//! CPU scheduling simulator.
//!
//! Runs synthetic processes, made of instructions with fixed costs, through
//! First-Come-First-Served and Round-Robin schedulers on a single simulated
//! CPU, and compares the resulting turnaround and waiting times.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Process`, `ProcessTableEntry`,
//!   `OperatingSystemModel`, instruction cost table
//! - **`scheduler`**: FCFS and Round-Robin engines, run KPIs
//! - **`workload`**: Random instruction streams and instruction files
//! - **`validation`**: Admission checks (duplicate ids, missing processes)
//! - **`simulation`**: Single-run driver (admit, validate, schedule, measure)
//! - **`sweep`**: Parameter sweep over workload mix and quantum, reports
//! - **`config`**: Simulation and sweep knobs, JSON loading
//!
//! # Execution model
//!
//! Fully sequential and deterministic. A scheduler borrows the model
//! exclusively and runs to completion; the only randomness is the workload
//! generator's RNG, which callers seed.
//!
//! # References
//!
//! - Silberschatz et al. (2018), "Operating System Concepts", Ch. 5
//! - Tanenbaum & Bos (2014), "Modern Operating Systems", Ch. 2.4

pub mod config;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod simulation;
pub mod sweep;
pub mod validation;
pub mod workload;

pub use error::{Result, SimError};
