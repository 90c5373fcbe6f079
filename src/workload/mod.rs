//! Workload sources: random generation and instruction files.

mod generator;
mod loader;

pub use generator::{create_process, generate_instructions};
pub use loader::{load_process, parse_instructions};
