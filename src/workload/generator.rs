//! Random workload generation.
//!
//! Produces instruction streams with a tunable mix of CPU (ADD, SUB, MUL,
//! DIV) and memory (LOAD, STORE) instructions. Within a class every
//! mnemonic is equally likely.
//!
//! The RNG is supplied by the caller so runs can be reproduced from a seed.

use rand::Rng;

use crate::error::{Result, SimError};
use crate::models::{InstructionClass, Process, ProcessId};

/// Generates `num_instructions` mnemonics.
///
/// Each instruction is drawn from the CPU class with probability
/// `cpu_probability` and from the memory class otherwise. `1.0` yields only
/// CPU instructions, `0.0` only memory instructions.
///
/// # Errors
/// [`SimError::InvalidProbability`] if `cpu_probability` is outside `[0, 1]`.
pub fn generate_instructions<R: Rng>(
    rng: &mut R,
    num_instructions: usize,
    cpu_probability: f64,
) -> Result<Vec<String>> {
    check_probability(cpu_probability)?;

    let instructions = (0..num_instructions)
        .map(|_| {
            let class = if rng.random::<f64>() < cpu_probability {
                InstructionClass::Cpu
            } else {
                InstructionClass::Memory
            };
            let pool = class.mnemonics();
            pool[rng.random_range(0..pool.len())].to_string()
        })
        .collect();
    Ok(instructions)
}

/// Creates a process with a generated instruction stream.
///
/// # Example
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
/// use sched_sim::workload::create_process;
///
/// let mut rng = SmallRng::seed_from_u64(7);
/// let process = create_process(&mut rng, 42, 10, 0.7).unwrap();
/// assert_eq!(process.id(), 42);
/// assert_eq!(process.instructions().len(), 10);
/// assert_eq!(process.program_counter(), 0);
/// ```
pub fn create_process<R: Rng>(
    rng: &mut R,
    process_id: ProcessId,
    num_instructions: usize,
    cpu_probability: f64,
) -> Result<Process> {
    let instructions = generate_instructions(rng, num_instructions, cpu_probability)?;
    Ok(Process::new(process_id, instructions))
}

fn check_probability(p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(SimError::InvalidProbability { value: p })
    }
}
