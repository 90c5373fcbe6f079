//! Simulation domain models.
//!
//! The process/instruction cost model and the operating system state that
//! schedulers drive.
//!
//! # Domain Mappings
//!
//! | sched-sim | Classic OS term |
//! |-----------|-----------------|
//! | Process | Program image + program counter |
//! | ProcessTableEntry | Process control block |
//! | OperatingSystemModel | Kernel scheduling state |

mod instruction;
mod operating_system;
mod process;
mod process_table;

pub use instruction::{
    instruction_cost, is_known_instruction, InstructionClass, CPU_INSTRUCTIONS,
    INSTRUCTION_COSTS, MEMORY_INSTRUCTIONS,
};
pub use operating_system::{
    OperatingSystemModel, DEFAULT_CONTEXT_SWITCH_PENALTY, DEFAULT_QUANTUM,
};
pub use process::{Process, ProcessId};
pub use process_table::{ProcessState, ProcessTableEntry};
