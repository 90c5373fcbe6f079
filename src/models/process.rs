//! Process model.
//!
//! A process is a straight-line program: an ordered list of instruction
//! mnemonics and a program counter. It carries no scheduling metadata; that
//! lives in the matching [`ProcessTableEntry`](super::ProcessTableEntry).

use serde::{Deserialize, Serialize};

use super::instruction::instruction_cost;
use crate::error::SimError;

/// Process identifier shared by a [`Process`] and its table entry.
pub type ProcessId = u32;

/// A sequential program over costed instructions.
///
/// # Invariant
/// `0 <= pc <= instructions.len()`, and the process is finished exactly when
/// `pc == instructions.len()`. The program counter only moves forward, one
/// instruction per [`execute_next_instruction`](Self::execute_next_instruction).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProcessRecord")]
pub struct Process {
    id: ProcessId,
    instructions: Vec<String>,
    pc: usize,
}

/// Unchecked wire form of [`Process`].
#[derive(Deserialize)]
struct ProcessRecord {
    id: ProcessId,
    instructions: Vec<String>,
    #[serde(default)]
    pc: usize,
}

impl TryFrom<ProcessRecord> for Process {
    type Error = SimError;

    fn try_from(record: ProcessRecord) -> Result<Self, Self::Error> {
        if record.pc > record.instructions.len() {
            return Err(SimError::invalid_state(format!(
                "process {}: program counter {} past end of {} instruction(s)",
                record.id,
                record.pc,
                record.instructions.len()
            )));
        }
        Ok(Self {
            id: record.id,
            instructions: record.instructions,
            pc: record.pc,
        })
    }
}

impl Process {
    /// Creates a process positioned at its first instruction.
    pub fn new(id: ProcessId, instructions: Vec<String>) -> Self {
        Self {
            id,
            instructions,
            pc: 0,
        }
    }

    /// Creates a process from string slices.
    pub fn from_mnemonics<S: AsRef<str>>(id: ProcessId, mnemonics: &[S]) -> Self {
        Self::new(id, mnemonics.iter().map(|m| m.as_ref().to_string()).collect())
    }

    /// Process identifier.
    pub fn id(&self) -> ProcessId {
        self.id
    }

    /// Full instruction list.
    pub fn instructions(&self) -> &[String] {
        &self.instructions
    }

    /// Index of the next instruction to execute.
    pub fn program_counter(&self) -> usize {
        self.pc
    }

    /// Number of instructions not yet executed.
    pub fn remaining_instructions(&self) -> usize {
        self.instructions.len().saturating_sub(self.pc)
    }

    /// Whether every instruction has executed.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.pc >= self.instructions.len()
    }

    /// Cost of the next instruction without executing it. 0 when finished.
    pub fn peek_next_instruction_cost(&self) -> u64 {
        match self.instructions.get(self.pc) {
            Some(instr) => instruction_cost(instr.trim()),
            None => 0,
        }
    }

    /// Executes the next instruction and returns its cost.
    ///
    /// Returns 0 and leaves the program counter untouched once finished.
    pub fn execute_next_instruction(&mut self) -> u64 {
        if self.is_finished() {
            return 0;
        }
        let cost = self.peek_next_instruction_cost();
        self.pc += 1;
        cost
    }

    /// Sum of all instruction costs, regardless of progress.
    pub fn total_cost(&self) -> u64 {
        self.instructions
            .iter()
            .map(|i| instruction_cost(i.trim()))
            .sum()
    }
}
