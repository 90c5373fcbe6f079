//! Instruction cost table.
//!
//! Every instruction executes atomically in a fixed number of time units
//! (nanoseconds). Names outside the table are treated as free no-ops.

/// Fixed execution cost per mnemonic (ns).
pub const INSTRUCTION_COSTS: [(&str, u64); 6] = [
    ("LOAD", 10),
    ("STORE", 20),
    ("ADD", 1),
    ("SUB", 1),
    ("MUL", 5),
    ("DIV", 5),
];

/// Arithmetic instructions.
pub const CPU_INSTRUCTIONS: [&str; 4] = ["ADD", "SUB", "MUL", "DIV"];

/// Memory-access instructions.
pub const MEMORY_INSTRUCTIONS: [&str; 2] = ["LOAD", "STORE"];

/// Broad instruction category used by the workload generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionClass {
    /// Arithmetic (ADD, SUB, MUL, DIV).
    Cpu,
    /// Memory access (LOAD, STORE).
    Memory,
}

impl InstructionClass {
    /// Mnemonics belonging to this class.
    pub fn mnemonics(self) -> &'static [&'static str] {
        match self {
            Self::Cpu => &CPU_INSTRUCTIONS,
            Self::Memory => &MEMORY_INSTRUCTIONS,
        }
    }

    /// Classifies a mnemonic. `None` for names outside the cost table.
    pub fn of(name: &str) -> Option<Self> {
        if CPU_INSTRUCTIONS.contains(&name) {
            Some(Self::Cpu)
        } else if MEMORY_INSTRUCTIONS.contains(&name) {
            Some(Self::Memory)
        } else {
            None
        }
    }
}

/// Cost of an instruction in ns. Unknown names cost 0.
///
/// ```
/// use sched_sim::models::instruction_cost;
///
/// assert_eq!(instruction_cost("STORE"), 20);
/// assert_eq!(instruction_cost("NOP"), 0);
/// ```
pub fn instruction_cost(name: &str) -> u64 {
    INSTRUCTION_COSTS
        .iter()
        .find(|(mnemonic, _)| *mnemonic == name)
        .map(|&(_, cost)| cost)
        .unwrap_or(0)
}

/// Whether the mnemonic appears in the cost table.
pub fn is_known_instruction(name: &str) -> bool {
    INSTRUCTION_COSTS.iter().any(|(mnemonic, _)| *mnemonic == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_costs() {
        assert_eq!(instruction_cost("LOAD"), 10);
        assert_eq!(instruction_cost("STORE"), 20);
        assert_eq!(instruction_cost("ADD"), 1);
        assert_eq!(instruction_cost("SUB"), 1);
        assert_eq!(instruction_cost("MUL"), 5);
        assert_eq!(instruction_cost("DIV"), 5);
    }

    #[test]
    fn test_unknown_is_free() {
        assert_eq!(instruction_cost("FOO"), 0);
        assert_eq!(instruction_cost(""), 0);
        // Lookup is case-sensitive
        assert_eq!(instruction_cost("load"), 0);
        assert!(!is_known_instruction("FOO"));
    }

    #[test]
    fn test_classes_cover_table() {
        for (name, _) in INSTRUCTION_COSTS {
            assert!(InstructionClass::of(name).is_some(), "{name} unclassified");
        }
        assert_eq!(InstructionClass::of("MUL"), Some(InstructionClass::Cpu));
        assert_eq!(InstructionClass::of("LOAD"), Some(InstructionClass::Memory));
        assert_eq!(InstructionClass::of("HALT"), None);
        assert_eq!(InstructionClass::Cpu.mnemonics().len(), 4);
        assert_eq!(InstructionClass::Memory.mnemonics().len(), 2);
    }
}
