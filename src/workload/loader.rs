//! Instruction-file loading.
//!
//! Format: one mnemonic per line. Surrounding whitespace is trimmed and
//! blank lines are dropped. Unknown mnemonics are kept (they execute as free
//! no-ops) but reported at `warn` level.

use log::{debug, warn};
use std::fs;
use std::path::Path;

use crate::error::{Result, SimError};
use crate::models::{is_known_instruction, Process, ProcessId};

/// Parses instruction text into mnemonics.
pub fn parse_instructions(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Loads a process from an instruction file.
///
/// # Errors
/// [`SimError::Io`] if the file cannot be read.
pub fn load_process(path: impl AsRef<Path>, process_id: ProcessId) -> Result<Process> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| SimError::io(path, e))?;
    let instructions = parse_instructions(&text);

    let unknown = instructions
        .iter()
        .filter(|i| !is_known_instruction(i))
        .count();
    if unknown > 0 {
        warn!(
            "{}: {unknown} unknown instruction(s) will execute at zero cost",
            path.display()
        );
    }
    debug!(
        "loaded process {process_id} from {} ({} instructions)",
        path.display(),
        instructions.len()
    );

    Ok(Process::new(process_id, instructions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_skips_blank_lines() {
        let instrs = parse_instructions("LOAD\n\n  ADD  \r\n\t\nSTORE\n");
        assert_eq!(instrs, vec!["LOAD", "ADD", "STORE"]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_instructions("").is_empty());
        assert!(parse_instructions("\n \n").is_empty());
    }

    #[test]
    fn test_load_process() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("process_a.txt");
        fs::write(&path, "LOAD\nADD\nFOO\nSTORE\n").unwrap();

        let p = load_process(&path, 4).unwrap();
        assert_eq!(p.id(), 4);
        assert_eq!(p.instructions().len(), 4);
        assert_eq!(p.total_cost(), 31);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = load_process(dir.path().join("nope.txt"), 1).unwrap_err();
        assert!(matches!(err, SimError::Io { .. }));
    }
}
