//! Admission validation.
//!
//! Checks the structural integrity of an operating system model and its
//! process map before a scheduler runs. Detects:
//! - Duplicate process ids in the process table
//! - Ready entries without a backing process
//! - Processes whose id disagrees with their map key
//! - A zero quantum
//!
//! All problems are collected rather than stopping at the first.

use std::collections::HashSet;

use crate::models::OperatingSystemModel;
use crate::scheduler::ProcessMap;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two table entries share the same process id.
    DuplicateId,
    /// A ready entry has no process in the map.
    MissingProcess,
    /// A map key differs from the id of the process stored under it.
    MismatchedId,
    /// The Round-Robin quantum is zero.
    InvalidQuantum,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a model and its process map prior to scheduling.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_admission(model: &OperatingSystemModel, processes: &ProcessMap) -> ValidationResult {
    let mut errors = Vec::new();

    if model.quantum() == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidQuantum,
            "Quantum must be positive",
        ));
    }

    let mut seen = HashSet::new();
    for entry in model.process_table() {
        if !seen.insert(entry.process_id()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate process ID: {}", entry.process_id()),
            ));
        }
    }

    for entry in model.ready_list() {
        if !processes.contains_key(&entry.process_id()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingProcess,
                format!("Ready entry {} has no process", entry.process_id()),
            ));
        }
    }

    let mut keys: Vec<_> = processes.keys().copied().collect();
    keys.sort_unstable();
    for key in keys {
        let actual = processes[&key].id();
        if actual != key {
            errors.push(ValidationError::new(
                ValidationErrorKind::MismatchedId,
                format!("Process stored under id {key} reports id {actual}"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
