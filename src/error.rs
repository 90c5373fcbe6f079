//! Error types for the simulator.
//!
//! The engine itself is permissive: unknown instructions cost nothing and
//! every scheduling operation is total over its inputs. The only engine
//! failure is a caller-contract violation (a ready entry with no backing
//! process). The remaining variants belong to the surrounding layers
//! (configuration, workload loading, admission, model and report I/O).

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::models::ProcessId;
use crate::validation::ValidationError;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors raised by the simulator and its collaborators.
#[derive(Debug)]
#[non_exhaustive]
pub enum SimError {
    /// A ready entry refers to a process id absent from the process map.
    ProcessNotFound { process_id: ProcessId },
    /// Configuration value out of its legal domain.
    InvalidConfig { detail: String },
    /// CPU-instruction probability outside `[0, 1]`.
    InvalidProbability { value: f64 },
    /// Reading or writing a file failed.
    Io { path: PathBuf, source: io::Error },
    /// Admission validation found one or more problems.
    Validation(Vec<ValidationError>),
    /// Deserialized model data violates a model invariant.
    InvalidState { detail: String },
    /// Metrics or a report could not be rendered as JSON.
    Serialization(serde_json::Error),
}

impl SimError {
    /// Constructs a configuration error.
    pub fn invalid_config(detail: impl Into<String>) -> Self {
        Self::InvalidConfig {
            detail: detail.into(),
        }
    }

    /// Constructs an invalid-state error.
    pub fn invalid_state(detail: impl Into<String>) -> Self {
        Self::InvalidState {
            detail: detail.into(),
        }
    }

    /// Wraps an I/O error with the path that produced it.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProcessNotFound { process_id } => {
                write!(f, "process not found: no process with id {process_id}")
            }
            Self::InvalidConfig { detail } => write!(f, "invalid configuration: {detail}"),
            Self::InvalidProbability { value } => {
                write!(f, "cpu probability must be within [0, 1], got {value}")
            }
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Validation(errors) => {
                write!(f, "admission validation failed ({} issue(s))", errors.len())?;
                for e in errors {
                    write!(f, "; {}", e.message)?;
                }
                Ok(())
            }
            Self::InvalidState { detail } => write!(f, "inconsistent model state: {detail}"),
            Self::Serialization(source) => write!(f, "cannot serialize to JSON: {source}"),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serialization(source) => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;
    use std::error::Error;

    #[test]
    fn test_process_not_found_message() {
        let err = SimError::ProcessNotFound { process_id: 7 };
        assert_eq!(err.to_string(), "process not found: no process with id 7");
    }

    #[test]
    fn test_io_exposes_source() {
        let err = SimError::io(
            "data/missing.txt",
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        assert!(err.to_string().starts_with("data/missing.txt"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_serialization_exposes_source() {
        let json_err = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err = SimError::Serialization(json_err);
        assert!(err.to_string().starts_with("cannot serialize to JSON"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_invalid_state_message() {
        let err = SimError::invalid_state("program counter 5 past end of 1 instruction(s)");
        assert_eq!(
            err.to_string(),
            "inconsistent model state: program counter 5 past end of 1 instruction(s)"
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn test_validation_lists_messages() {
        let err = SimError::Validation(vec![ValidationError::new(
            ValidationErrorKind::MissingProcess,
            "Ready entry 3 has no process",
        )]);
        let msg = err.to_string();
        assert!(msg.contains("1 issue"));
        assert!(msg.contains("Ready entry 3"));
    }
}
