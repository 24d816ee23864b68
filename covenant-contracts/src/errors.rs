//! Contract-related error types

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category of a contract check
///
/// Each category has its own moment in a guarded call and its own
/// toggle in [`CheckLevels`](crate::config::CheckLevels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractKind {
    /// Checked before the body runs. Failure blames the caller.
    Precondition,

    /// Checked after the body returns normally. Failure blames the
    /// implementation.
    Postcondition,

    /// Checked around every outermost public operation on an object.
    Invariant,

    /// Checked after the body fails. Failure means the body did not honour
    /// its promised exception safety.
    ExceptionGuarantee,
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Precondition => "Precondition",
            Self::Postcondition => "Postcondition",
            Self::Invariant => "Invariant",
            Self::ExceptionGuarantee => "Exception guarantee",
        };
        f.write_str(name)
    }
}

/// When an invariant chain was evaluated relative to the body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvariantPhase {
    /// Before the body of an outermost public operation
    Entry,
    /// After the body of an outermost public operation or constructor
    Exit,
}

impl fmt::Display for InvariantPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entry => f.write_str("entry"),
            Self::Exit => f.write_str("exit"),
        }
    }
}

/// Represents a contract violation
///
/// Created the moment a predicate evaluates to `false` and handed to the
/// [`ViolationReporter`](crate::reporter::ViolationReporter) exactly once.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContractViolation {
    /// Precondition violation
    #[error("Precondition violated in '{operation}': {description}")]
    Precondition {
        operation: String,
        description: String,
    },

    /// Postcondition violation
    #[error("Postcondition violated in '{operation}': {description}")]
    Postcondition {
        operation: String,
        description: String,
    },

    /// Invariant violation at one level of an invariant chain
    #[error("Invariant violated in '{operation}' [{level}, on {phase}]: {description}")]
    Invariant {
        operation: String,
        description: String,
        level: String,
        phase: InvariantPhase,
    },

    /// Exception guarantee violation
    #[error("Exception guarantee violated in '{operation}': {description}")]
    ExceptionGuarantee {
        operation: String,
        description: String,
    },
}

impl ContractViolation {
    /// Create a violation of a non-invariant kind
    ///
    /// Invariant violations need a level and phase; use
    /// [`ContractViolation::invariant`] for those. Passing
    /// `ContractKind::Invariant` here records an unnamed level on exit.
    pub fn new(kind: ContractKind, operation: &str, description: &str) -> Self {
        let operation = operation.to_string();
        let description = description.to_string();
        match kind {
            ContractKind::Precondition => Self::Precondition {
                operation,
                description,
            },
            ContractKind::Postcondition => Self::Postcondition {
                operation,
                description,
            },
            ContractKind::Invariant => Self::Invariant {
                operation,
                description,
                level: String::new(),
                phase: InvariantPhase::Exit,
            },
            ContractKind::ExceptionGuarantee => Self::ExceptionGuarantee {
                operation,
                description,
            },
        }
    }

    /// Create an invariant violation for one level of a chain
    pub fn invariant(
        operation: &str,
        description: &str,
        level: &str,
        phase: InvariantPhase,
    ) -> Self {
        Self::Invariant {
            operation: operation.to_string(),
            description: description.to_string(),
            level: level.to_string(),
            phase,
        }
    }

    /// Category of the failed check
    pub fn kind(&self) -> ContractKind {
        match self {
            Self::Precondition { .. } => ContractKind::Precondition,
            Self::Postcondition { .. } => ContractKind::Postcondition,
            Self::Invariant { .. } => ContractKind::Invariant,
            Self::ExceptionGuarantee { .. } => ContractKind::ExceptionGuarantee,
        }
    }

    /// Identity of the guarded operation
    pub fn operation(&self) -> &str {
        match self {
            Self::Precondition { operation, .. }
            | Self::Postcondition { operation, .. }
            | Self::Invariant { operation, .. }
            | Self::ExceptionGuarantee { operation, .. } => operation,
        }
    }

    /// Description of the predicate that failed
    pub fn description(&self) -> &str {
        match self {
            Self::Precondition { description, .. }
            | Self::Postcondition { description, .. }
            | Self::Invariant { description, .. }
            | Self::ExceptionGuarantee { description, .. } => description,
        }
    }

    /// Hierarchy level of a failed invariant
    pub fn level(&self) -> Option<&str> {
        match self {
            Self::Invariant { level, .. } => Some(level),
            _ => None,
        }
    }
}

/// Main contract error type
#[derive(Error, Debug)]
pub enum ContractError {
    /// Contract violation raised by a guarded call
    #[error("Contract violation: {0}")]
    Violation(#[from] ContractViolation),

    /// The process-wide configuration was installed twice
    #[error("Contract configuration is already installed")]
    AlreadyConfigured,

    /// A configuration value could not be understood
    #[error("Invalid contract configuration: {0}")]
    InvalidConfig(String),
}

/// Outcome of a guarded call whose body can fail
///
/// `Failed` carries the body's own error after its exception guarantees
/// held; `Violation` carries a raised contract failure.
#[derive(Error, Debug)]
pub enum CallError<E> {
    #[error(transparent)]
    Violation(#[from] ContractViolation),

    #[error("Operation failed: {0}")]
    Failed(E),
}

impl<E> CallError<E> {
    /// The raised violation, if this is one
    pub fn violation(&self) -> Option<&ContractViolation> {
        match self {
            Self::Violation(v) => Some(v),
            Self::Failed(_) => None,
        }
    }

    /// The body's error, if this is one
    pub fn failure(&self) -> Option<&E> {
        match self {
            Self::Failed(e) => Some(e),
            Self::Violation(_) => None,
        }
    }

    pub fn is_violation(&self) -> bool {
        matches!(self, Self::Violation(_))
    }
}

impl CallError<ContractViolation> {
    /// Collapse a body that failed with a nested violation into that
    /// violation
    pub fn into_violation(self) -> ContractViolation {
        match self {
            Self::Violation(v) | Self::Failed(v) => v,
        }
    }
}

/// Result type for contract operations
pub type ContractResult<T> = Result<T, ContractError>;

#[cfg(test)]
#[path = "errors/errors_tests.rs"]
mod tests;
