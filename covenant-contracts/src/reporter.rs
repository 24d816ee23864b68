//! Contract violation reporting
//!
//! Every failed predicate becomes a [`ContractViolation`] that is passed to
//! [`ViolationReporter::report`] exactly once. The reporter applies the
//! configured [`ViolationReaction`].

use parking_lot::Mutex;
use tracing::{debug, error, warn};

use crate::config::ViolationReaction;
use crate::errors::ContractViolation;

/// Applies a reaction to violations
#[derive(Debug, Clone, Copy)]
pub struct ViolationReporter<'a> {
    reaction: ViolationReaction,
    log: Option<&'a ViolationLog>,
}

impl<'a> ViolationReporter<'a> {
    pub fn new(reaction: ViolationReaction, log: Option<&'a ViolationLog>) -> Self {
        Self { reaction, log }
    }

    pub fn reaction(&self) -> ViolationReaction {
        self.reaction
    }

    /// Consume one violation
    ///
    /// `Raise` hands the violation back as `Err`; `Log` records it and
    /// returns `Ok(())` so the call carries on; `Abort` never returns.
    pub fn report(&self, violation: ContractViolation) -> Result<(), ContractViolation> {
        match self.reaction {
            ViolationReaction::Abort => {
                error!(
                    kind = %violation.kind(),
                    operation = violation.operation(),
                    "{}",
                    violation
                );
                eprintln!("fatal: {}", violation);
                std::process::abort()
            }
            ViolationReaction::Raise => {
                debug!("Raising {}", violation);
                Err(violation)
            }
            ViolationReaction::Log => {
                warn!(
                    kind = %violation.kind(),
                    operation = violation.operation(),
                    "{}",
                    violation
                );
                if let Some(log) = self.log {
                    log.record(violation);
                }
                Ok(())
            }
        }
    }
}

/// Thread-safe record of logged violations
#[derive(Debug, Default)]
pub struct ViolationLog {
    entries: Mutex<Vec<ContractViolation>>,
}

impl ViolationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, violation: ContractViolation) {
        self.entries.lock().push(violation);
    }

    /// Copy of everything recorded so far, oldest first
    pub fn violations(&self) -> Vec<ContractViolation> {
        self.entries.lock().clone()
    }

    /// Remove and return everything recorded so far
    pub fn take(&self) -> Vec<ContractViolation> {
        std::mem::take(&mut *self.entries.lock())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Recorded violations as a JSON array
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&*self.entries.lock())
    }
}

#[cfg(test)]
#[path = "reporter/reporter_tests.rs"]
mod tests;
