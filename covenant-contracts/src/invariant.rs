//! Object invariants composed along a type hierarchy
//!
//! Rust has no class inheritance, so a "derived" type embeds its base and
//! exposes it through a projection (`fn(&Derived) -> &Base`). An
//! [`InvariantChain`] is the ordered list of every level's predicates,
//! base levels first and the type's own level last, so a derived clause can
//! assume the base clauses already hold.
//!
//! Chains are built once per type and kept in a `static`:
//!
//! ```
//! use std::sync::OnceLock;
//! use covenant_contracts::{Invariant, InvariantChain, Reentrancy};
//!
//! struct Counter {
//!     value: u32,
//!     limit: u32,
//!     reentrancy: Reentrancy,
//! }
//!
//! impl Invariant for Counter {
//!     fn invariant_chain() -> &'static InvariantChain<Self> {
//!         static CHAIN: OnceLock<InvariantChain<Counter>> = OnceLock::new();
//!         CHAIN.get_or_init(|| {
//!             InvariantChain::builder()
//!                 .level("Counter")
//!                 .predicate("value <= limit", |c: &Counter| c.value <= c.limit)
//!                 .build()
//!         })
//!     }
//!
//!     fn reentrancy(&self) -> &Reentrancy {
//!         &self.reentrancy
//!     }
//! }
//!
//! let ok = Counter { value: 1, limit: 2, reentrancy: Reentrancy::new() };
//! assert!(ok.check_invariant().is_ok());
//! ```

use std::fmt;

use tracing::trace;

use crate::predicate::InvariantPredicate;
use crate::reentrancy::Reentrancy;

/// A type whose public operations preserve an invariant chain
pub trait Invariant: Sized + 'static {
    /// The chain for this type, built once
    fn invariant_chain() -> &'static InvariantChain<Self>;

    /// This instance's reentrancy counter
    fn reentrancy(&self) -> &Reentrancy;

    /// Evaluate the whole chain against this instance
    fn check_invariant(&self) -> Result<(), InvariantFailure> {
        Self::invariant_chain().check(self)
    }
}

/// The first clause of a chain that did not hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvariantFailure {
    pub level: &'static str,
    pub description: &'static str,
}

impl fmt::Display for InvariantFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level, self.description)
    }
}

/// The clauses contributed by one type of the hierarchy
pub struct InvariantLevel<T> {
    name: &'static str,
    predicates: Vec<InvariantPredicate<T>>,
}

impl<T> InvariantLevel<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn predicates(&self) -> &[InvariantPredicate<T>] {
        &self.predicates
    }
}

impl<T> fmt::Debug for InvariantLevel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvariantLevel")
            .field("name", &self.name)
            .field("predicates", &self.predicates)
            .finish()
    }
}

/// Ordered invariant levels of one type, most-derived last
pub struct InvariantChain<T> {
    levels: Vec<InvariantLevel<T>>,
}

impl<T: 'static> InvariantChain<T> {
    pub fn builder() -> InvariantChainBuilder<T> {
        InvariantChainBuilder { levels: Vec::new() }
    }

    /// Evaluate every clause in order, stopping at the first failure
    pub fn check(&self, instance: &T) -> Result<(), InvariantFailure> {
        for level in &self.levels {
            for predicate in &level.predicates {
                trace!(
                    "Checking invariant '{}' of {}",
                    predicate.description(),
                    level.name
                );
                if !predicate.holds(instance) {
                    return Err(InvariantFailure {
                        level: level.name,
                        description: predicate.description(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn levels(&self) -> &[InvariantLevel<T>] {
        &self.levels
    }

    /// Level names, base first
    pub fn level_names(&self) -> Vec<&'static str> {
        self.levels.iter().map(|l| l.name).collect()
    }

    /// Total number of clauses over all levels
    pub fn len(&self) -> usize {
        self.levels.iter().map(|l| l.predicates.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> fmt::Debug for InvariantChain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.levels).finish()
    }
}

/// Builds an [`InvariantChain`]
pub struct InvariantChainBuilder<T> {
    levels: Vec<InvariantLevel<T>>,
}

impl<T: 'static> InvariantChainBuilder<T> {
    /// Pull every level of a base type's chain into this chain
    ///
    /// Levels are visited through `project`. A level already present under
    /// the same name is not added twice, so a common ancestor reached
    /// through two bases contributes its clauses once.
    pub fn inherit<B: 'static>(
        mut self,
        base: &'static InvariantChain<B>,
        project: fn(&T) -> &B,
    ) -> Self {
        for level in &base.levels {
            if self.levels.iter().any(|l| l.name == level.name) {
                trace!("Skipping already inherited invariant level {}", level.name);
                continue;
            }
            let predicates = level
                .predicates
                .iter()
                .map(|p| {
                    InvariantPredicate::invariant(p.description(), move |t: &T| {
                        p.holds(project(t))
                    })
                })
                .collect();
            self.levels.push(InvariantLevel {
                name: level.name,
                predicates,
            });
        }
        self
    }

    /// Open a new level; following clauses belong to it
    pub fn level(mut self, name: &'static str) -> Self {
        self.levels.push(InvariantLevel {
            name,
            predicates: Vec::new(),
        });
        self
    }

    /// Add a clause to the current level
    ///
    /// Without an open level, one named after `T` is opened.
    pub fn predicate(
        mut self,
        description: &'static str,
        check: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Self {
        if self.levels.is_empty() {
            self = self.level(std::any::type_name::<T>());
        }
        if let Some(level) = self.levels.last_mut() {
            level
                .predicates
                .push(InvariantPredicate::invariant(description, check));
        }
        self
    }

    pub fn build(self) -> InvariantChain<T> {
        InvariantChain {
            levels: self.levels,
        }
    }
}

#[cfg(test)]
#[path = "invariant/invariant_tests.rs"]
mod tests;
