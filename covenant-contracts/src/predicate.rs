//! Predicates: described boolean checks
//!
//! A predicate pairs a check with a human-readable description. The same
//! type backs every category of contract; only the closure signature
//! changes with what the category may observe:
//!
//! | Category             | Observes                                   |
//! |----------------------|--------------------------------------------|
//! | precondition         | guarded state                              |
//! | postcondition        | guarded state, old values, result          |
//! | exception guarantee  | guarded state, old values                  |
//! | invariant            | the object                                 |
//!
//! State is always passed by shared reference, so a predicate can read the
//! guarded state but never mutate it.

use std::fmt;

use crate::snapshot::OldValues;

/// A described check
pub struct Predicate<F: ?Sized> {
    description: &'static str,
    check: Box<F>,
}

/// Checked before the body, sees only the state
pub type Precondition<'c, S> = Predicate<dyn Fn(&S) -> bool + 'c>;

/// Checked after a normal return
pub type Postcondition<'c, S, R> = Predicate<dyn Fn(&S, &OldValues, &R) -> bool + 'c>;

/// Checked after the body failed
pub type ExceptGuarantee<'c, S> = Predicate<dyn Fn(&S, &OldValues) -> bool + 'c>;

/// One clause of an object invariant
///
/// Invariant chains are built once per type and shared process-wide,
/// hence the `Send + Sync` bound.
pub type InvariantPredicate<T> = Predicate<dyn Fn(&T) -> bool + Send + Sync>;

impl<F: ?Sized> Predicate<F> {
    pub fn description(&self) -> &'static str {
        self.description
    }
}

impl<F: ?Sized> fmt::Debug for Predicate<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl<'c, S> Predicate<dyn Fn(&S) -> bool + 'c> {
    pub fn new(description: &'static str, check: impl Fn(&S) -> bool + 'c) -> Self {
        Self {
            description,
            check: Box::new(check),
        }
    }

    pub fn evaluate(&self, state: &S) -> bool {
        (self.check)(state)
    }
}

impl<'c, S, R> Predicate<dyn Fn(&S, &OldValues, &R) -> bool + 'c> {
    pub fn new(
        description: &'static str,
        check: impl Fn(&S, &OldValues, &R) -> bool + 'c,
    ) -> Self {
        Self {
            description,
            check: Box::new(check),
        }
    }

    pub fn evaluate(&self, state: &S, old: &OldValues, result: &R) -> bool {
        (self.check)(state, old, result)
    }
}

impl<'c, S> Predicate<dyn Fn(&S, &OldValues) -> bool + 'c> {
    pub fn new(description: &'static str, check: impl Fn(&S, &OldValues) -> bool + 'c) -> Self {
        Self {
            description,
            check: Box::new(check),
        }
    }

    pub fn evaluate(&self, state: &S, old: &OldValues) -> bool {
        (self.check)(state, old)
    }
}

impl<T> Predicate<dyn Fn(&T) -> bool + Send + Sync> {
    /// Create an invariant clause
    ///
    /// Named apart from [`Predicate::new`] because `dyn Fn(&T) -> bool`
    /// with and without `Send + Sync` are distinct types.
    pub fn invariant(
        description: &'static str,
        check: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            description,
            check: Box::new(check),
        }
    }

    pub fn holds(&self, instance: &T) -> bool {
        (self.check)(instance)
    }
}

#[cfg(test)]
#[path = "predicate/predicate_tests.rs"]
mod tests;
