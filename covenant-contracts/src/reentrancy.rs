//! Per-instance reentrancy accounting
//!
//! A public operation that calls another public operation on the same
//! object must not re-run the invariant chain: the object may sit in an
//! intermediate state the outer operation has not restored yet. Each
//! instance carries a [`Reentrancy`] counter; only the call that moves it
//! away from zero, and the matching call that brings it back, check
//! invariants.

use std::cell::Cell;

/// Public-operation call depth of one object
///
/// Uses a `Cell`, so an object embedding it is not `Sync`. Concurrent
/// public calls on one instance need external synchronisation.
#[derive(Debug, Default)]
pub struct Reentrancy {
    depth: Cell<usize>,
}

impl Reentrancy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record entry into a public operation
    ///
    /// Returns `true` for the outermost call.
    pub fn enter(&self) -> bool {
        let depth = self.depth.get();
        self.depth.set(depth + 1);
        depth == 0
    }

    /// Record exit from a public operation
    ///
    /// Returns `true` when no public operation remains in progress.
    pub fn leave(&self) -> bool {
        let depth = self.depth.get();
        debug_assert!(depth > 0, "Reentrancy::leave without matching enter");
        let depth = depth.saturating_sub(1);
        self.depth.set(depth);
        depth == 0
    }

    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    /// Whether a public operation is in progress
    pub fn is_active(&self) -> bool {
        self.depth.get() > 0
    }
}

/// A copy of an object is a new instance with nothing in progress
impl Clone for Reentrancy {
    fn clone(&self) -> Self {
        Self::default()
    }
}

/// Call depth is bookkeeping, not part of an object's value
impl PartialEq for Reentrancy {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[cfg(test)]
#[path = "reentrancy/reentrancy_tests.rs"]
mod tests;
