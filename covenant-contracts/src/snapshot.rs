//! Old-value snapshots
//!
//! Postconditions and exception guarantees compare the state after a call
//! with the state before it. [`OldValues`] holds the "before" half: owned
//! copies of named pieces of state, taken once at call entry and read-only
//! afterwards.
//!
//! Captured values must be `'static`. A value that borrows from the live
//! state cannot satisfy that bound, so the snapshot can never alias the
//! state it is compared against.

use std::any::Any;
use std::fmt;

use tracing::trace;

/// Ordered name -> value mapping of pre-call state
#[derive(Default)]
pub struct OldValues {
    entries: Vec<(&'static str, Box<dyn Any>)>,
}

impl OldValues {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a copy of `value` under `name`
    ///
    /// Capturing a name twice replaces the earlier value and keeps its
    /// position.
    pub fn capture<T: 'static>(&mut self, name: &'static str, value: T) {
        trace!("Capturing old value '{}'", name);
        let value: Box<dyn Any> = Box::new(value);
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Look up a captured value
    ///
    /// Returns `None` when nothing was captured under `name` or when it was
    /// captured with a different type.
    pub fn get<T: 'static>(&self, name: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .and_then(|(_, value)| value.downcast_ref::<T>())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| *n == name)
    }

    /// Names in capture order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(n, _)| *n)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for OldValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// A named capture declared on a contract
///
/// Runs once per call, just before the body, and only when some enabled
/// postcondition or exception guarantee could read it.
pub struct OldCapture<'c, S> {
    name: &'static str,
    capture: Box<dyn Fn(&S, &mut OldValues) + 'c>,
}

impl<'c, S> OldCapture<'c, S> {
    pub fn new<T, F>(name: &'static str, read: F) -> Self
    where
        T: 'static,
        F: Fn(&S) -> T + 'c,
    {
        Self {
            name,
            capture: Box::new(move |state: &S, old: &mut OldValues| {
                old.capture(name, read(state))
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Copy this capture's value out of `state` into `old`
    pub fn apply(&self, state: &S, old: &mut OldValues) {
        (self.capture)(state, old);
    }
}

impl<S> fmt::Debug for OldCapture<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OldCapture").field("name", &self.name).finish()
    }
}

#[cfg(test)]
#[path = "snapshot/snapshot_tests.rs"]
mod tests;
