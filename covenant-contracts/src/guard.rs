//! Guarded calls
//!
//! A [`Contract`] collects the checks attached to one operation. Running a
//! body through it sequences them:
//!
//! 1. invariant chain on entry (public operations, outermost call only)
//! 2. preconditions, in declaration order; the body does not run if one
//!    fails and the violation is raised
//! 3. old-value snapshot, only if an enabled postcondition or exception
//!    guarantee exists
//! 4. the body
//! 5. postconditions after `Ok`, exception guarantees after `Err`
//! 6. invariant chain on exit (outermost call only), also after `Err`
//!
//! The first failing predicate of a step is reported; later ones in the
//! same step are not evaluated. Reentrancy accounting is released by the
//! guard's `Drop`, so it is undone on every exit path, early `?` returns
//! and unwinding panics included.
//!
//! # Example
//!
//! ```
//! use covenant_contracts::Contract;
//!
//! fn inc(x: &mut i32) -> Result<i32, covenant_contracts::ContractViolation> {
//!     Contract::new("inc")
//!         .precondition("x < i32::MAX", |x: &i32| *x < i32::MAX)
//!         .old("x", |x: &i32| *x)
//!         .postcondition("x == old x + 1", |x: &i32, old, _: &i32| {
//!             old.get::<i32>("x").is_some_and(|o| *x == o + 1)
//!         })
//!         .postcondition("result == old x", |_: &i32, old, result: &i32| {
//!             old.get::<i32>("x") == Some(result)
//!         })
//!         .call(x, |x| {
//!             let old = *x;
//!             *x += 1;
//!             old
//!         })
//! }
//!
//! let mut x = 5;
//! assert_eq!(inc(&mut x), Ok(5));
//! assert_eq!(x, 6);
//! ```

use std::convert::Infallible;
use std::fmt;
use std::ops::Deref;

use tracing::{debug, trace};

use crate::config::{self, ContractConfig};
use crate::errors::{CallError, ContractKind, ContractViolation, InvariantPhase};
use crate::invariant::{Invariant, InvariantFailure};
use crate::predicate::{ExceptGuarantee, Postcondition, Precondition};
use crate::reporter::ViolationReporter;
use crate::snapshot::{OldCapture, OldValues};

/// Checks attached to one operation
///
/// `S` is the state the checks observe and the body works on, `R` the
/// body's result. For methods `S` is the object; for free functions it is
/// whatever the function reads and writes (often just its arguments).
pub struct Contract<'c, S, R> {
    operation: &'static str,
    preconditions: Vec<Precondition<'c, S>>,
    captures: Vec<OldCapture<'c, S>>,
    postconditions: Vec<Postcondition<'c, S, R>>,
    excepts: Vec<ExceptGuarantee<'c, S>>,
    config: Option<&'c ContractConfig>,
}

impl<'c, S, R> Contract<'c, S, R> {
    /// Create an empty contract for `operation`
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            preconditions: Vec::new(),
            captures: Vec::new(),
            postconditions: Vec::new(),
            excepts: Vec::new(),
            config: None,
        }
    }

    /// Add a precondition
    pub fn precondition(
        mut self,
        description: &'static str,
        check: impl Fn(&S) -> bool + 'c,
    ) -> Self {
        self.preconditions.push(Precondition::new(description, check));
        self
    }

    /// Declare an old value, copied out of the state before the body runs
    pub fn old<T: 'static>(mut self, name: &'static str, read: impl Fn(&S) -> T + 'c) -> Self {
        self.captures.push(OldCapture::new(name, read));
        self
    }

    /// Add a postcondition
    pub fn postcondition(
        mut self,
        description: &'static str,
        check: impl Fn(&S, &OldValues, &R) -> bool + 'c,
    ) -> Self {
        self.postconditions
            .push(Postcondition::new(description, check));
        self
    }

    /// Add an exception guarantee
    pub fn except(
        mut self,
        description: &'static str,
        check: impl Fn(&S, &OldValues) -> bool + 'c,
    ) -> Self {
        self.excepts.push(ExceptGuarantee::new(description, check));
        self
    }

    /// Use `config` instead of the process-wide configuration
    pub fn with_config(mut self, config: &'c ContractConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Check if this contract has any conditions
    pub fn has_conditions(&self) -> bool {
        !self.preconditions.is_empty()
            || !self.postconditions.is_empty()
            || !self.excepts.is_empty()
    }

    fn config(&self) -> &'c ContractConfig {
        match self.config {
            Some(config) => config,
            None => config::global(),
        }
    }

    /// Run a body that cannot fail
    pub fn call<F>(&self, state: &mut S, body: F) -> Result<R, ContractViolation>
    where
        F: FnOnce(&mut S) -> R,
    {
        infallible(self.run(state, None, |s| Ok(body(&mut **s))))
    }

    /// Run a body that can fail
    ///
    /// On `Err` the exception guarantees are checked; if they hold the
    /// body's error comes back as [`CallError::Failed`].
    pub fn try_call<E, F>(&self, state: &mut S, body: F) -> Result<R, CallError<E>>
    where
        F: FnOnce(&mut S) -> Result<R, E>,
    {
        self.run(state, None, |s| body(&mut **s))
    }

    /// Run a body that only reads the state
    pub fn call_ref<F>(&self, state: &S, body: F) -> Result<R, ContractViolation>
    where
        F: FnOnce(&S) -> R,
    {
        infallible(self.run(state, None, |s| Ok(body(*s))))
    }

    fn run<P, E, F>(
        &self,
        handle: P,
        tracking: Option<Tracking<S>>,
        body: F,
    ) -> Result<R, CallError<E>>
    where
        P: Deref<Target = S>,
        F: FnOnce(&mut P) -> Result<R, E>,
    {
        let config = self.config();
        if !self.has_conditions() && tracking.is_none() {
            debug!("'{}': no conditions declared", self.operation());
        }
        let reporter = config.reporter();
        let mut guard = OperationGuard::new(self.operation, handle, tracking.map(|t| t.leave));

        let invariant_check = tracking
            .filter(|t| t.outermost && config.checks(ContractKind::Invariant))
            .map(|t| t.check);

        if let Some(check) = invariant_check {
            check_invariant(
                self.operation,
                check,
                &*guard.handle,
                InvariantPhase::Entry,
                &reporter,
            )?;
        }

        if config.checks(ContractKind::Precondition) {
            if let Some(failed) = self
                .preconditions
                .iter()
                .find(|p| !self.holds(p.description(), || p.evaluate(&*guard.handle)))
            {
                guard.transition(GuardState::PreconditionFailed);
                reporter.report(ContractViolation::new(
                    ContractKind::Precondition,
                    self.operation,
                    failed.description(),
                ))?;
            }
        }

        let old = self.snapshot(config, &*guard.handle);

        guard.transition(GuardState::BodyRunning);
        match body(&mut guard.handle) {
            Ok(result) => {
                if config.checks(ContractKind::Postcondition) {
                    if let Some(failed) = self.postconditions.iter().find(|p| {
                        !self.holds(p.description(), || p.evaluate(&*guard.handle, &old, &result))
                    }) {
                        guard.transition(GuardState::PostconditionFailed);
                        reporter.report(ContractViolation::new(
                            ContractKind::Postcondition,
                            self.operation,
                            failed.description(),
                        ))?;
                    } else {
                        guard.transition(GuardState::PostconditionPassed);
                    }
                }
                self.exit(&mut guard, invariant_check, &reporter)?;
                Ok(result)
            }
            Err(error) => {
                let checked = self.check_excepts(config, &mut guard, &old, &reporter);
                let checked =
                    checked.and_then(|()| self.exit(&mut guard, invariant_check, &reporter));
                if let Err(violation) = checked {
                    debug!(
                        "'{}' failed and then broke its contract; raising the violation",
                        self.operation
                    );
                    return Err(CallError::Violation(violation));
                }
                Err(CallError::Failed(error))
            }
        }
    }

    fn holds(&self, description: &str, evaluate: impl FnOnce() -> bool) -> bool {
        let holds = evaluate();
        trace!(
            "'{}': '{}' evaluated to {}",
            self.operation,
            description,
            holds
        );
        holds
    }

    fn snapshot(&self, config: &ContractConfig, state: &S) -> OldValues {
        let mut old = OldValues::new();
        let needed = (config.checks(ContractKind::Postcondition) && !self.postconditions.is_empty())
            || (config.checks(ContractKind::ExceptionGuarantee) && !self.excepts.is_empty());
        if needed && !self.captures.is_empty() {
            for capture in &self.captures {
                capture.apply(state, &mut old);
            }
            debug!(
                "'{}': captured {} old value(s)",
                self.operation,
                old.len()
            );
        }
        old
    }

    fn check_excepts<P>(
        &self,
        config: &ContractConfig,
        guard: &mut OperationGuard<S, P>,
        old: &OldValues,
        reporter: &ViolationReporter<'_>,
    ) -> Result<(), ContractViolation>
    where
        P: Deref<Target = S>,
    {
        if !config.checks(ContractKind::ExceptionGuarantee) {
            return Ok(());
        }
        match self
            .excepts
            .iter()
            .find(|p| !self.holds(p.description(), || p.evaluate(&*guard.handle, old)))
        {
            Some(failed) => {
                guard.transition(GuardState::ExceptionGuaranteeFailed);
                reporter.report(ContractViolation::new(
                    ContractKind::ExceptionGuarantee,
                    self.operation,
                    failed.description(),
                ))
            }
            None => {
                guard.transition(GuardState::ExceptionGuaranteePassed);
                Ok(())
            }
        }
    }

    /// Release reentrancy accounting, then check the exit invariant if this
    /// call brought the depth back to zero
    fn exit<P>(
        &self,
        guard: &mut OperationGuard<S, P>,
        invariant_check: Option<InvariantCheck<S>>,
        reporter: &ViolationReporter<'_>,
    ) -> Result<(), ContractViolation>
    where
        P: Deref<Target = S>,
    {
        let now_idle = guard.release();
        let result = match invariant_check {
            Some(check) if now_idle => check_invariant(
                self.operation,
                check,
                &*guard.handle,
                InvariantPhase::Exit,
                reporter,
            ),
            _ => Ok(()),
        };
        guard.transition(GuardState::Exited);
        result
    }
}

impl<'c, S: Invariant, R> Contract<'c, S, R> {
    /// Run a public method body that cannot fail
    ///
    /// The object's invariant chain is checked around the body unless
    /// another public operation on the same object is already running.
    pub fn call_public<F>(&self, object: &mut S, body: F) -> Result<R, ContractViolation>
    where
        F: FnOnce(&mut S) -> R,
    {
        let tracking = Tracking::enter(object);
        infallible(self.run(object, Some(tracking), |s| Ok(body(&mut **s))))
    }

    /// Run a public method body that can fail
    ///
    /// The invariant chain is checked on exit after `Err` too: a failed
    /// operation must still leave the object valid.
    pub fn try_call_public<E, F>(&self, object: &mut S, body: F) -> Result<R, CallError<E>>
    where
        F: FnOnce(&mut S) -> Result<R, E>,
    {
        let tracking = Tracking::enter(object);
        self.run(object, Some(tracking), |s| body(&mut **s))
    }

    /// Run a read-only public method body
    pub fn call_public_ref<F>(&self, object: &S, body: F) -> Result<R, ContractViolation>
    where
        F: FnOnce(&S) -> R,
    {
        let tracking = Tracking::enter(object);
        infallible(self.run(object, Some(tracking), |s| Ok(body(*s))))
    }
}

impl<'c, A, T: Invariant> Contract<'c, A, T> {
    /// Construct an object under contract
    ///
    /// Preconditions see only the arguments: the object does not exist
    /// yet, so its invariants are not consulted before `build` runs. Once
    /// built, postconditions run and then the new object's invariant chain
    /// is checked once.
    pub fn construct<F>(&self, args: &A, build: F) -> Result<T, ContractViolation>
    where
        F: FnOnce(&A) -> T,
    {
        let object = infallible(self.run(args, None, |a| Ok(build(*a))))?;

        let config = self.config();
        if config.checks(ContractKind::Invariant) {
            check_invariant(
                self.operation,
                T::check_invariant,
                &object,
                InvariantPhase::Exit,
                &config.reporter(),
            )?;
        }
        Ok(object)
    }
}

impl<S, R> fmt::Debug for Contract<'_, S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Contract")
            .field("operation", &self.operation)
            .field("preconditions", &self.preconditions)
            .field("old", &self.captures)
            .field("postconditions", &self.postconditions)
            .field("excepts", &self.excepts)
            .finish()
    }
}

fn check_invariant<T>(
    operation: &str,
    check: InvariantCheck<T>,
    object: &T,
    phase: InvariantPhase,
    reporter: &ViolationReporter<'_>,
) -> Result<(), ContractViolation> {
    trace!("'{}': checking invariants on {}", operation, phase);
    match check(object) {
        Ok(()) => Ok(()),
        Err(failure) => reporter.report(ContractViolation::invariant(
            operation,
            failure.description,
            failure.level,
            phase,
        )),
    }
}

fn infallible<R>(result: Result<R, CallError<Infallible>>) -> Result<R, ContractViolation> {
    result.map_err(|error| match error {
        CallError::Violation(violation) => violation,
        CallError::Failed(never) => match never {},
    })
}

type InvariantCheck<S> = fn(&S) -> Result<(), InvariantFailure>;

/// Reentrancy bookkeeping of one public call
struct Tracking<S> {
    outermost: bool,
    check: InvariantCheck<S>,
    leave: fn(&S) -> bool,
}

impl<S> Clone for Tracking<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for Tracking<S> {}

impl<S: Invariant> Tracking<S> {
    fn enter(object: &S) -> Self {
        Self {
            outermost: object.reentrancy().enter(),
            check: S::check_invariant,
            leave: |s: &S| s.reentrancy().leave(),
        }
    }
}

/// Progress of one guarded call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GuardState {
    Entered,
    PreconditionFailed,
    BodyRunning,
    PostconditionFailed,
    PostconditionPassed,
    ExceptionGuaranteeFailed,
    ExceptionGuaranteePassed,
    Exited,
}

impl fmt::Display for GuardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Scope of one guarded call
///
/// Owns the handle to the guarded state for the duration of the call and
/// undoes reentrancy accounting on drop if the call did not get to do it.
struct OperationGuard<S, P: Deref<Target = S>> {
    operation: &'static str,
    handle: P,
    state: GuardState,
    leave: Option<fn(&S) -> bool>,
}

impl<S, P: Deref<Target = S>> OperationGuard<S, P> {
    fn new(operation: &'static str, handle: P, leave: Option<fn(&S) -> bool>) -> Self {
        debug!("'{}': {}", operation, GuardState::Entered);
        Self {
            operation,
            handle,
            state: GuardState::Entered,
            leave,
        }
    }

    fn transition(&mut self, next: GuardState) {
        debug!("'{}': {} -> {}", self.operation, self.state, next);
        self.state = next;
    }

    /// Leave the reentrancy scope; `true` if no public call remains active
    fn release(&mut self) -> bool {
        match self.leave.take() {
            Some(leave) => leave(&*self.handle),
            None => false,
        }
    }
}

impl<S, P: Deref<Target = S>> Drop for OperationGuard<S, P> {
    fn drop(&mut self) {
        if self.leave.is_some() {
            self.release();
        }
        if self.state != GuardState::Exited {
            debug!(
                "'{}' left its guard early in state {}",
                self.operation, self.state
            );
        }
    }
}

#[cfg(test)]
#[path = "guard/guard_tests.rs"]
mod tests;
