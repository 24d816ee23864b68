//! Covenant Contract System
//!
//! Runtime design-by-contract for Rust: preconditions, postconditions,
//! exception guarantees and object invariants, evaluated around a guarded
//! call in a fixed protocol.
//!
//! - [`Contract`] declares the checks of one operation and runs its body
//! - [`OldValues`] hands postconditions a copy of the pre-call state
//! - [`InvariantChain`] composes invariants along a type hierarchy, and
//!   [`Reentrancy`] keeps nested public calls from re-checking them
//! - [`ContractConfig`] selects which categories run and how violations
//!   are reported
//!
//! # Example
//!
//! ```
//! use covenant_contracts::{Contract, ContractKind};
//!
//! let sqrt = |x: f64| {
//!     Contract::new("sqrt")
//!         .precondition("x >= 0", |x: &f64| *x >= 0.0)
//!         .postcondition("result^2 ~ x", |x: &f64, _, r: &f64| (r * r - x).abs() < 1e-9)
//!         .call_ref(&x, |x| x.sqrt())
//! };
//!
//! assert_eq!(sqrt(4.0), Ok(2.0));
//! assert_eq!(sqrt(-1.0).unwrap_err().kind(), ContractKind::Precondition);
//! ```

pub mod config;
pub mod errors;
pub mod guard;
pub mod invariant;
pub mod predicate;
pub mod reentrancy;
pub mod reporter;
pub mod snapshot;

pub use config::{CheckLevels, ContractConfig, ViolationReaction};
pub use errors::{CallError, ContractError, ContractKind, ContractResult, ContractViolation, InvariantPhase};
pub use guard::Contract;
pub use invariant::{Invariant, InvariantChain, InvariantChainBuilder, InvariantFailure, InvariantLevel};
pub use predicate::{ExceptGuarantee, InvariantPredicate, Postcondition, Precondition, Predicate};
pub use reentrancy::Reentrancy;
pub use reporter::{ViolationLog, ViolationReporter};
pub use snapshot::{OldCapture, OldValues};
