//! Guarded in-place increment
//!
//! `x` is incremented and its value from before the call returned. When
//! the increment cannot happen the exception guarantee promises `x` was
//! left untouched.

use covenant_contracts::config::{self, ContractConfig};
use covenant_contracts::{CallError, Contract, ContractViolation};
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncrementError {
    #[error("incrementing {0} overflows i32")]
    Overflow(i32),
}

fn contract(config: &ContractConfig) -> Contract<'_, i32, i32> {
    Contract::new("increment")
        .with_config(config)
        .precondition("x < i32::MAX", |x: &i32| *x < i32::MAX)
        .old("x", |x: &i32| *x)
        .postcondition("x == old x + 1", |x, old, _| {
            old.get::<i32>("x")
                .and_then(|o| o.checked_add(1))
                .is_some_and(|expected| *x == expected)
        })
        .postcondition("result == old x", |_, old, result| {
            old.get::<i32>("x") == Some(result)
        })
        .except("x == old x", |x, old| old.get::<i32>("x") == Some(x))
}

/// Increment `x`, returning its previous value
///
/// With the precondition off or only logged, `i32::MAX` wraps and the
/// postcondition reports it.
pub fn increment(x: &mut i32) -> Result<i32, ContractViolation> {
    increment_with(config::global(), x)
}

pub fn increment_with(config: &ContractConfig, x: &mut i32) -> Result<i32, ContractViolation> {
    contract(config).call(x, |x| {
        let old = *x;
        *x = old.wrapping_add(1);
        old
    })
}

/// Like [`increment`], but reports overflow instead of relying on the
/// precondition to rule it out
pub fn try_increment(x: &mut i32) -> Result<i32, CallError<IncrementError>> {
    try_increment_with(config::global(), x)
}

pub fn try_increment_with(
    config: &ContractConfig,
    x: &mut i32,
) -> Result<i32, CallError<IncrementError>> {
    contract(config).try_call(x, |x| -> Result<i32, IncrementError> {
        let old = *x;
        *x = old.checked_add(1).ok_or(IncrementError::Overflow(old))?;
        Ok(old)
    })
}

#[cfg(test)]
#[path = "increment/increment_tests.rs"]
mod tests;
