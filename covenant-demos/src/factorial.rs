//! Guarded factorial
//!
//! The body keeps the second-to-last partial product alongside the result
//! so the postcondition can check `result / previous == n` without calling
//! back into the function.

use covenant_contracts::config::{self, ContractConfig};
use covenant_contracts::{CallError, Contract};
use thiserror::Error;
use tracing::debug;

/// Largest argument whose factorial fits in a `u128`
pub const MAX_ARGUMENT: i32 = 34;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactorialError {
    #[error("{0}! does not fit in 128 bits")]
    Overflow(i32),
}

/// Final and second-to-last partial products
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Products {
    result: u128,
    previous: u128,
}

/// `n!` under the process-wide configuration
pub fn factorial(n: i32) -> Result<u128, CallError<FactorialError>> {
    factorial_with(config::global(), n)
}

/// `n!` under an explicit configuration
pub fn factorial_with(
    config: &ContractConfig,
    n: i32,
) -> Result<u128, CallError<FactorialError>> {
    let mut n = n;
    Contract::new("factorial")
        .with_config(config)
        .precondition("n >= 0", |n: &i32| *n >= 0)
        .postcondition("result >= n", |n, _, p: &Products| {
            u128::try_from(*n).map_or(true, |n| p.result >= n)
        })
        .postcondition(
            "(n == 0 && result == 1) || result / previous == n",
            |n, _, p: &Products| {
                (*n == 0 && p.result == 1)
                    || u128::try_from(*n).is_ok_and(|n| p.result / p.previous == n)
            },
        )
        .try_call(&mut n, |n| -> Result<Products, FactorialError> {
            let n = *n;
            let mut products = Products {
                result: 1,
                previous: 1,
            };
            for i in 1..=n {
                products.previous = products.result;
                products.result = products
                    .result
                    .checked_mul(i as u128)
                    .ok_or(FactorialError::Overflow(n))?;
            }
            Ok(products)
        })
        .map(|p| p.result)
}

/// `(n, n!)` for every `n` in `0..=upto`
pub fn factorial_table(
    upto: i32,
) -> impl Iterator<Item = (i32, Result<u128, CallError<FactorialError>>)> {
    (0..=upto).map(|n| {
        let value = factorial(n);
        if let Err(CallError::Failed(e)) = &value {
            debug!("factorial table stops being representable: {}", e);
        }
        (n, value)
    })
}

#[cfg(test)]
#[path = "factorial/factorial_tests.rs"]
mod tests;
