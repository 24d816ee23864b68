use super::*;
use covenant_contracts::{CheckLevels, ContractKind};
use proptest::prelude::*;

fn reference(n: i32) -> u128 {
    (1..=n as u128).product()
}

// ===== Value Tests =====

#[test]
fn test_small_values() {
    let values: Vec<u128> = (0..=5).map(|n| factorial(n).unwrap()).collect();
    assert_eq!(values, vec![1, 1, 2, 6, 24, 120]);
}

#[test]
fn test_largest_representable() {
    assert_eq!(
        factorial(MAX_ARGUMENT).unwrap(),
        295_232_799_039_604_140_847_618_609_643_520_000_000
    );
}

#[test]
fn test_overflow_is_a_failure_not_a_violation() {
    let err = factorial(MAX_ARGUMENT + 1).unwrap_err();
    assert!(!err.is_violation());
    assert_eq!(err.failure(), Some(&FactorialError::Overflow(35)));
    assert_eq!(err.to_string(), "Operation failed: 35! does not fit in 128 bits");
}

// ===== Contract Tests =====

#[test]
fn test_negative_argument_violates_precondition() {
    let violation = factorial(-1).unwrap_err().violation().cloned().unwrap();
    assert_eq!(violation.kind(), ContractKind::Precondition);
    assert_eq!(violation.description(), "n >= 0");
}

#[test]
fn test_negative_argument_without_preconditions() {
    let config = ContractConfig::new()
        .with_checks(CheckLevels::enabled().with(ContractKind::Precondition, false));

    // The empty product is 1, which the second postcondition rejects for n != 0
    let violation = factorial_with(&config, -3).unwrap_err().violation().cloned().unwrap();
    assert_eq!(violation.kind(), ContractKind::Postcondition);
    assert_eq!(
        violation.description(),
        "(n == 0 && result == 1) || result / previous == n"
    );
}

#[test]
fn test_table_stops_being_representable() {
    let rows: Vec<_> = factorial_table(36).collect();
    assert_eq!(rows.len(), 37);
    assert!(rows[..=34].iter().all(|(_, value)| value.is_ok()));
    assert!(rows[35..].iter().all(|(_, value)| value.is_err()));
}

proptest! {
    #[test]
    fn prop_every_representable_argument_satisfies_contract(n in 0..=MAX_ARGUMENT) {
        prop_assert_eq!(factorial(n).unwrap(), reference(n));
    }
}
