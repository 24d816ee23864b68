//! Guarded operations on a small type hierarchy

use std::sync::OnceLock;

use covenant_contracts::{
    CallError, Contract, ContractConfig, ContractKind, ContractViolation, Invariant,
    InvariantChain, InvariantPhase, Reentrancy,
};
use proptest::prelude::*;

#[derive(Debug)]
struct BoundedStack {
    items: Vec<i32>,
    capacity: usize,
    reentrancy: Reentrancy,
}

impl Invariant for BoundedStack {
    fn invariant_chain() -> &'static InvariantChain<Self> {
        static CHAIN: OnceLock<InvariantChain<BoundedStack>> = OnceLock::new();
        CHAIN.get_or_init(|| {
            InvariantChain::builder()
                .level("BoundedStack")
                .predicate("capacity > 0", |s: &BoundedStack| s.capacity > 0)
                .predicate("len <= capacity", |s: &BoundedStack| s.items.len() <= s.capacity)
                .build()
        })
    }

    fn reentrancy(&self) -> &Reentrancy {
        &self.reentrancy
    }
}

#[derive(Debug, PartialEq)]
enum StackError {
    Full,
    Empty,
}

impl BoundedStack {
    fn new(capacity: usize, config: &ContractConfig) -> Result<Self, ContractViolation> {
        Contract::new("BoundedStack::new")
            .with_config(config)
            .precondition("capacity > 0", |c: &usize| *c > 0)
            .construct(&capacity, |c| BoundedStack {
                items: Vec::with_capacity(*c),
                capacity: *c,
                reentrancy: Reentrancy::new(),
            })
    }

    fn push(&mut self, value: i32, config: &ContractConfig) -> Result<(), CallError<StackError>> {
        Contract::new("BoundedStack::push")
            .with_config(config)
            .old("len", |s: &BoundedStack| s.items.len())
            .postcondition("len == old len + 1", |s, old, _| {
                old.get::<usize>("len") == Some(&(s.items.len() - 1))
            })
            .except("unchanged", |s, old| {
                old.get::<usize>("len") == Some(&s.items.len())
            })
            .try_call_public(self, |s| {
                if s.items.len() == s.capacity {
                    return Err(StackError::Full);
                }
                s.items.push(value);
                Ok(())
            })
    }

    fn pop(&mut self, config: &ContractConfig) -> Result<i32, CallError<StackError>> {
        Contract::new("BoundedStack::pop")
            .with_config(config)
            .try_call_public(self, |s| s.items.pop().ok_or(StackError::Empty))
    }
}

/// Keeps its elements in ascending order
#[derive(Debug)]
struct SortedStack {
    inner: BoundedStack,
    reentrancy: Reentrancy,
}

fn as_bounded(s: &SortedStack) -> &BoundedStack {
    &s.inner
}

impl Invariant for SortedStack {
    fn invariant_chain() -> &'static InvariantChain<Self> {
        static CHAIN: OnceLock<InvariantChain<SortedStack>> = OnceLock::new();
        CHAIN.get_or_init(|| {
            InvariantChain::builder()
                .inherit(BoundedStack::invariant_chain(), as_bounded)
                .level("SortedStack")
                .predicate("ascending", |s: &SortedStack| {
                    s.inner.items.windows(2).all(|w| w[0] <= w[1])
                })
                .build()
        })
    }

    fn reentrancy(&self) -> &Reentrancy {
        &self.reentrancy
    }
}

impl SortedStack {
    fn new(capacity: usize, config: &ContractConfig) -> Result<Self, ContractViolation> {
        Ok(SortedStack {
            inner: BoundedStack::new(capacity, config)?,
            reentrancy: Reentrancy::new(),
        })
    }

    /// Push keeping order: pops everything larger, pushes, pushes back
    fn insert(&mut self, value: i32, config: &ContractConfig) -> Result<(), CallError<StackError>> {
        Contract::new("SortedStack::insert")
            .with_config(config)
            .try_call_public(self, |s| -> Result<(), CallError<StackError>> {
                if s.inner.items.len() == s.inner.capacity {
                    return Err(CallError::Failed(StackError::Full));
                }
                let mut larger = Vec::new();
                while s.inner.items.last().is_some_and(|top| *top > value) {
                    larger.push(s.inner.pop(config)?);
                }
                s.inner.push(value, config)?;
                while let Some(v) = larger.pop() {
                    s.inner.push(v, config)?;
                }
                Ok(())
            })
            .map_err(|e| match e {
                CallError::Violation(v) => CallError::Violation(v),
                CallError::Failed(inner) => inner,
            })
    }

    /// Pushes without ordering; breaks the derived level
    fn append_unsorted(&mut self, value: i32, config: &ContractConfig) -> Result<(), ContractViolation> {
        Contract::new("SortedStack::append_unsorted")
            .with_config(config)
            .call_public(self, |s| s.inner.items.insert(0, value))
    }

    fn overfill(&mut self, config: &ContractConfig) -> Result<(), ContractViolation> {
        Contract::new("SortedStack::overfill")
            .with_config(config)
            .call_public(self, |s| {
                let top = s.inner.items.last().copied().unwrap_or(0);
                s.inner.items.resize(s.inner.capacity + 1, top);
            })
    }
}

#[test]
fn test_chain_orders_base_levels_first() {
    let chain = SortedStack::invariant_chain();
    assert_eq!(chain.level_names(), vec!["BoundedStack", "SortedStack"]);
    assert_eq!(chain.len(), 3);
}

#[test]
fn test_constructor_rejects_zero_capacity() {
    let config = ContractConfig::new();
    let violation = BoundedStack::new(0, &config).unwrap_err();
    assert_eq!(violation.kind(), ContractKind::Precondition);
}

#[test]
fn test_insert_keeps_order() {
    let config = ContractConfig::new();
    let mut stack = SortedStack::new(4, &config).unwrap();

    for value in [3, 1, 2] {
        stack.insert(value, &config).unwrap();
    }

    assert_eq!(stack.inner.items, vec![1, 2, 3]);
    assert_eq!(stack.reentrancy.depth(), 0);
}

#[test]
fn test_full_stack_reports_failure_without_violation() {
    let config = ContractConfig::new();
    let mut stack = SortedStack::new(1, &config).unwrap();
    stack.insert(5, &config).unwrap();

    let err = stack.insert(6, &config).unwrap_err();
    assert_eq!(err.failure(), Some(&StackError::Full));
    assert_eq!(stack.inner.items, vec![5]);
}

#[test]
fn test_derived_level_violation() {
    let config = ContractConfig::new();
    let mut stack = SortedStack::new(3, &config).unwrap();
    stack.insert(1, &config).unwrap();

    let violation = stack.append_unsorted(9, &config).unwrap_err();
    assert_eq!(violation.level(), Some("SortedStack"));
    assert_eq!(violation.description(), "ascending");
    assert!(matches!(
        violation,
        ContractViolation::Invariant {
            phase: InvariantPhase::Exit,
            ..
        }
    ));
}

#[test]
fn test_base_level_checked_before_derived_level() {
    let config = ContractConfig::new();
    let mut stack = SortedStack::new(2, &config).unwrap();

    let violation = stack.overfill(&config).unwrap_err();
    assert_eq!(violation.level(), Some("BoundedStack"));
    assert_eq!(violation.description(), "len <= capacity");
}

proptest! {
    #[test]
    fn prop_inserts_never_violate(values in prop::collection::vec(-100i32..100, 0..16)) {
        let config = ContractConfig::new();
        let mut stack = SortedStack::new(8, &config).unwrap();

        for value in values {
            match stack.insert(value, &config) {
                Ok(()) => {}
                Err(err) => {
                    prop_assert_eq!(err.failure(), Some(&StackError::Full));
                }
            }
        }

        prop_assert!(stack.check_invariant().is_ok());
        prop_assert!(stack.inner.items.len() <= 8);
    }
}
