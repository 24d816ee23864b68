//! Example domains written against `covenant-contracts`
//!
//! - [`factorial`]: a free function with pre- and postconditions
//! - [`increment`]: old values and an exception guarantee
//! - [`geometry`]: constructors, public methods and an invariant inherited
//!   from a base type

pub mod factorial;
pub mod geometry;
pub mod increment;

pub use factorial::{factorial, factorial_table, factorial_with, FactorialError, MAX_ARGUMENT};
pub use geometry::{IsoscelesTriangle, Point, Triangle};
pub use increment::{increment, increment_with, try_increment, try_increment_with, IncrementError};
