//! Command implementations
//!
//! Each command writes its report to the given writer and runs under the
//! process-wide contract configuration installed by `main`.

pub mod factorial;
pub mod increment;
pub mod show_config;
pub mod triangle;

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
