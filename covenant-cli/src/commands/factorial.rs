//! Print a factorial table

use anyhow::Result;
use colored::*;
use covenant_contracts::CallError;
use covenant_demos::factorial_table;
use std::io::Write;

/// Print `n:n!` for `n` in `0..=upto`, stopping at the first value that
/// does not fit
pub fn run(out: &mut impl Write, upto: i32) -> Result<()> {
    for (n, value) in factorial_table(upto) {
        match value {
            Ok(value) => writeln!(out, "{}:{}", n, value)?,
            Err(CallError::Failed(e)) => {
                writeln!(out, "{} {}", "stopping:".yellow(), e)?;
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
