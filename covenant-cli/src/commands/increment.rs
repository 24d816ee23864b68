//! Increment a value under contract

use anyhow::{Context, Result};
use covenant_demos::increment;
use std::io::Write;

pub fn run(out: &mut impl Write, value: i32) -> Result<()> {
    let mut x = value;
    writeln!(out, "{}", x)?;
    let old = increment(&mut x).with_context(|| format!("Failed to increment {}", value))?;
    writeln!(out, "{}:{}", x, old)?;
    Ok(())
}
