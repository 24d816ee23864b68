//! Transform an isosceles triangle step by step

use anyhow::{Context, Result};
use covenant_demos::{IsoscelesTriangle, Point};
use std::io::Write;

/// Construct, translate to (2,2), rotate by `angle` and scale by `factor`,
/// printing the vertices after each step
pub fn run(out: &mut impl Write, angle: f64, factor: f64) -> Result<()> {
    let mut t = IsoscelesTriangle::new(
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(0.0, 1.0),
    )
    .context("Failed to construct triangle")?;
    writeln!(out, "{}", t)?;

    t.translate(Point::new(2.0, 2.0))
        .context("Failed to translate triangle")?;
    writeln!(out, "{}", t)?;

    t.rotate(angle).context("Failed to rotate triangle")?;
    writeln!(out, "{}", t)?;

    t.scale(factor).context("Failed to scale triangle")?;
    writeln!(out, "{}", t)?;

    Ok(())
}
