//! The three demo programs run end to end under the default configuration

use std::f64::consts::PI;

use covenant_contracts::CallError;
use covenant_demos::{factorial_table, increment, FactorialError, IsoscelesTriangle, Point};

#[test]
fn test_factorial_program() {
    let mut printed = Vec::new();
    let mut stopped_at = None;

    for (n, value) in factorial_table(99) {
        match value {
            Ok(value) => printed.push(format!("{}:{}", n, value)),
            Err(CallError::Failed(FactorialError::Overflow(at))) => {
                stopped_at = Some(at);
                break;
            }
            Err(CallError::Violation(v)) => panic!("unexpected violation: {}", v),
        }
    }

    assert_eq!(printed.len(), 35);
    assert_eq!(printed[0], "0:1");
    assert_eq!(printed[10], "10:3628800");
    assert_eq!(stopped_at, Some(35));
}

#[test]
fn test_increment_program() {
    let mut x = 5;
    let old = increment(&mut x).unwrap();
    assert_eq!(format!("{}:{}", x, old), "6:5");
}

#[test]
fn test_triangle_program() {
    let mut t = IsoscelesTriangle::new(
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(0.0, 1.0),
    )
    .unwrap();
    let mut printed = vec![t.to_string()];

    t.translate(Point::new(2.0, 2.0)).unwrap();
    printed.push(t.to_string());
    t.rotate(PI / 6.0).unwrap();
    printed.push(t.to_string());
    t.scale(1.5).unwrap();
    printed.push(t.to_string());

    assert_eq!(printed[0], "(0,0):(1,0):(0,1)");
    assert_eq!(printed[1], "(-2,-2):(-1,-2):(-2,-1)");
    assert_eq!(printed.len(), 4);
    let [a, b, c] = t.sides();
    assert!((a - 1.5).abs() < 1e-9);
    assert!((b - 1.5 * 2f64.sqrt()).abs() < 1e-9);
    assert!((c - 1.5).abs() < 1e-9);
}
