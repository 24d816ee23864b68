//! Triangles under contract
//!
//! [`Triangle`] only promises finite coordinates. [`IsoscelesTriangle`]
//! embeds a `Triangle` and adds its own level on top, so every public
//! operation on it checks the `Triangle` clauses first and then its own.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::sync::OnceLock;

use covenant_contracts::{
    CallError, Contract, ContractViolation, Invariant, InvariantChain, Reentrancy,
};
use tracing::debug;

/// Tolerance for comparing lengths
pub const EPSILON: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Rotate counter-clockwise about the origin by `angle` radians
    pub fn rotate(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, factor: f64) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

pub fn dist_squared(a: Point, b: Point) -> f64 {
    let d = a - b;
    d.x * d.x + d.y * d.y
}

pub fn distance(a: Point, b: Point) -> f64 {
    dist_squared(a, b).sqrt()
}

pub fn close_enough(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn two_close(lengths: [f64; 3]) -> bool {
    let [a, b, c] = lengths;
    close_enough(a, b) || close_enough(b, c) || close_enough(a, c)
}

fn squared_sides([p1, p2, p3]: [Point; 3]) -> [f64; 3] {
    [dist_squared(p1, p2), dist_squared(p2, p3), dist_squared(p1, p3)]
}

#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    p1: Point,
    p2: Point,
    p3: Point,
    reentrancy: Reentrancy,
}

impl Invariant for Triangle {
    fn invariant_chain() -> &'static InvariantChain<Self> {
        static CHAIN: OnceLock<InvariantChain<Triangle>> = OnceLock::new();
        CHAIN.get_or_init(|| {
            InvariantChain::builder()
                .level("Triangle")
                .predicate("all coordinates are finite", |t: &Triangle| {
                    t.vertices().iter().all(|p| p.is_finite())
                })
                .build()
        })
    }

    fn reentrancy(&self) -> &Reentrancy {
        &self.reentrancy
    }
}

impl Triangle {
    pub fn new(p1: Point, p2: Point, p3: Point) -> Result<Self, ContractViolation> {
        Contract::new("Triangle::new")
            .construct(&[p1, p2, p3], |&[p1, p2, p3]| Triangle::from_points(p1, p2, p3))
    }

    pub(crate) fn from_points(p1: Point, p2: Point, p3: Point) -> Self {
        Self {
            p1,
            p2,
            p3,
            reentrancy: Reentrancy::new(),
        }
    }

    /// Move the coordinate origin to `origin`
    pub fn translate(&mut self, origin: Point) -> Result<(), ContractViolation> {
        Contract::new("Triangle::translate")
            .precondition("origin is finite", move |_: &Triangle| origin.is_finite())
            .call_public(self, |t| t.shift(origin))
    }

    /// Rotate about the origin
    pub fn rotate(&mut self, angle: f64) -> Result<(), ContractViolation> {
        Contract::new("Triangle::rotate")
            .precondition("angle is finite", move |_: &Triangle| angle.is_finite())
            .call_public(self, |t| t.turn(angle))
    }

    /// Scale about the origin
    pub fn scale(&mut self, factor: f64) -> Result<(), ContractViolation> {
        Contract::new("Triangle::scale")
            .precondition("factor is finite", move |_: &Triangle| factor.is_finite())
            .call_public(self, |t| t.stretch(factor))
    }

    pub fn vertices(&self) -> [Point; 3] {
        [self.p1, self.p2, self.p3]
    }

    /// Lengths of p1-p2, p2-p3 and p1-p3
    pub fn sides(&self) -> [f64; 3] {
        [
            distance(self.p1, self.p2),
            distance(self.p2, self.p3),
            distance(self.p1, self.p3),
        ]
    }

    pub(crate) fn shift(&mut self, origin: Point) {
        for p in self.points_mut() {
            *p = *p - origin;
        }
    }

    pub(crate) fn turn(&mut self, angle: f64) {
        for p in self.points_mut() {
            *p = p.rotate(angle);
        }
    }

    pub(crate) fn stretch(&mut self, factor: f64) {
        for p in self.points_mut() {
            *p = *p * factor;
        }
    }

    fn points_mut(&mut self) -> [&mut Point; 3] {
        [&mut self.p1, &mut self.p2, &mut self.p3]
    }
}

impl fmt::Display for Triangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.p1, self.p2, self.p3)
    }
}

/// A triangle with at least two sides of equal length
#[derive(Debug, Clone, PartialEq)]
pub struct IsoscelesTriangle {
    base: Triangle,
    reentrancy: Reentrancy,
}

fn as_triangle(t: &IsoscelesTriangle) -> &Triangle {
    &t.base
}

impl Invariant for IsoscelesTriangle {
    fn invariant_chain() -> &'static InvariantChain<Self> {
        static CHAIN: OnceLock<InvariantChain<IsoscelesTriangle>> = OnceLock::new();
        CHAIN.get_or_init(|| {
            InvariantChain::builder()
                .inherit(Triangle::invariant_chain(), as_triangle)
                .level("IsoscelesTriangle")
                .predicate("two sides of equal length", |t: &IsoscelesTriangle| {
                    two_close(t.base.sides())
                })
                .build()
        })
    }

    fn reentrancy(&self) -> &Reentrancy {
        &self.reentrancy
    }
}

impl IsoscelesTriangle {
    /// Build from three vertices, two of which must be equidistant from
    /// the third
    pub fn new(p1: Point, p2: Point, p3: Point) -> Result<Self, ContractViolation> {
        Contract::new("IsoscelesTriangle::new")
            .precondition("two sides of equal squared length", |points: &[Point; 3]| {
                two_close(squared_sides(*points))
            })
            .construct(&[p1, p2, p3], |&[p1, p2, p3]| IsoscelesTriangle {
                base: Triangle::from_points(p1, p2, p3),
                reentrancy: Reentrancy::new(),
            })
    }

    pub fn translate(&mut self, origin: Point) -> Result<(), ContractViolation> {
        Contract::new("IsoscelesTriangle::translate")
            .precondition("origin is finite", move |_: &IsoscelesTriangle| {
                origin.is_finite()
            })
            .call_public(self, |t| t.base.shift(origin))
    }

    pub fn rotate(&mut self, angle: f64) -> Result<(), ContractViolation> {
        Contract::new("IsoscelesTriangle::rotate")
            .precondition("angle is finite", move |_: &IsoscelesTriangle| {
                angle.is_finite()
            })
            .call_public(self, |t| t.base.turn(angle))
    }

    pub fn scale(&mut self, factor: f64) -> Result<(), ContractViolation> {
        Contract::new("IsoscelesTriangle::scale")
            .precondition("factor is finite", move |_: &IsoscelesTriangle| {
                factor.is_finite()
            })
            .call_public(self, |t| t.base.stretch(factor))
    }

    /// Rotate about `pivot` instead of the origin
    ///
    /// Built from three public operations on `self`; the invariant is
    /// checked around the whole composite, not around each step. A
    /// violation in one of the steps fails the composite, which skips its
    /// postcondition and leaves the triangle where that step stopped.
    pub fn rotate_about(&mut self, pivot: Point, angle: f64) -> Result<(), ContractViolation> {
        Contract::new("IsoscelesTriangle::rotate_about")
            .old("sides", |t: &IsoscelesTriangle| t.sides())
            .postcondition("side lengths preserved", |t, old, _| {
                old.get::<[f64; 3]>("sides").is_some_and(|before| {
                    before
                        .iter()
                        .zip(t.sides())
                        .all(|(a, b)| close_enough(*a, b))
                })
            })
            .try_call_public(self, |t| {
                debug!("Rotating {} about {} by {}", t, pivot, angle);
                t.translate(pivot)?;
                t.rotate(angle)?;
                t.translate(-pivot)
            })
            .map_err(CallError::into_violation)
    }

    /// The embedded base triangle
    pub fn triangle(&self) -> &Triangle {
        &self.base
    }

    pub fn vertices(&self) -> [Point; 3] {
        self.base.vertices()
    }

    pub fn sides(&self) -> [f64; 3] {
        self.base.sides()
    }
}

impl fmt::Display for IsoscelesTriangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.base, f)
    }
}

#[cfg(test)]
#[path = "geometry/geometry_tests.rs"]
mod tests;
