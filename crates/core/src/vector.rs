//! Dependency vectors.
//!
//! A `Vector` is overloaded the same way everywhere in gridlint:
//!
//! - as a dependency offset, `(dx, dy, 0)` is a reference relative to the
//!   formula's own cell and `(0, 0, 1)` stands for one numeric constant;
//! - as a cell address, `(col, row, 0)` is a 1-based column/row pair.

use std::iter::Sum;
use std::ops::{Add, Sub};

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Weight applied to the L1 norm in [`Vector::weighted_norm`].
pub const NORM_MULTIPLIER: i64 = 1;

/// A `(x, y, c)` triple.
///
/// Equality, hashing and ordering are structural over all three fields, so a
/// `Vector` can be used directly as a map key. The derived `Ord` is the
/// lexicographic `(x, y, c)` order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Vector {
    pub x: i64,
    pub y: i64,
    pub c: i64,
}

impl Vector {
    pub const ZERO: Vector = Vector::new(0, 0, 0);

    /// The marker contributed by one numeric literal in a formula.
    pub const CONSTANT: Vector = Vector::new(0, 0, 1);

    #[inline]
    pub const fn new(x: i64, y: i64, c: i64) -> Self {
        Self { x, y, c }
    }

    /// A 1-based cell address.
    #[inline]
    pub const fn cell(col: i64, row: i64) -> Self {
        Self { x: col, y: row, c: 0 }
    }

    /// True when this vector is the numeric-constant marker.
    pub fn is_constant(&self) -> bool {
        self.c == 1
    }

    /// True unless this vector is a pure constant marker `(0, 0, c != 0)`.
    pub fn is_reference(&self) -> bool {
        !(self.x == 0 && self.y == 0 && self.c != 0)
    }

    /// Weighted L1 norm `|x| + |y| + c`.
    ///
    /// Used as the equivalence-class key for formulas. The mapping is
    /// many-to-one: distinct vectors with the same norm collide. Arithmetic
    /// wraps, so the result is defined for every `i64` input.
    pub fn weighted_norm(&self) -> i64 {
        let l1 = self
            .x
            .wrapping_abs()
            .wrapping_add(self.y.wrapping_abs())
            .wrapping_add(self.c);
        NORM_MULTIPLIER.wrapping_mul(l1)
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, other: Vector) -> Vector {
        Vector::new(
            self.x.wrapping_add(other.x),
            self.y.wrapping_add(other.y),
            self.c.wrapping_add(other.c),
        )
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, other: Vector) -> Vector {
        Vector::new(
            self.x.wrapping_sub(other.x),
            self.y.wrapping_sub(other.y),
            self.c.wrapping_sub(other.c),
        )
    }
}

impl Sum for Vector {
    fn sum<I: Iterator<Item = Vector>>(iter: I) -> Vector {
        iter.fold(Vector::ZERO, |acc, v| acc + v)
    }
}

impl<'a> Sum<&'a Vector> for Vector {
    fn sum<I: Iterator<Item = &'a Vector>>(iter: I) -> Vector {
        iter.fold(Vector::ZERO, |acc, v| acc + *v)
    }
}

impl std::fmt::Display for Vector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{},{},{}>", self.x, self.y, self.c)
    }
}

/// Deduplicate by value, keeping the first occurrence of each vector.
pub fn to_set(vs: &[Vector]) -> Vec<Vector> {
    let mut seen = FxHashSet::default();
    vs.iter().copied().filter(|v| seen.insert(*v)).collect()
}

/// True when both slices contain the same vectors, ignoring order and
/// multiplicity.
pub fn vector_set_equals(a: &[Vector], b: &[Vector]) -> bool {
    let left: FxHashSet<Vector> = a.iter().copied().collect();
    let right: FxHashSet<Vector> = b.iter().copied().collect();
    left == right
}
