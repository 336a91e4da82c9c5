//! Axis-aligned cell rectangles.

use serde::{Deserialize, Serialize};

use crate::address::column_index_to_name;
use crate::vector::Vector;

/// Distance (in cells) within which two rectangles count as adjacent.
const ADJACENCY_TOLERANCE: i64 = 1;

/// An inclusive block of cells from `upper_left` to `bottom_right`.
///
/// Always satisfies `upper_left.x <= bottom_right.x` and
/// `upper_left.y <= bottom_right.y`. Rectangles are immutable values;
/// merging produces a new rectangle. The derived `Ord` compares upper-left
/// corners first, then bottom-right corners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rectangle {
    pub upper_left: Vector,
    pub bottom_right: Vector,
}

impl Rectangle {
    /// Returned in place of a group whose merge pass did not converge.
    pub const INVALID: Rectangle = Rectangle {
        upper_left: Vector::new(-1, -1, 0),
        bottom_right: Vector::new(-1, -1, 0),
    };

    pub fn new(upper_left: Vector, bottom_right: Vector) -> Self {
        debug_assert!(
            upper_left.x <= bottom_right.x && upper_left.y <= bottom_right.y,
            "inverted rectangle {upper_left}..{bottom_right}"
        );
        Self {
            upper_left,
            bottom_right,
        }
    }

    /// A 1x1 rectangle covering a single cell.
    pub fn cell(v: Vector) -> Self {
        Self::new(v, v)
    }

    pub fn is_invalid(&self) -> bool {
        *self == Self::INVALID
    }

    pub fn width(&self) -> i64 {
        self.bottom_right.x - self.upper_left.x + 1
    }

    pub fn height(&self) -> i64 {
        self.bottom_right.y - self.upper_left.y + 1
    }

    /// Number of cells covered.
    pub fn area(&self) -> i64 {
        self.width() * self.height()
    }

    /// Length of the diagonal, in cells.
    pub fn diagonal(&self) -> f64 {
        let w = self.width() as f64;
        let h = self.height() as f64;
        (w * w + h * h).sqrt()
    }

    pub fn is_single_row(&self) -> bool {
        self.upper_left.y == self.bottom_right.y
    }

    pub fn is_single_column(&self) -> bool {
        self.upper_left.x == self.bottom_right.x
    }

    pub fn contains(&self, v: Vector) -> bool {
        v.x >= self.upper_left.x
            && v.x <= self.bottom_right.x
            && v.y >= self.upper_left.y
            && v.y <= self.bottom_right.y
    }

    /// Number of cells shared with `other`.
    pub fn overlap(&self, other: &Rectangle) -> i64 {
        let w = self.bottom_right.x.min(other.bottom_right.x)
            - self.upper_left.x.max(other.upper_left.x)
            + 1;
        let h = self.bottom_right.y.min(other.bottom_right.y)
            - self.upper_left.y.max(other.upper_left.y)
            + 1;
        w.max(0) * h.max(0)
    }

    /// Chebyshev adjacency: no gap wider than the tolerance on either axis.
    pub fn is_adjacent(&self, other: &Rectangle) -> bool {
        let (a1, a2) = (self.upper_left, self.bottom_right);
        let (b1, b2) = (other.upper_left, other.bottom_right);
        !(a1.x - b2.x > ADJACENCY_TOLERANCE
            || b1.x - a2.x > ADJACENCY_TOLERANCE
            || a1.y - b2.y > ADJACENCY_TOLERANCE
            || b1.y - a2.y > ADJACENCY_TOLERANCE)
    }

    /// Smallest rectangle enclosing both.
    pub fn bounding_box(&self, other: &Rectangle) -> Rectangle {
        Rectangle::new(
            Vector::cell(
                self.upper_left.x.min(other.upper_left.x),
                self.upper_left.y.min(other.upper_left.y),
            ),
            Vector::cell(
                self.bottom_right.x.max(other.bottom_right.x),
                self.bottom_right.y.max(other.bottom_right.y),
            ),
        )
    }

    /// True when the two rectangles are adjacent and their union is itself
    /// a gap-free rectangle.
    pub fn is_mergeable(&self, other: &Rectangle) -> bool {
        self.is_adjacent(other)
            && self.area() + other.area() - self.overlap(other)
                == self.bounding_box(other).area()
    }

    /// Every cell of the rectangle, column by column.
    pub fn cells(&self) -> impl Iterator<Item = Vector> {
        expand(self.upper_left, self.bottom_right)
    }

    /// A1 notation, e.g. `B3:D7`. A single cell renders as `B3`.
    pub fn to_a1(&self) -> String {
        let ul = format!(
            "{}{}",
            column_index_to_name(self.upper_left.x),
            self.upper_left.y
        );
        if self.upper_left == self.bottom_right {
            return ul;
        }
        format!(
            "{ul}:{}{}",
            column_index_to_name(self.bottom_right.x),
            self.bottom_right.y
        )
    }
}

impl std::fmt::Display for Rectangle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.upper_left, self.bottom_right)
    }
}

/// Lazily enumerate the cells `(i, j, 0)` for `i` in `ul.x..=br.x` and
/// `j` in `ul.y..=br.y`. Allocates nothing; an inverted corner pair yields
/// no cells.
pub fn expand(ul: Vector, br: Vector) -> impl Iterator<Item = Vector> {
    (ul.x..=br.x).flat_map(move |i| (ul.y..=br.y).map(move |j| Vector::cell(i, j)))
}
