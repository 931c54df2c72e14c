// SPDX-License-Identifier: MIT
//
// Lines and line segments.
//
// Both are stored as `offset + t * direction`. A `Line` is unbounded in `t`;
// a `LineSegment` covers `t` in `[0, 1]`, so its direction doubles as the
// vector from its start to its end. The point-in-polygon test in `mesh`
// casts a horizontal `Line` through the query point and walks the face
// edges as `LineSegment`s.

use crate::maths::{Coord, EPSILON, Real, fequal};

// ─── Line ────────────────────────────────────────────────────────────────────

/// An infinite line through `offset` along `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    /// Any point on the line.
    pub offset: Coord,
    /// Direction of the line. Need not be normalized, must not be zero.
    pub direction: Coord,
}

impl Line {
    /// Create a line through `offset` along `direction`.
    #[inline]
    #[must_use]
    pub const fn new(offset: Coord, direction: Coord) -> Self {
        Self { offset, direction }
    }

    /// The horizontal line passing through `through`.
    #[inline]
    #[must_use]
    pub const fn horizontal(through: Coord) -> Self {
        Self {
            offset: through,
            direction: Coord::X,
        }
    }

    /// Signed side of `point` relative to this line.
    ///
    /// Zero on the line; the sign flips when crossing it.
    #[inline]
    #[must_use]
    pub fn side(&self, point: Coord) -> Real {
        self.direction.perp_dot(point - self.offset)
    }
}

// ─── LineSegment ─────────────────────────────────────────────────────────────

/// A bounded segment from `offset` to `offset + direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// Start point.
    pub offset: Coord,
    /// Vector from the start point to the end point.
    pub direction: Coord,
}

impl LineSegment {
    /// The segment from `a` to `b`.
    #[inline]
    #[must_use]
    pub fn from_points(a: Coord, b: Coord) -> Self {
        Self {
            offset: a,
            direction: b - a,
        }
    }

    /// Start point.
    #[inline]
    #[must_use]
    pub const fn start(&self) -> Coord {
        self.offset
    }

    /// End point.
    #[inline]
    #[must_use]
    pub fn end(&self) -> Coord {
        self.offset + self.direction
    }

    /// Whether the segment touches or crosses `line`.
    ///
    /// An endpoint lying exactly on the line counts as crossing.
    #[inline]
    #[must_use]
    pub fn crosses(&self, line: &Line) -> bool {
        line.side(self.start()) * line.side(self.end()) <= 0.0
    }

    /// Whether the segment runs parallel to `line`.
    ///
    /// A zero-length segment is parallel to everything.
    #[inline]
    #[must_use]
    pub fn is_parallel(&self, line: &Line) -> bool {
        fequal(line.direction.perp_dot(self.direction), 0.0, EPSILON)
    }

    /// The point where the segment meets `line`, if it crosses it at a
    /// single point.
    #[must_use]
    pub fn intersection(&self, line: &Line) -> Option<Coord> {
        if self.is_parallel(line) || !self.crosses(line) {
            return None;
        }
        let t = line.direction.perp_dot(line.offset - self.offset)
            / line.direction.perp_dot(self.direction);
        Some(self.offset + self.direction * t.clamp(0.0, 1.0))
    }

    /// Whether `point` lies on the segment, endpoints included.
    #[must_use]
    pub fn contains(&self, point: Coord) -> bool {
        let rel = point - self.offset;
        let len_sq = self.direction.length_squared();

        if len_sq == 0.0 {
            return rel == Coord::ZERO;
        }

        let cross = self.direction.perp_dot(rel);
        if !fequal(cross, 0.0, EPSILON * len_sq.sqrt()) {
            return false;
        }

        let along = self.direction.dot(rel);
        (0.0..=len_sq).contains(&along)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
