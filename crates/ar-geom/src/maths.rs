// SPDX-License-Identifier: MIT
//
// Scalar helpers shared by the geometry types.
//
// All rounding helpers take a `base`: the spacing of the grid being snapped
// to. A base of 1 is ordinary rounding; a base of 0.5 snaps to halves; a
// base of 2 snaps to even numbers. Terminal rasterization uses these with
// the cell resolution as the base.

use glam::DVec2;

/// Scalar type used for all geometry.
pub type Real = f64;

/// A 2D point or vector in local, world, or terminal space.
pub type Coord = DVec2;

/// Machine epsilon for [`Real`], the default tolerance of [`fequal`].
pub const EPSILON: Real = Real::EPSILON;

/// Whether `a` and `b` are equal up to floating point noise.
///
/// The tolerance `e` is scaled by the magnitude of the larger operand, but
/// never drops below `e` itself, so comparisons against zero still work.
#[inline]
#[must_use]
pub fn fequal(a: Real, b: Real, e: Real) -> bool {
    (a - b).abs() <= e * a.abs().max(b.abs()).max(1.0)
}

/// Whether `a` and `b` are within a fixed absolute `margin` of each other.
#[inline]
#[must_use]
pub fn compare_margin(a: Real, b: Real, margin: Real) -> bool {
    (a - b).abs() <= margin
}

/// Round `val` to the nearest multiple of `base`.
///
/// Halfway values round away from zero:
///
/// ```
/// use ar_geom::maths::round;
///
/// assert_eq!(round(2.5, 1.0), 3.0);
/// assert_eq!(round(2.5, 2.0), 2.0);
/// assert_eq!(round(2.5, 0.5), 2.5);
/// ```
#[inline]
#[must_use]
pub fn round(val: Real, base: Real) -> Real {
    (val / base).round() * base
}

/// Round `val` down to the nearest multiple of `base`.
#[inline]
#[must_use]
pub fn floor(val: Real, base: Real) -> Real {
    (val / base).floor() * base
}

/// Round `val` up to the nearest multiple of `base`.
#[inline]
#[must_use]
pub fn ceil(val: Real, base: Real) -> Real {
    (val / base).ceil() * base
}

/// [`round`] applied to both axes.
#[inline]
#[must_use]
pub fn round_coord(coord: Coord, base: Real) -> Coord {
    Coord::new(round(coord.x, base), round(coord.y, base))
}

/// [`floor`] applied to both axes.
#[inline]
#[must_use]
pub fn floor_coord(coord: Coord, base: Real) -> Coord {
    Coord::new(floor(coord.x, base), floor(coord.y, base))
}

/// [`ceil`] applied to both axes.
#[inline]
#[must_use]
pub fn ceil_coord(coord: Coord, base: Real) -> Coord {
    Coord::new(ceil(coord.x, base), ceil(coord.y, base))
}

/// Move `coord` to the centre of the grid cell of size `resolution` that
/// contains it.
///
/// Cell `n` spans `[n * resolution, (n + 1) * resolution)`, so with a
/// resolution of 1 the point `(2.3, 0.9)` lands on `(2.5, 0.5)`.
#[inline]
#[must_use]
pub fn snap_to_cell_centre(coord: Coord, resolution: Real) -> Coord {
    let half = resolution / 2.0;
    Coord::new(
        floor(coord.x, resolution) + half,
        floor(coord.y, resolution) + half,
    )
}

// ─── Tests ───────────────────────────────────────────────────────────────────
