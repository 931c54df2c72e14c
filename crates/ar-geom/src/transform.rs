// SPDX-License-Identifier: MIT
//
// Transform — local space ↔ world space.
//
// A transform is a position offset, a non-uniform scale, a rotation in
// radians, and an origin (pivot) the scale and rotation happen around.
//
// The affine matrix is composed scale → translate → rotate and its inverse
// is the literal matrix inverse. Only the linear part of either matrix is
// used when mapping points; the translation is applied separately so the
// pivot math stays explicit:
//
//   world = L  · (local - origin) + position + origin
//   local = L⁻¹ · (world - origin - position) + origin
//
// Both matrices are cached. Any setter drops the cache and the next mapping
// call recomputes it. The cache sits in a `Cell`, so mapping works through
// a shared reference; a Transform is therefore `Send` but not `Sync`.
//
// Identity shortcut: with zero position, unit scale, and a rotation that is
// zero up to epsilon, both mappings return their input untouched without
// ever building a matrix. Static shapes hit this path every frame.

use std::cell::Cell;

use glam::{DAffine2, DMat2};

use crate::maths::{Coord, EPSILON, Real, fequal, snap_to_cell_centre};

/// Cached linear parts of the forward and inverse matrices.
#[derive(Debug, Clone, Copy)]
struct Matrices {
    forward: DMat2,
    inverse: DMat2,
}

/// Affine 2D transform with a pivot and lazily cached matrices.
///
/// ```
/// use ar_geom::{Coord, Transform};
///
/// let t = Transform::new()
///     .with_position(Coord::new(10.0, 0.0))
///     .with_rotation(std::f64::consts::FRAC_PI_2);
///
/// let world = t.apply_transform(Coord::new(1.0, 0.0));
/// let back = t.reverse_transform(world);
/// assert!((back - Coord::new(1.0, 0.0)).length() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct Transform {
    position: Coord,
    scale: Coord,
    rotation: Real,
    origin: Coord,
    cache: Cell<Option<Matrices>>,
}

impl Transform {
    /// The identity transform.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            position: Coord::ZERO,
            scale: Coord::ONE,
            rotation: 0.0,
            origin: Coord::ZERO,
            cache: Cell::new(None),
        }
    }

    // ─── Builders ────────────────────────────────────────────────────────

    /// Set the position offset, builder style.
    #[must_use]
    pub fn with_position(mut self, position: Coord) -> Self {
        self.set_position(position);
        self
    }

    /// Set the scale, builder style.
    #[must_use]
    pub fn with_scale(mut self, scale: Coord) -> Self {
        self.set_scale(scale);
        self
    }

    /// Set the rotation in radians, builder style.
    #[must_use]
    pub fn with_rotation(mut self, rotation: Real) -> Self {
        self.set_rotation(rotation);
        self
    }

    /// Set the pivot, builder style.
    #[must_use]
    pub fn with_origin(mut self, origin: Coord) -> Self {
        self.set_origin(origin);
        self
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub const fn position(&self) -> Coord {
        self.position
    }

    #[inline]
    #[must_use]
    pub const fn scale(&self) -> Coord {
        self.scale
    }

    /// Rotation in radians.
    #[inline]
    #[must_use]
    pub const fn rotation(&self) -> Real {
        self.rotation
    }

    /// The pivot scale and rotation are applied around.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> Coord {
        self.origin
    }

    pub fn set_position(&mut self, position: Coord) {
        self.position = position;
        self.invalidate();
    }

    pub fn set_scale(&mut self, scale: Coord) {
        self.scale = scale;
        self.invalidate();
    }

    pub fn set_rotation(&mut self, rotation: Real) {
        self.rotation = rotation;
        self.invalidate();
    }

    pub fn set_origin(&mut self, origin: Coord) {
        self.origin = origin;
        self.invalidate();
    }

    /// Whether mapping through this transform is a no-op.
    #[inline]
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.position == Coord::ZERO
            && self.scale == Coord::ONE
            && fequal(self.rotation, 0.0, EPSILON)
    }

    /// Whether the cached matrices are current.
    #[inline]
    #[must_use]
    pub fn has_matrix(&self) -> bool {
        self.cache.get().is_some()
    }

    // ─── Mapping ─────────────────────────────────────────────────────────

    /// Map a local-space point into world space.
    #[must_use]
    pub fn apply_transform(&self, coord: Coord) -> Coord {
        if self.is_identity() {
            return coord;
        }
        let m = self.matrices();
        m.forward * (coord - self.origin) + self.position + self.origin
    }

    /// Map a world-space point back into local space.
    ///
    /// Exact inverse of [`apply_transform`](Self::apply_transform) up to
    /// floating point error. A zero scale axis has no inverse.
    #[must_use]
    pub fn reverse_transform(&self, coord: Coord) -> Coord {
        if self.is_identity() {
            return coord;
        }
        let m = self.matrices();
        debug_assert!(
            m.forward.determinant() != 0.0,
            "cannot reverse a transform with a zero scale axis: {:?}",
            self.scale
        );
        m.inverse * (coord - self.origin - self.position) + self.origin
    }

    /// Snap `coord` to the centre of its grid cell, then map it back into
    /// local space.
    #[must_use]
    pub fn reverse_transform_grid(&self, coord: Coord, resolution: Real) -> Coord {
        self.reverse_transform(snap_to_cell_centre(coord, resolution))
    }

    // ─── Cache ───────────────────────────────────────────────────────────

    #[inline]
    fn invalidate(&self) {
        self.cache.set(None);
    }

    fn matrices(&self) -> Matrices {
        if let Some(m) = self.cache.get() {
            return m;
        }
        let m = self.compute();
        self.cache.set(Some(m));
        m
    }

    fn compute(&self) -> Matrices {
        let affine = DAffine2::from_scale(self.scale)
            * DAffine2::from_translation(self.position)
            * DAffine2::from_angle(self.rotation);
        let inverse = affine.inverse();

        Matrices {
            forward: affine.matrix2,
            inverse: inverse.matrix2,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
