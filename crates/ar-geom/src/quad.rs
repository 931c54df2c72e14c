// SPDX-License-Identifier: MIT
//
// Quad — an axis-aligned rectangle in local space, plus the `Bounded` trait
// every drawable shape implements so the renderer can find the cells it
// might touch before testing any of them.

use crate::maths::{Coord, Real, snap_to_cell_centre};
use crate::mesh::Mesh;
use crate::transform::Transform;

/// Axis-aligned rectangle covering `offset ..= offset + size`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Quad {
    /// Top-left corner in local space.
    pub offset: Coord,
    /// Width and height.
    pub size: Coord,
}

impl Quad {
    #[inline]
    #[must_use]
    pub const fn new(offset: Coord, size: Coord) -> Self {
        Self { offset, size }
    }

    /// The quad spanning the two opposite corners `a` and `b`, in any order.
    #[must_use]
    pub fn from_corners(a: Coord, b: Coord) -> Self {
        let min = a.min(b);
        Self {
            offset: min,
            size: a.max(b) - min,
        }
    }

    /// The four corners, clockwise on a y-down screen starting at `offset`.
    #[must_use]
    pub fn corners(&self) -> [Coord; 4] {
        let Coord { x, y } = self.offset;
        let Coord { x: w, y: h } = self.size;
        [
            Coord::new(x, y),
            Coord::new(x + w, y),
            Coord::new(x + w, y + h),
            Coord::new(x, y + h),
        ]
    }

    /// Whether either side has no length.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size.x == 0.0 || self.size.y == 0.0
    }

    /// Centre of the quad mapped into world space.
    #[must_use]
    pub fn centre_point(&self, transform: &Transform) -> Coord {
        transform.apply_transform(self.offset + self.size / 2.0)
    }

    /// Whether the world-space `coord` lies in the quad once `transform` is
    /// undone. Edges are inclusive.
    #[must_use]
    pub fn is_inside(&self, coord: Coord, transform: &Transform) -> bool {
        let local = transform.reverse_transform(coord) - self.offset;
        (0.0..=self.size.x).contains(&local.x) && (0.0..=self.size.y).contains(&local.y)
    }

    /// [`is_inside`](Self::is_inside) for the centre of the grid cell of size
    /// `resolution` containing `coord`.
    #[must_use]
    pub fn is_inside_grid(&self, coord: Coord, transform: &Transform, resolution: Real) -> bool {
        self.is_inside(snap_to_cell_centre(coord, resolution), transform)
    }
}

/// Shapes that can report an axis-aligned box around themselves in local
/// space.
pub trait Bounded {
    fn local_bounds(&self) -> Quad;
}

impl Bounded for Quad {
    fn local_bounds(&self) -> Quad {
        *self
    }
}

impl Bounded for Mesh {
    /// Box around every vertex, referenced by a face or not. Zero-sized at
    /// the origin for an empty mesh.
    fn local_bounds(&self) -> Quad {
        let mut verts = self.vertices().iter().copied();
        let Some(first) = verts.next() else {
            return Quad::default();
        };
        let (min, max) = verts.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Quad::from_corners(min, max)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
