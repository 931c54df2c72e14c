// SPDX-License-Identifier: MIT
//
// ar-geom — the geometry half of the asciir pipeline.
//
// Shapes live in their own local space as a Mesh (or a Quad), get mapped
// into world space by a Transform, and are then handed to the viewport
// projector in ar-render which cuts them down to the terminal rectangle.
// Everything here is synchronous and allocation-light; nothing knows about
// terminals, colors, or escape codes.
//
// Coordinates are `f64` throughout. Terminal cells are addressed by
// snapping a world coordinate to the centre of its containing cell, see
// `maths::snap_to_cell_centre`.

pub mod line;
pub mod maths;
pub mod mesh;
pub mod quad;
pub mod transform;

pub use maths::{Coord, Real};
pub use mesh::Mesh;
pub use quad::{Bounded, Quad};
pub use transform::Transform;
