// SPDX-License-Identifier: MIT
//
// Renderer — rasterizes shapes into a TileBuffer the size of the terminal.
//
// Every shape goes through the same steps: find the cells it may cover, then
// test each cell's centre for containment and write the tile where the test
// passes. Meshes are first transformed face by face and clipped to the
// viewport, so the containment test only ever runs against on-screen
// geometry and the candidate cells never extend past the screen.
//
// Tiles are composited rather than overwritten: the new background is
// alpha-blended over whatever the cell held.

use ar_geom::maths::{Coord, Real};
use ar_geom::{Mesh, Quad, Transform};
use ar_term::buffer::TileBuffer;
use ar_term::cell::Tile;
use ar_term::terminal::Size;

use crate::viewport::{CellRect, Viewport, bounding_rect, vertex_bounds};

/// World units per terminal cell.
const CELL: Real = 1.0;

/// Draws geometry into an owned [`TileBuffer`].
///
/// ```
/// use ar_geom::{Quad, Transform};
/// use ar_geom::maths::Coord;
/// use ar_render::Renderer;
/// use ar_term::cell::Tile;
/// use ar_term::color::Color;
/// use ar_term::terminal::Size;
///
/// let mut r = Renderer::new(Size::new(8, 4));
/// let quad = Quad::new(Coord::new(1.0, 1.0), Coord::new(2.0, 2.0));
/// r.draw_quad(&quad, &Transform::new(), Tile::solid(Color::RED));
///
/// assert_eq!(r.view_tile(Coord::new(1.0, 1.0)).unwrap().bg, Color::RED);
/// assert_eq!(r.view_tile(Coord::new(3.0, 1.0)).unwrap().bg, Color::BLACK);
/// ```
#[derive(Debug, Clone)]
pub struct Renderer {
    tiles: TileBuffer,
}

impl Renderer {
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            tiles: TileBuffer::new(size.cols, size.rows),
        }
    }

    // ─── Target ──────────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.tiles.size()
    }

    #[inline]
    #[must_use]
    pub const fn tiles(&self) -> &TileBuffer {
        &self.tiles
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::from_size(self.size())
    }

    /// Set every cell to `tile`.
    pub fn clear(&mut self, tile: Tile) {
        self.tiles.fill(tile);
    }

    /// Change the target size. The contents are discarded.
    pub fn resize(&mut self, size: Size) {
        if size == self.size() {
            return;
        }
        log::debug!("renderer resized from {:?} to {size:?}", self.size());
        self.tiles.resize(size.cols, size.rows, Tile::EMPTY);
    }

    // ─── Shapes ──────────────────────────────────────────────────────────

    /// Fill `mesh` as placed by `transform`.
    ///
    /// Each face is transformed and clipped on its own. Faces that clip
    /// away entirely are dropped; the rest keep their order and winding,
    /// so holes stay holes.
    pub fn draw_mesh(&mut self, mesh: &Mesh, transform: &Transform, tile: Tile) {
        let clipped = self.clip_mesh(mesh, transform);
        let Some(rect) = vertex_bounds(clipped.vertices(), self.size()) else {
            return;
        };

        for (x, y) in rect.cells() {
            if clipped.is_inside_grid(cell_coord(x, y), CELL) {
                self.put(x, y, tile);
            }
        }
    }

    fn clip_mesh(&self, mesh: &Mesh, transform: &Transform) -> Mesh {
        let viewport = self.viewport();
        let mut clipped = Mesh::default();

        for face in 0..mesh.face_count() {
            let world: Vec<Coord> = mesh
                .face_vertices(face)
                .map(|v| transform.apply_transform(v))
                .collect();
            let projected = viewport.project(&world);
            log::trace!(
                "face {face}: {} corners clipped to {}",
                world.len(),
                projected.len()
            );
            if projected.is_empty() {
                continue;
            }

            let start = clipped.vert_count();
            clipped.add_vertices(&projected);
            clipped.join_as_face(start, clipped.vert_count());
        }

        clipped
    }

    /// Fill `quad` as placed by `transform`.
    pub fn draw_quad(&mut self, quad: &Quad, transform: &Transform, tile: Tile) {
        let Some(rect) = bounding_rect(quad, transform, self.size()) else {
            return;
        };

        for (x, y) in rect.cells() {
            if quad.is_inside_grid(cell_coord(x, y), transform, CELL) {
                self.put(x, y, tile);
            }
        }
    }

    /// Fill every cell from the one containing `corners[0]` to the one
    /// containing `corners[1]`, both included.
    pub fn draw_rect(&mut self, corners: [Coord; 2], tile: Tile) {
        let [a, b] = corners;
        let cells = [a.min(b).floor(), a.max(b).floor()];
        let Some(rect) = vertex_bounds(&cells, self.size()) else {
            return;
        };
        self.fill_rect(rect, tile);
    }

    /// Composite `tile` onto the cell containing `pos`. Returns `false` when
    /// `pos` is off screen.
    pub fn draw_tile(&mut self, pos: Coord, tile: Tile) -> bool {
        match self.cell_at(pos) {
            Some((x, y)) => {
                self.put(x, y, tile);
                true
            }
            None => false,
        }
    }

    /// The tile in the cell containing `pos`.
    #[must_use]
    pub fn view_tile(&self, pos: Coord) -> Option<Tile> {
        let (x, y) = self.cell_at(pos)?;
        self.tiles.get(x, y).copied()
    }

    // ─── Cells ───────────────────────────────────────────────────────────

    fn fill_rect(&mut self, rect: CellRect, tile: Tile) {
        for (x, y) in rect.cells() {
            self.put(x, y, tile);
        }
    }

    fn put(&mut self, x: u16, y: u16, tile: Tile) {
        if let Some(slot) = self.tiles.get_mut(x, y) {
            let bg = tile.bg.blend_over(slot.bg);
            *slot = tile.with_bg(bg);
        }
    }

    fn cell_at(&self, pos: Coord) -> Option<(u16, u16)> {
        let cell = pos.floor();
        let size = self.size();
        if cell.x < 0.0
            || cell.y < 0.0
            || cell.x >= Real::from(size.cols)
            || cell.y >= Real::from(size.rows)
        {
            return None;
        }

        // Whole numbers within the buffer.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let xy = (cell.x as u16, cell.y as u16);
        Some(xy)
    }
}

fn cell_coord(x: u16, y: u16) -> Coord {
    Coord::new(Real::from(x), Real::from(y))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
