// SPDX-License-Identifier: MIT
//
// TileBuffer — the 2D tile grid every shape is rasterized into.
//
// Flat `Vec<Tile>` with row-major indexing. A row's tiles are contiguous in
// memory, so the left-to-right scan the terminal renderer does is linear,
// and whole rows can be compared with one slice equality when diffing
// frames.
//
// Out-of-bounds reads return `None` and out-of-bounds writes are ignored
// (reported through the `bool` return). Clipping is the projector's job;
// the buffer only refuses to corrupt itself.

use std::fmt;

use crate::cell::Tile;
use crate::terminal::Size;

/// A `width × height` grid of tiles.
///
/// ```
/// use ar_term::buffer::TileBuffer;
/// use ar_term::cell::Tile;
///
/// let mut buf = TileBuffer::new(80, 24);
/// assert_eq!(buf.width(), 80);
///
/// buf.set(5, 3, Tile::new('X'));
/// assert_eq!(buf.get(5, 3).unwrap().symbol(), 'X');
/// assert!(buf.get(80, 0).is_none());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct TileBuffer {
    width: u16,
    height: u16,
    tiles: Vec<Tile>,
}

impl TileBuffer {
    // ─── Construction ────────────────────────────────────────────────────

    /// A buffer of blank tiles.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self::filled(width, height, Tile::EMPTY)
    }

    /// A buffer with every tile set to `tile`.
    #[must_use]
    pub fn filled(width: u16, height: u16, tile: Tile) -> Self {
        let size = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            tiles: vec![tile; size],
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    /// Width in columns.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height in rows.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Whether `(x, y)` is within the buffer.
    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    const fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// The tile at `(x, y)`, or `None` if out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Tile> {
        if self.in_bounds(x, y) {
            Some(&self.tiles[self.index(x, y)])
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Tile> {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            Some(&mut self.tiles[idx])
        } else {
            None
        }
    }

    /// Overwrite the tile at `(x, y)`. Returns `false` (and writes nothing)
    /// when out of bounds.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, tile: Tile) -> bool {
        match self.get_mut(x, y) {
            Some(slot) => {
                *slot = tile;
                true
            }
            None => false,
        }
    }

    /// Every tile, row by row.
    #[inline]
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Row `y` as a slice, or `None` if out of bounds.
    #[inline]
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Tile]> {
        if y < self.height {
            let start = self.index(0, y);
            Some(&self.tiles[start..start + usize::from(self.width)])
        } else {
            None
        }
    }

    /// Iterate tiles with their `(x, y)` coordinates.
    #[allow(clippy::cast_possible_truncation)]
    pub fn iter(&self) -> impl Iterator<Item = (u16, u16, &Tile)> {
        let w = usize::from(self.width).max(1);
        self.tiles.iter().enumerate().map(move |(i, tile)| {
            // x < width and y < height, both u16.
            ((i % w) as u16, (i / w) as u16, tile)
        })
    }

    // ─── Fill & Resize ───────────────────────────────────────────────────

    /// Set every tile to `tile`.
    pub fn fill(&mut self, tile: Tile) {
        self.tiles.fill(tile);
    }

    /// Change dimensions. All content is replaced with `tile`.
    pub fn resize(&mut self, width: u16, height: u16, tile: Tile) {
        self.width = width;
        self.height = height;
        self.tiles.clear();
        self.tiles
            .resize(usize::from(width) * usize::from(height), tile);
    }
}

impl fmt::Debug for TileBuffer {
    /// The symbols, one line per row.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TileBuffer {}x{}", self.width, self.height)?;
        for y in 0..self.height {
            let Some(row) = self.row(y) else { break };
            let line: String = row.iter().map(Tile::symbol).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
