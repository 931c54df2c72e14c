// SPDX-License-Identifier: MIT
//
// ar-render — where geometry meets the tile grid.
//
// The viewport projector cuts world-space polygons down to the terminal
// rectangle, and the renderer rasterizes what is left by testing each
// candidate cell's centre for containment. The result is a TileBuffer that
// ar-term's TerminalRenderer turns into bytes.

pub mod renderer;
pub mod viewport;

pub use renderer::Renderer;
pub use viewport::{CellRect, Viewport};
