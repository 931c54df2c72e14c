// SPDX-License-Identifier: MIT
//
// ar-term — the terminal half of the asciir pipeline.
//
// Everything between "this cell should look like that" and the bytes on
// stdout: colors and tiles, the tile grid, the attribute diff encoder that
// only sends what changed since the last cell, the row-differential frame
// renderer, and raw termios control.
//
// No TUI framework sits underneath. Escape sequences are written by hand
// into an `AnsiSink`, which is implemented for `String` (tests), any
// `io::Write` (via `Stream`), and the `OutputBuffer` that a frame is
// gathered in before its single write.

pub mod ansi;
pub mod attr;
pub mod buffer;
pub mod cell;
pub mod color;
pub mod output;
pub mod render;
pub mod sink;
pub mod terminal;
