// SPDX-License-Identifier: MIT
//
// TerminalRenderer — turns a TileBuffer into the bytes that draw it.
//
// Each frame is compared against the previous one a row at a time. An
// unchanged row is one slice comparison and no output. A changed row is
// redrawn left to right: the first tile is emitted with `is_newline` set and
// always lands behind an explicit cursor move, every later tile only costs
// its symbol plus whatever the attribute encoder decides has changed.
//
// The first frame and any frame whose size differs from the last one clear
// the screen and draw every row. The whole frame sits between synchronized
// output markers and ends with an SGR reset, after which the encoder is
// cleared since the terminal no longer shows the last emitted style.
//
// Output is gathered in an OutputBuffer and written with a single flush.

use std::io::{self, Write};

use crate::ansi;
use crate::attr::AttrEncoder;
use crate::buffer::TileBuffer;
use crate::output::OutputBuffer;

// ─── RenderStats ─────────────────────────────────────────────────────────────

/// What a render pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Rows written to the output.
    pub rows_drawn: usize,
    /// Rows identical to the previous frame.
    pub rows_skipped: usize,
    /// Total bytes of output generated.
    pub bytes_written: usize,
}

impl RenderStats {
    #[inline]
    #[must_use]
    pub const fn total_rows(&self) -> usize {
        self.rows_drawn + self.rows_skipped
    }
}

// ─── TerminalRenderer ────────────────────────────────────────────────────────

/// Row-differential renderer over an [`AttrEncoder`].
///
/// ```no_run
/// use ar_term::buffer::TileBuffer;
/// use ar_term::render::TerminalRenderer;
///
/// let mut renderer = TerminalRenderer::default();
/// let frame = TileBuffer::new(80, 24);
/// let stats = renderer.render(&frame)?;
/// renderer.flush()?;
/// # let _ = stats;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct TerminalRenderer {
    output: OutputBuffer,
    encoder: AttrEncoder,
    previous: Option<TileBuffer>,
}

impl TerminalRenderer {
    /// A renderer with no previous frame; the first render draws everything.
    #[must_use]
    pub fn new(encoder: AttrEncoder) -> Self {
        Self {
            output: OutputBuffer::new(),
            encoder,
            previous: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn encoder(&self) -> &AttrEncoder {
        &self.encoder
    }

    /// Encode `current` relative to the last rendered frame.
    ///
    /// The bytes accumulate until [`flush`](Self::flush),
    /// [`flush_to`](Self::flush_to) or the next render, which discards them.
    ///
    /// # Errors
    ///
    /// Propagates encoder errors. Writing into the frame buffer cannot fail,
    /// so in practice this only errors if the encoder's sink contract is
    /// broken.
    pub fn render(&mut self, current: &TileBuffer) -> io::Result<RenderStats> {
        self.output.clear();

        let mut stats = RenderStats::default();
        let width = current.width();
        let height = current.height();

        if width == 0 || height == 0 {
            self.previous = Some(current.clone());
            return Ok(stats);
        }

        let full_redraw = !self
            .previous
            .as_ref()
            .is_some_and(|prev| prev.size() == current.size());

        ansi::begin_sync(&mut self.output)?;
        if full_redraw {
            ansi::clear_screen(&mut self.output)?;
        }

        for y in 0..height {
            let Some(row) = current.row(y) else { break };

            if !full_redraw
                && self
                    .previous
                    .as_ref()
                    .and_then(|prev| prev.row(y))
                    .is_some_and(|prev_row| prev_row == row)
            {
                stats.rows_skipped += 1;
                continue;
            }

            self.draw_row(row, y)?;
            stats.rows_drawn += 1;
        }

        ansi::reset(&mut self.output)?;
        self.encoder.clear();
        ansi::end_sync(&mut self.output)?;

        stats.bytes_written = self.output.len();
        self.store_frame(current);
        Ok(stats)
    }

    fn draw_row(&mut self, row: &[crate::cell::Tile], y: u16) -> io::Result<()> {
        for (x, tile) in (0..).zip(row) {
            let is_newline = x == 0;
            let wrote = self
                .encoder
                .emit(&mut self.output, x, y, &tile.style(), is_newline)?;
            if is_newline && !wrote {
                ansi::cursor_to(&mut self.output, x, y)?;
            }
            self.output.push_char(tile.symbol());
        }
        Ok(())
    }

    /// The bytes from the last render.
    #[must_use]
    pub fn output_bytes(&self) -> &[u8] {
        self.output.as_bytes()
    }

    /// Write the last render to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub fn flush(&mut self) -> io::Result<()> {
        self.output.flush_stdout()
    }

    /// Write the last render to `w`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        self.output.flush_to(w)
    }

    /// Forget the previous frame and the encoder state. The next render
    /// clears the screen and writes everything.
    pub fn force_redraw(&mut self) {
        self.previous = None;
        self.encoder.clear();
    }

    fn store_frame(&mut self, current: &TileBuffer) {
        match &mut self.previous {
            Some(prev) => prev.clone_from(current),
            None => self.previous = Some(current.clone()),
        }
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(AttrEncoder::default())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
