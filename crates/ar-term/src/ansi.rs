// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that push escape sequences into any `AnsiSink`. No state,
// no decisions about when to emit; that is the `AttrEncoder`'s job. This
// module just knows the byte-level encoding of every terminal command the
// renderer needs.
//
// All cursor positions are 0-indexed in our API and converted to 1-indexed
// for the terminal (ANSI standard uses 1-based coordinates).
//
// Standalone sequences (`reset`, `clear_screen`) are complete. Multi-change
// SGRs go through `Sgr`, which opens the sequence lazily and joins
// parameters with `;`. A leading empty parameter or a bare `CSI m` would
// read as SGR 0 and wipe the terminal's attributes, so neither is ever
// produced.

use std::io;

use crate::color::Color;
use crate::sink::AnsiSink;

/// Control Sequence Introducer.
pub const CSI: &str = "\x1b[";

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to `(x, y)` using the CUP (Cursor Position) sequence.
///
/// Our coordinates are 0-indexed; ANSI CUP is 1-indexed. Every cursor move
/// the crate emits goes through here.
#[inline]
pub fn cursor_to(w: &mut impl AnsiSink, x: u16, y: u16) -> io::Result<()> {
    w.push_fmt(format_args!(
        "\x1b[{};{}H",
        u32::from(y) + 1,
        u32::from(x) + 1
    ))
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl AnsiSink) -> io::Result<()> {
    w.push_str("\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl AnsiSink) -> io::Result<()> {
    w.push_str("\x1b[?25h")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl AnsiSink) -> io::Result<()> {
    w.push_str("\x1b[2J")
}

/// Reset all SGR attributes to terminal defaults (SGR 0).
///
/// The attribute encoder must be cleared after this goes out, otherwise it
/// keeps diffing against state the terminal no longer has.
#[inline]
pub fn reset(w: &mut impl AnsiSink) -> io::Result<()> {
    w.push_str("\x1b[0m")
}

/// Set the window title (OSC 0).
#[inline]
pub fn set_title(w: &mut impl AnsiSink, title: &str) -> io::Result<()> {
    w.push_fmt(format_args!("\x1b]0;{title}\x07"))
}

// ─── SGR Builder ─────────────────────────────────────────────────────────────

/// Builds one SGR sequence, parameter by parameter.
///
/// ```
/// use ar_term::ansi::Sgr;
/// use ar_term::color::Color;
///
/// let mut out = String::new();
/// let mut sgr = Sgr::new(&mut out);
/// sgr.param("3").unwrap();
/// sgr.fg(Color::RED).unwrap();
/// assert!(sgr.finish().unwrap());
/// assert_eq!(out, "\x1b[3;38;2;255;0;0m");
/// ```
pub struct Sgr<'a, S: AnsiSink> {
    sink: &'a mut S,
    open: bool,
}

impl<'a, S: AnsiSink> Sgr<'a, S> {
    pub const fn new(sink: &'a mut S) -> Self {
        Self { sink, open: false }
    }

    /// Append a raw numeric parameter such as `"3"` or `"23"`.
    pub fn param(&mut self, code: &str) -> io::Result<()> {
        self.separate()?;
        self.sink.push_str(code)
    }

    /// Append a 24-bit foreground (`38;2;R;G;B`). Alpha is dropped.
    pub fn fg(&mut self, c: Color) -> io::Result<()> {
        self.separate()?;
        self.sink.push_fmt(format_args!("38;2;{};{};{}", c.r, c.g, c.b))
    }

    /// Append a 24-bit background (`48;2;R;G;B`). Alpha is dropped.
    pub fn bg(&mut self, c: Color) -> io::Result<()> {
        self.separate()?;
        self.sink.push_fmt(format_args!("48;2;{};{};{}", c.r, c.g, c.b))
    }

    /// Close the sequence. Returns whether anything was written; with no
    /// parameters, nothing is.
    pub fn finish(self) -> io::Result<bool> {
        if self.open {
            self.sink.push_char('m')?;
        }
        Ok(self.open)
    }

    fn separate(&mut self) -> io::Result<()> {
        if self.open {
            self.sink.push_char(';')
        } else {
            self.open = true;
            self.sink.push_str(CSI)
        }
    }
}

// ─── Synchronized Output ─────────────────────────────────────────────────────

/// Begin synchronized output (DEC Private Mode 2026).
///
/// Tells the terminal to buffer all subsequent output until [`end_sync`].
/// This prevents partial frame updates from causing visible flicker.
/// Terminals without support ignore it.
#[inline]
pub fn begin_sync(w: &mut impl AnsiSink) -> io::Result<()> {
    w.push_str("\x1b[?2026h")
}

/// End synchronized output; the terminal renders the buffered frame.
#[inline]
pub fn end_sync(w: &mut impl AnsiSink) -> io::Result<()> {
    w.push_str("\x1b[?2026l")
}

// ─── Alternate Screen ───────────────────────────────────────────────────────

/// Enter the alternate screen buffer (DEC Private Mode 1049).
///
/// The alternate screen preserves the original terminal content, which is
/// restored on exit.
#[inline]
pub fn enter_alt_screen(w: &mut impl AnsiSink) -> io::Result<()> {
    w.push_str("\x1b[?1049h")
}

/// Exit the alternate screen buffer and restore original content.
#[inline]
pub fn exit_alt_screen(w: &mut impl AnsiSink) -> io::Result<()> {
    w.push_str("\x1b[?1049l")
}

// ─── Tests ───────────────────────────────────────────────────────────────────
