// SPDX-License-Identifier: MIT
//
// OutputBuffer — the frame's bytes, gathered for a single write().
//
// Every cursor move, SGR sequence, and symbol of a frame lands here first.
// A single flush at frame end writes it all at once, so the terminal never
// sees a half-drawn frame and the renderer never pays per-escape syscall
// overhead.

use std::fmt;
use std::io::{self, Write};

use crate::sink::AnsiSink;

/// A byte buffer that accumulates terminal output for one `write()` call.
///
/// Default capacity: 16 KB, enough for most frames without reallocation.
#[derive(Debug)]
pub struct OutputBuffer {
    buf: Vec<u8>,
}

const DEFAULT_CAPACITY: usize = 16_384;

impl OutputBuffer {
    /// Create an empty buffer with default capacity (16 KB).
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append text.
    #[inline]
    pub fn push_buffer(&mut self, text: &str) {
        self.buf.extend_from_slice(text.as_bytes());
    }

    /// Append one character as UTF-8.
    #[inline]
    pub fn push_char(&mut self, c: char) {
        let mut enc = [0u8; 4];
        self.buf.extend_from_slice(c.encode_utf8(&mut enc).as_bytes());
    }

    /// Clear the buffer for reuse (keeps allocated capacity).
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Write accumulated output to stdout and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub fn flush_stdout(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        self.flush_to(&mut stdout)
    }

    /// Write accumulated output to an arbitrary writer and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails. The buffer is left intact
    /// in that case.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
            self.buf.clear();
        }
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnsiSink for OutputBuffer {
    #[inline]
    fn push_str(&mut self, s: &str) -> io::Result<()> {
        self.push_buffer(s);
        Ok(())
    }

    #[inline]
    fn push_char(&mut self, c: char) -> io::Result<()> {
        Self::push_char(self, c);
        Ok(())
    }

    fn push_fmt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        self.write_fmt(args)
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Real flushing goes through flush_stdout() / flush_to().
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
