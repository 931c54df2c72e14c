// SPDX-License-Identifier: MIT
//
// AnsiSink — anything escape codes and symbols can be pushed into.
//
// The attribute encoder writes the same bytes whether it targets a String
// being built for a test, an arbitrary `io::Write` stream, or the frame
// buffer headed for the terminal. Those three targets implement one trait,
// and every escape routine in `ansi` is generic over it, so the output is
// byte-identical across sinks by construction.

use std::fmt::{self, Write as _};
use std::io::{self, Write};

/// A destination for terminal output.
pub trait AnsiSink {
    /// Append a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    fn push_str(&mut self, s: &str) -> io::Result<()>;

    /// Append a single character.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    fn push_char(&mut self, c: char) -> io::Result<()> {
        let mut enc = [0u8; 4];
        self.push_str(c.encode_utf8(&mut enc))
    }

    /// Append formatted text without an intermediate allocation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    fn push_fmt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()>;
}

impl AnsiSink for String {
    fn push_str(&mut self, s: &str) -> io::Result<()> {
        Self::push_str(self, s);
        Ok(())
    }

    fn push_char(&mut self, c: char) -> io::Result<()> {
        self.push(c);
        Ok(())
    }

    fn push_fmt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        self.write_fmt(args).map_err(|_| io::Error::other("formatter error"))
    }
}

/// Adapter turning any `io::Write` into an [`AnsiSink`].
///
/// A newtype rather than a blanket impl so `String` (which is not
/// `io::Write`) and `OutputBuffer` (which is) can have their own impls.
#[derive(Debug)]
pub struct Stream<W>(pub W);

impl<W: Write> Stream<W> {
    /// Unwrap the inner writer.
    pub fn into_inner(self) -> W {
        self.0
    }
}

impl<W: Write> AnsiSink for Stream<W> {
    fn push_str(&mut self, s: &str) -> io::Result<()> {
        self.0.write_all(s.as_bytes())
    }

    fn push_fmt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        self.0.write_fmt(args)
    }
}

impl<S: AnsiSink + ?Sized> AnsiSink for &mut S {
    fn push_str(&mut self, s: &str) -> io::Result<()> {
        (**self).push_str(s)
    }

    fn push_char(&mut self, c: char) -> io::Result<()> {
        (**self).push_char(c)
    }

    fn push_fmt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        (**self).push_fmt(args)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(sink: &mut impl AnsiSink) -> io::Result<()> {
        sink.push_str("\x1b[")?;
        sink.push_fmt(format_args!("{};{}", 3, 38))?;
        sink.push_char('m')?;
        sink.push_char('█')
    }

    #[test]
    fn string_sink_collects() {
        let mut s = String::new();
        fill(&mut s).unwrap();
        assert_eq!(s, "\x1b[3;38m█");
    }

    #[test]
    fn stream_sink_matches_string_sink() {
        let mut s = String::new();
        fill(&mut s).unwrap();

        let mut stream = Stream(Vec::new());
        fill(&mut stream).unwrap();

        assert_eq!(stream.into_inner(), s.into_bytes());
    }

    #[test]
    fn reborrowed_sink_writes_through() {
        let mut s = String::new();
        {
            let mut r = &mut s;
            fill(&mut r).unwrap();
        }
        assert_eq!(s, "\x1b[3;38m█");
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn stream_errors_propagate() {
        let mut stream = Stream(Broken);
        assert!(stream.push_str("x").is_err());
        assert!(stream.push_fmt(format_args!("{}", 1)).is_err());
    }
}
