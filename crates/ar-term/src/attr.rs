// SPDX-License-Identifier: MIT
//
// AttrEncoder — minimal SGR updates between successive tiles.
//
// The encoder remembers the attributes and colors it last sent and, for
// each new tile, emits only what differs:
//
//   identical style, not cleared   →  nothing at all (not even a cursor move)
//   anything differs               →  CUP, then one SGR whose parameters are,
//                                      in order and `;`-joined:
//
//     [3|23] [4|24] [5|25] [9|29] [38;2;R;G;B 48;2;R;G;B | 48;2;R;G;B]
//
// Parameters are joined with no leading separator: `CSI 3;38;2;…m`, not
// `CSI ;3;38;2;…m`. An empty first parameter reads as 0 (reset) to most
// terminals. An SGR with no parameters is not written at all, since
// `CSI m` means reset. That happens when only a slot bit (FRAMED, ENCIRCLED, OVERLINED)
// or a toggle the policy cannot express changed.
//
// Toggles are only written when they flip (or on the first emit after a
// clear, which writes every toggle explicitly). Bold is not SGR 1: it is a
// foreground brightened by `bold_offset` per channel, so the foreground
// must be re-sent whenever bold flips. Re-sending the foreground always
// re-sends the background too; the background alone goes out when only it
// changed.
//
// `is_newline` marks the first cell of a row. Some terminals drop color
// state on line wrap, so a newline forces the colors out again, but only if
// the encoder was going to emit at all: an unchanged style stays silent.
//
// The policy decides which toggles a host can express. The Windows console
// has no blink or strike, so `Console` never writes them; the bits still
// take part in the "did anything change" test under both policies.

use std::io;

use crate::ansi::{self, Sgr};
use crate::cell::{Attr, Style};
use crate::color::Color;
use crate::sink::AnsiSink;

/// Per-channel brightening applied to bold foregrounds.
pub const DEFAULT_BOLD_OFFSET: u8 = 40;

// ─── Policy ──────────────────────────────────────────────────────────────────

/// Which attribute codes the output host understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttrPolicy {
    /// Full ANSI terminal.
    #[default]
    Ansi,
    /// Windows console host: no blink, no strike.
    Console,
}

impl AttrPolicy {
    /// The policy for the platform this binary was built for.
    #[must_use]
    pub const fn detect() -> Self {
        if cfg!(windows) { Self::Console } else { Self::Ansi }
    }

    /// Toggles this policy writes, in output order: (flag, on code, off code).
    fn toggles(self) -> &'static [(Attr, &'static str, &'static str)] {
        const ANSI: &[(Attr, &str, &str)] = &[
            (Attr::ITALIC, "3", "23"),
            (Attr::UNDERLINE, "4", "24"),
            (Attr::BLINK, "5", "25"),
            (Attr::STRIKE, "9", "29"),
        ];
        const CONSOLE: &[(Attr, &str, &str)] = &[
            (Attr::ITALIC, "3", "23"),
            (Attr::UNDERLINE, "4", "24"),
        ];
        match self {
            Self::Ansi => ANSI,
            Self::Console => CONSOLE,
        }
    }
}

// ─── Encoder ─────────────────────────────────────────────────────────────────

/// Stateful converter from desired tile styles to minimal escape codes.
///
/// ```
/// use ar_term::attr::AttrEncoder;
/// use ar_term::cell::{Attr, Style};
/// use ar_term::color::Color;
///
/// let mut enc = AttrEncoder::default();
/// let style = Style::new(Attr::ITALIC, Color::WHITE, Color::BLACK);
///
/// let mut out = String::new();
/// enc.emit(&mut out, 0, 0, &style, true).unwrap();
/// assert_eq!(
///     out,
///     "\x1b[1;1H\x1b[3;24;25;29;38;2;255;255;255;48;2;0;0;0m"
/// );
///
/// // Same style again: nothing.
/// out.clear();
/// assert!(!enc.emit(&mut out, 1, 0, &style, false).unwrap());
/// assert!(out.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct AttrEncoder {
    policy: AttrPolicy,
    bold_offset: u8,
    last: Style,
    cleared: bool,
}

impl AttrEncoder {
    /// A cleared encoder: the first emit writes everything.
    #[must_use]
    pub fn new(policy: AttrPolicy) -> Self {
        Self {
            policy,
            bold_offset: DEFAULT_BOLD_OFFSET,
            last: Style::default(),
            cleared: true,
        }
    }

    #[must_use]
    pub const fn with_bold_offset(mut self, offset: u8) -> Self {
        self.bold_offset = offset;
        self
    }

    #[inline]
    #[must_use]
    pub const fn policy(&self) -> AttrPolicy {
        self.policy
    }

    #[inline]
    #[must_use]
    pub const fn bold_offset(&self) -> u8 {
        self.bold_offset
    }

    /// Whether the next emit will write the full state.
    #[inline]
    #[must_use]
    pub const fn is_cleared(&self) -> bool {
        self.cleared
    }

    /// The style most recently written.
    #[inline]
    #[must_use]
    pub const fn last_style(&self) -> Style {
        self.last
    }

    /// Forget what the terminal is showing. The next emit writes every
    /// toggle and both colors.
    pub const fn clear(&mut self) {
        self.cleared = true;
    }

    /// Bring the terminal from the last emitted style to `style`, with the
    /// cursor at `(x, y)`.
    ///
    /// Returns whether anything was written.
    ///
    /// # Errors
    ///
    /// Propagates sink errors. A failure part-way through leaves the
    /// terminal in an unknown state, so the encoder marks itself cleared.
    pub fn emit<S: AnsiSink>(
        &mut self,
        sink: &mut S,
        x: u16,
        y: u16,
        style: &Style,
        is_newline: bool,
    ) -> io::Result<bool> {
        if !self.cleared && *style == self.last {
            return Ok(false);
        }

        match self.write_diff(sink, x, y, style, is_newline) {
            Ok(()) => {
                self.last = *style;
                self.cleared = false;
                Ok(true)
            }
            Err(e) => {
                self.cleared = true;
                Err(e)
            }
        }
    }

    /// Write the complete style at `(x, y)`, starting from an SGR reset,
    /// regardless of what was sent before.
    ///
    /// # Errors
    ///
    /// Propagates sink errors; the encoder is marked cleared in that case.
    pub fn write_full<S: AnsiSink>(
        &mut self,
        sink: &mut S,
        x: u16,
        y: u16,
        style: &Style,
    ) -> io::Result<()> {
        match self.write_absolute(sink, x, y, style) {
            Ok(()) => {
                self.last = *style;
                self.cleared = false;
                Ok(())
            }
            Err(e) => {
                self.cleared = true;
                Err(e)
            }
        }
    }

    fn write_absolute<S: AnsiSink>(
        &self,
        sink: &mut S,
        x: u16,
        y: u16,
        style: &Style,
    ) -> io::Result<()> {
        ansi::cursor_to(sink, x, y)?;
        let mut sgr = Sgr::new(sink);
        sgr.param("0")?;
        for &(flag, on, _) in self.policy.toggles() {
            if style.attrs.contains(flag) {
                sgr.param(on)?;
            }
        }
        sgr.fg(self.foreground(style))?;
        sgr.bg(style.bg)?;
        sgr.finish().map(|_| ())
    }

    fn write_diff<S: AnsiSink>(
        &self,
        sink: &mut S,
        x: u16,
        y: u16,
        style: &Style,
        is_newline: bool,
    ) -> io::Result<()> {
        let last = self.last.attrs;
        let want = style.attrs;

        ansi::cursor_to(sink, x, y)?;
        let mut sgr = Sgr::new(sink);

        for &(flag, on, off) in self.policy.toggles() {
            let now = want.contains(flag);
            let before = last.contains(flag);
            if now && (!before || self.cleared) {
                sgr.param(on)?;
            } else if !now && (before || self.cleared) {
                sgr.param(off)?;
            }
        }

        let bold_flipped = want.contains(Attr::BOLD) != last.contains(Attr::BOLD);
        let fg_dirty = bold_flipped || style.fg != self.last.fg || self.cleared || is_newline;

        if fg_dirty {
            sgr.fg(self.foreground(style))?;
            sgr.bg(style.bg)?;
        } else if style.bg != self.last.bg {
            sgr.bg(style.bg)?;
        }

        sgr.finish().map(|_| ())
    }

    /// The foreground actually sent: brightened when bold.
    fn foreground(&self, style: &Style) -> Color {
        if style.attrs.contains(Attr::BOLD) {
            style.fg.brighten(self.bold_offset)
        } else {
            style.fg
        }
    }
}

impl Default for AttrEncoder {
    fn default() -> Self {
        Self::new(AttrPolicy::default())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::output::OutputBuffer;
    use crate::sink::Stream;

    const WHITE_ON_BLACK: &str = ";38;2;255;255;255;48;2;0;0;0";

    fn style(attrs: Attr, fg: Color, bg: Color) -> Style {
        Style::new(attrs, fg, bg)
    }

    fn plain() -> Style {
        style(Attr::empty(), Color::WHITE, Color::BLACK)
    }

    /// Emit once into a fresh String and return it.
    fn emit(enc: &mut AttrEncoder, x: u16, y: u16, s: &Style, newline: bool) -> String {
        let mut out = String::new();
        enc.emit(&mut out, x, y, s, newline).unwrap();
        out
    }

    // ── First emit / clear ──────────────────────────────────────────────

    #[test]
    fn first_emit_writes_everything() {
        let mut enc = AttrEncoder::default();
        assert_eq!(
            emit(&mut enc, 0, 0, &plain(), false),
            format!("\x1b[1;1H\x1b[23;24;25;29{WHITE_ON_BLACK}m")
        );
        assert!(!enc.is_cleared());
    }

    #[test]
    fn identical_emit_is_silent() {
        let mut enc = AttrEncoder::default();
        let s = style(Attr::UNDERLINE | Attr::BOLD, Color::RED, Color::BLUE);
        assert!(!emit(&mut enc, 0, 0, &s, false).is_empty());
        assert_eq!(emit(&mut enc, 1, 0, &s, false), "");
        assert_eq!(emit(&mut enc, 2, 0, &s, false), "");
    }

    #[test]
    fn newline_alone_does_not_force_output() {
        let mut enc = AttrEncoder::default();
        emit(&mut enc, 0, 0, &plain(), false);
        assert_eq!(emit(&mut enc, 0, 1, &plain(), true), "");
    }

    #[test]
    fn clear_forces_full_re_emission() {
        let mut enc = AttrEncoder::default();
        let s = style(Attr::ITALIC, Color::WHITE, Color::BLACK);
        let first = emit(&mut enc, 3, 2, &s, false);
        assert_eq!(emit(&mut enc, 3, 2, &s, false), "");

        enc.clear();
        assert_eq!(emit(&mut enc, 3, 2, &s, false), first);
    }

    // ── Toggles ─────────────────────────────────────────────────────────

    #[test]
    fn toggles_only_written_when_flipped() {
        let mut enc = AttrEncoder::default();
        emit(&mut enc, 0, 0, &plain(), false);

        let italic = style(Attr::ITALIC, Color::WHITE, Color::BLACK);
        assert_eq!(emit(&mut enc, 1, 0, &italic, false), "\x1b[1;2H\x1b[3m");

        let underline = style(Attr::UNDERLINE, Color::WHITE, Color::BLACK);
        assert_eq!(emit(&mut enc, 2, 0, &underline, false), "\x1b[1;3H\x1b[23;4m");
    }

    #[test]
    fn toggle_order_is_fixed() {
        let mut enc = AttrEncoder::default();
        emit(&mut enc, 0, 0, &plain(), false);
        let all = style(
            Attr::STRIKE | Attr::BLINK | Attr::UNDERLINE | Attr::ITALIC,
            Color::WHITE,
            Color::BLACK,
        );
        assert_eq!(emit(&mut enc, 0, 0, &all, false), "\x1b[1;1H\x1b[3;4;5;9m");
    }

    #[test]
    fn slot_bits_move_cursor_without_empty_sgr() {
        let mut enc = AttrEncoder::default();
        emit(&mut enc, 0, 0, &plain(), false);
        let framed = style(Attr::FRAMED, Color::WHITE, Color::BLACK);
        assert_eq!(emit(&mut enc, 4, 0, &framed, false), "\x1b[1;5H");
    }

    // ── Colors ──────────────────────────────────────────────────────────

    #[test]
    fn fg_change_resends_bg() {
        let mut enc = AttrEncoder::default();
        emit(&mut enc, 0, 0, &plain(), false);
        let red = style(Attr::empty(), Color::RED, Color::BLACK);
        assert_eq!(
            emit(&mut enc, 1, 0, &red, false),
            "\x1b[1;2H\x1b[38;2;255;0;0;48;2;0;0;0m"
        );
    }

    #[test]
    fn bg_change_alone() {
        let mut enc = AttrEncoder::default();
        emit(&mut enc, 0, 0, &plain(), false);
        let blue_bg = style(Attr::empty(), Color::WHITE, Color::BLUE);
        assert_eq!(emit(&mut enc, 1, 0, &blue_bg, false), "\x1b[1;2H\x1b[48;2;0;0;255m");
    }

    #[test]
    fn newline_with_bg_change_resends_both_colors() {
        let mut enc = AttrEncoder::default();
        emit(&mut enc, 5, 0, &plain(), false);
        let blue_bg = style(Attr::empty(), Color::WHITE, Color::BLUE);
        assert_eq!(
            emit(&mut enc, 0, 1, &blue_bg, true),
            "\x1b[2;1H\x1b[38;2;255;255;255;48;2;0;0;255m"
        );
    }

    // ── Bold ────────────────────────────────────────────────────────────

    #[test]
    fn bold_brightens_foreground() {
        let mut enc = AttrEncoder::default();
        emit(&mut enc, 0, 0, &plain(), false);
        let bold = style(Attr::BOLD, Color::new(100, 200, 230), Color::BLACK);
        assert_eq!(
            emit(&mut enc, 0, 0, &bold, false),
            "\x1b[1;1H\x1b[38;2;140;240;255;48;2;0;0;0m"
        );
    }

    #[test]
    fn bold_off_restores_plain_foreground() {
        let mut enc = AttrEncoder::default();
        let fg = Color::new(100, 100, 100);
        emit(&mut enc, 0, 0, &style(Attr::BOLD, fg, Color::BLACK), false);
        assert_eq!(
            emit(&mut enc, 1, 0, &style(Attr::empty(), fg, Color::BLACK), false),
            "\x1b[1;2H\x1b[38;2;100;100;100;48;2;0;0;0m"
        );
    }

    #[test]
    fn custom_bold_offset() {
        let mut enc = AttrEncoder::default().with_bold_offset(5);
        let out = emit(&mut enc, 0, 0, &style(Attr::BOLD, Color::gray(10), Color::BLACK), false);
        assert!(out.contains("38;2;15;15;15;"));
    }

    // ── Policy ──────────────────────────────────────────────────────────

    #[test]
    fn console_policy_skips_blink_and_strike() {
        let mut enc = AttrEncoder::new(AttrPolicy::Console);
        assert_eq!(
            emit(&mut enc, 0, 0, &plain(), false),
            format!("\x1b[1;1H\x1b[23;24{WHITE_ON_BLACK}m")
        );
        let blink = style(Attr::BLINK | Attr::STRIKE, Color::WHITE, Color::BLACK);
        assert_eq!(emit(&mut enc, 0, 0, &blink, false), "\x1b[1;1H");
    }

    // ── Full write ──────────────────────────────────────────────────────

    #[test]
    fn write_full_starts_from_reset() {
        let mut enc = AttrEncoder::default();
        let s = style(Attr::ITALIC | Attr::STRIKE, Color::WHITE, Color::BLACK);
        let mut out = String::new();
        enc.write_full(&mut out, 2, 1, &s).unwrap();
        assert_eq!(out, format!("\x1b[2;3H\x1b[0;3;9{WHITE_ON_BLACK}m"));
        // And it snapshots: the same style is now a no-op.
        assert_eq!(emit(&mut enc, 2, 1, &s, false), "");
    }

    // ── Sinks ───────────────────────────────────────────────────────────

    fn script(sink: &mut impl AnsiSink) {
        let mut enc = AttrEncoder::default();
        let styles = [
            plain(),
            style(Attr::BOLD, Color::RED, Color::BLACK),
            style(Attr::BOLD | Attr::ITALIC, Color::RED, Color::BLUE),
            style(Attr::empty(), Color::RED, Color::BLUE),
        ];
        for (i, s) in styles.iter().enumerate() {
            let x = u16::try_from(i).unwrap();
            enc.emit(sink, x, 0, s, i == 0).unwrap();
            sink.push_char('#').unwrap();
        }
    }

    #[test]
    fn all_sinks_produce_identical_bytes() {
        let mut s = String::new();
        script(&mut s);

        let mut buf = OutputBuffer::new();
        script(&mut buf);

        let mut stream = Stream(Vec::new());
        script(&mut stream);

        assert_eq!(buf.as_bytes(), s.as_bytes());
        assert_eq!(stream.into_inner(), s.into_bytes());
    }

    // ── Errors ──────────────────────────────────────────────────────────

    struct Broken;

    impl io::Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn io_error_marks_encoder_cleared() {
        let mut enc = AttrEncoder::default();
        emit(&mut enc, 0, 0, &plain(), false);
        assert!(!enc.is_cleared());

        let red = style(Attr::empty(), Color::RED, Color::BLACK);
        assert!(enc.emit(&mut Stream(Broken), 0, 0, &red, false).is_err());
        assert!(enc.is_cleared());
        assert_eq!(enc.last_style(), plain());
    }
}
