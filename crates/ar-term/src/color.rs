// SPDX-License-Identifier: MIT
//
// 8-bit RGBA color.
//
// Everything downstream of the renderer speaks 24-bit SGR (`38;2;R;G;B`),
// so colors are stored exactly as they go out on the wire: one byte per
// channel plus an alpha byte used only when compositing tiles onto each
// other. Alpha never reaches the terminal.
//
// Blending is plain Porter-Duff "source over" in integer sRGB. It is not
// perceptually correct, but it is exact, cheap, and deterministic across
// platforms, which matters more for a frame differ than color science.

use std::fmt;

// ─── Color ───────────────────────────────────────────────────────────────────

/// A 24-bit color with an alpha channel.
///
/// ```
/// use ar_term::color::Color;
///
/// let red = Color::hex("#ff0000").unwrap();
/// assert_eq!(red, Color::RED);
///
/// let half = Color::rgba(0, 0, 255, 128);
/// let mixed = half.blend_over(Color::RED);
/// assert_eq!(mixed, Color::new(127, 0, 128));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity: 0 is fully transparent, 255 fully opaque.
    pub a: u8,
}

impl Color {
    // ─── Constructors ────────────────────────────────────────────────────

    /// An opaque color.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[inline]
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// An opaque gray with all three channels at `level`.
    #[inline]
    #[must_use]
    pub const fn gray(level: u8) -> Self {
        Self::new(level, level, level)
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`, the `#` being optional.
    ///
    /// Returns `None` for anything else.
    #[must_use]
    pub fn hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#').unwrap_or(s);
        let bytes = s.as_bytes();

        match bytes.len() {
            6 => Some(Self::new(
                parse_hex_byte(&bytes[0..2])?,
                parse_hex_byte(&bytes[2..4])?,
                parse_hex_byte(&bytes[4..6])?,
            )),
            8 => Some(Self::rgba(
                parse_hex_byte(&bytes[0..2])?,
                parse_hex_byte(&bytes[2..4])?,
                parse_hex_byte(&bytes[4..6])?,
                parse_hex_byte(&bytes[6..8])?,
            )),
            _ => None,
        }
    }

    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const RED: Self = Self::new(255, 0, 0);
    pub const GREEN: Self = Self::new(0, 255, 0);
    pub const BLUE: Self = Self::new(0, 0, 255);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    // ─── Queries ─────────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub const fn is_opaque(self) -> bool {
        self.a == 255
    }

    #[inline]
    #[must_use]
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }

    // ─── Operations ──────────────────────────────────────────────────────

    /// The RGB complement. Alpha is kept.
    #[inline]
    #[must_use]
    pub const fn inverse(self) -> Self {
        Self::rgba(255 - self.r, 255 - self.g, 255 - self.b, self.a)
    }

    /// Add `offset` to every color channel, saturating at 255.
    ///
    /// Used for the bold foreground: terminals disagree on whether SGR 1
    /// brightens, so bold text is brightened explicitly instead.
    #[inline]
    #[must_use]
    pub const fn brighten(self, offset: u8) -> Self {
        Self::rgba(
            self.r.saturating_add(offset),
            self.g.saturating_add(offset),
            self.b.saturating_add(offset),
            self.a,
        )
    }

    /// Composite `self` over `background` ("source over").
    #[must_use]
    pub fn blend_over(self, background: Self) -> Self {
        if self.is_opaque() || background.is_transparent() {
            return self;
        }
        if self.is_transparent() {
            return background;
        }

        let sa = u32::from(self.a);
        let da = u32::from(background.a);
        let inv = 255 - sa;

        // Output alpha scaled to 0..=255*255 so channels can be divided once.
        let out_a = sa * 255 + da * inv;

        let channel = |s: u8, d: u8| {
            let num = u32::from(s) * sa * 255 + u32::from(d) * da * inv;
            narrow((num + out_a / 2) / out_a)
        };

        let a = narrow((out_a + 127) / 255);

        Self::rgba(
            channel(self.r, background.r),
            channel(self.g, background.g),
            channel(self.b, background.b),
            a,
        )
    }

    /// `color` composited over `background`.
    #[inline]
    #[must_use]
    pub fn blend(background: Self, color: Self) -> Self {
        color.blend_over(background)
    }
}

impl Default for Color {
    /// Opaque black.
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Every blend result is a weighted mean of bytes, so it fits in one.
#[inline]
#[allow(clippy::cast_possible_truncation)]
const fn narrow(v: u32) -> u8 {
    debug_assert!(v <= 255);
    v as u8
}

#[inline]
const fn parse_hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[inline]
fn parse_hex_byte(bytes: &[u8]) -> Option<u8> {
    let hi = parse_hex_digit(bytes[0])?;
    let lo = parse_hex_digit(bytes[1])?;
    Some(hi << 4 | lo)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_six_digits() {
        assert_eq!(Color::hex("#1e90ff"), Some(Color::new(0x1e, 0x90, 0xff)));
        assert_eq!(Color::hex("1E90FF"), Some(Color::new(0x1e, 0x90, 0xff)));
    }

    #[test]
    fn hex_eight_digits_carries_alpha() {
        assert_eq!(Color::hex("#00000080"), Some(Color::rgba(0, 0, 0, 0x80)));
    }

    #[test]
    fn hex_rejects_garbage() {
        assert_eq!(Color::hex("#12345"), None);
        assert_eq!(Color::hex("#gg0000"), None);
        assert_eq!(Color::hex(""), None);
    }

    #[test]
    fn display_round_trips_through_hex() {
        for c in [Color::new(1, 2, 3), Color::rgba(200, 100, 50, 7)] {
            assert_eq!(Color::hex(&c.to_string()), Some(c));
        }
        assert_eq!(Color::RED.to_string(), "#ff0000");
    }

    #[test]
    fn brighten_saturates() {
        assert_eq!(Color::new(10, 230, 255).brighten(40), Color::new(50, 255, 255));
    }

    #[test]
    fn inverse_keeps_alpha() {
        assert_eq!(Color::rgba(0, 100, 255, 9).inverse(), Color::rgba(255, 155, 0, 9));
    }

    #[test]
    fn blend_fast_paths() {
        assert_eq!(Color::RED.blend_over(Color::BLUE), Color::RED);
        assert_eq!(Color::TRANSPARENT.blend_over(Color::BLUE), Color::BLUE);
        let ghost = Color::rgba(1, 2, 3, 100);
        assert_eq!(ghost.blend_over(Color::TRANSPARENT), ghost);
    }

    #[test]
    fn blend_half_over_opaque() {
        let half_blue = Color::rgba(0, 0, 255, 128);
        assert_eq!(Color::blend(Color::RED, half_blue), Color::new(127, 0, 128));
    }

    #[test]
    fn blend_onto_translucent_background() {
        let out = Color::rgba(255, 255, 255, 128).blend_over(Color::rgba(0, 0, 0, 128));
        // Alpha: 128 + 128 * 127 / 255 ≈ 192.
        assert_eq!(out.a, 192);
        // White dominates: 128 of 192 total weight.
        assert_eq!(out.r, 170);
    }

    #[test]
    fn ordering_is_channelwise() {
        assert!(Color::new(0, 0, 1) < Color::new(0, 1, 0));
        assert!(Color::BLACK < Color::WHITE);
    }
}
