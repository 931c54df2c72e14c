// SPDX-License-Identifier: MIT
//
// Tile — the atomic unit of terminal rendering.
//
// Every character position on screen is a Tile: one symbol, a foreground and
// background color, and a set of text attributes. The renderer rasterizes
// shapes into a grid of these; the attribute encoder turns successive tiles
// into escape codes.
//
// A tile always occupies exactly one column. Wide characters (CJK, most
// emoji) and zero-width characters would desynchronize the cursor from the
// grid, so they are replaced with `?` on the way in.
//
// Attribute slots 5..=7 are shared between two naming schemes: the unix
// names (FRAMED, ENCIRCLED, OVERLINED) and the Windows console border names
// (LEFT, RIGHT, TOP). Which one a slot means is decided by the output
// policy, not by the tile. BOTTOM shares slot 2 with UNDERLINE.

use unicode_width::UnicodeWidthChar;

use crate::color::Color;

// ─── Text Attributes ─────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Text attributes stored as a compact bitfield.
    ///
    /// ```
    /// use ar_term::cell::Attr;
    ///
    /// let style = Attr::BOLD | Attr::ITALIC;
    /// assert!(style.contains(Attr::BOLD));
    /// assert!(!style.contains(Attr::STRIKE));
    /// assert_eq!(Attr::BOTTOM, Attr::UNDERLINE);
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        /// Rendered as a brightened foreground, not SGR 1.
        const BOLD      = 1 << 0;
        /// SGR 3 / 23.
        const ITALIC    = 1 << 1;
        /// SGR 4 / 24.
        const UNDERLINE = 1 << 2;
        /// SGR 5 / 25.
        const BLINK     = 1 << 3;
        /// SGR 9 / 29.
        const STRIKE    = 1 << 4;
        const FRAMED    = 1 << 5;
        const ENCIRCLED = 1 << 6;
        const OVERLINED = 1 << 7;

        const BOTTOM    = Self::UNDERLINE.bits();
        const LEFT      = Self::FRAMED.bits();
        const RIGHT     = Self::ENCIRCLED.bits();
        const TOP       = Self::OVERLINED.bits();
    }
}

// ─── Style ───────────────────────────────────────────────────────────────────

/// Everything the attribute encoder compares: attributes and both colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Style {
    pub attrs: Attr,
    pub fg: Color,
    pub bg: Color,
}

impl Style {
    #[inline]
    #[must_use]
    pub const fn new(attrs: Attr, fg: Color, bg: Color) -> Self {
        Self { attrs, fg, bg }
    }
}

impl Default for Style {
    /// White on black, no attributes.
    fn default() -> Self {
        Self::new(Attr::empty(), Color::WHITE, Color::BLACK)
    }
}

// ─── Tile ────────────────────────────────────────────────────────────────────

/// One terminal cell: a single-column symbol with colors and attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub bg: Color,
    pub fg: Color,
    symbol: char,
    pub attrs: Attr,
}

/// Substitute for symbols that do not occupy exactly one column.
pub const REPLACEMENT: char = '?';

impl Tile {
    /// A blank tile: space, white on black.
    pub const EMPTY: Self = Self {
        bg: Color::BLACK,
        fg: Color::WHITE,
        symbol: ' ',
        attrs: Attr::empty(),
    };

    /// A tile showing `symbol` with the default colors.
    #[inline]
    #[must_use]
    pub fn new(symbol: char) -> Self {
        Self::EMPTY.with_symbol(symbol)
    }

    /// A blank tile with the given background.
    #[inline]
    #[must_use]
    pub const fn solid(bg: Color) -> Self {
        Self { bg, ..Self::EMPTY }
    }

    #[inline]
    #[must_use]
    pub const fn symbol(&self) -> char {
        self.symbol
    }

    /// Replace the symbol. Anything that is not exactly one column wide
    /// becomes [`REPLACEMENT`].
    pub fn set_symbol(&mut self, symbol: char) {
        self.symbol = single_column(symbol);
    }

    #[inline]
    #[must_use]
    pub fn with_symbol(mut self, symbol: char) -> Self {
        self.set_symbol(symbol);
        self
    }

    #[inline]
    #[must_use]
    pub const fn with_fg(self, fg: Color) -> Self {
        Self { fg, ..self }
    }

    #[inline]
    #[must_use]
    pub const fn with_bg(self, bg: Color) -> Self {
        Self { bg, ..self }
    }

    #[inline]
    #[must_use]
    pub const fn with_attrs(self, attrs: Attr) -> Self {
        Self { attrs, ..self }
    }

    /// The part of the tile the attribute encoder cares about.
    #[inline]
    #[must_use]
    pub const fn style(&self) -> Style {
        Style::new(self.attrs, self.fg, self.bg)
    }
}

impl Default for Tile {
    #[inline]
    fn default() -> Self {
        Self::EMPTY
    }
}

fn single_column(symbol: char) -> char {
    if symbol.width() == Some(1) {
        symbol
    } else {
        REPLACEMENT
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
