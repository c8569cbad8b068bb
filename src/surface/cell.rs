//! Cell: one drawn glyph slot of a frame.
//!
//! Every slot carries a single-width character plus true-color foreground
//! and background and a bold flag. The rain renderer never needs wide
//! graphemes or the wider ANSI modifier set; multi-cell input is filtered
//! out before it reaches a frame.

use serde::{Deserialize, Serialize};

/// True-color RGB representation.
///
/// Serialized as a `#rrggbb` hex string, matching the form themes and
/// settings files use.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black (0, 0, 0)
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White (255, 255, 255)
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create from a 24-bit hex color (e.g., 0xFF5500).
    #[inline]
    pub const fn from_u32(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// Parse a `#rrggbb` (or `rrggbb`) hex string.
    pub fn from_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
        let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
        let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
        Some(Self::new(r, g, b))
    }

    /// Blend toward `other` by `t` in [0, 1]; 0 keeps `self`, 1 lands on
    /// `other`.
    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| -> u8 {
            let v = f32::from(a) + (f32::from(b) - f32::from(a)) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Self::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }

    /// True when every channel is within `tolerance` of `other`.
    #[inline]
    pub const fn near(self, other: Self, tolerance: u8) -> bool {
        self.r.abs_diff(other.r) <= tolerance
            && self.g.abs_diff(other.g) <= tolerance
            && self.b.abs_diff(other.b) <= tolerance
    }
}

impl std::fmt::Debug for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    #[inline]
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<u32> for Rgb {
    #[inline]
    fn from(hex: u32) -> Self {
        Self::from_u32(hex)
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s).ok_or_else(|| format!("invalid hex color: {s:?}"))
    }
}

impl From<Rgb> for String {
    fn from(rgb: Rgb) -> Self {
        rgb.to_string()
    }
}

/// A single frame cell.
///
/// Equality drives the diffed presenter: two cells compare equal exactly
/// when they would produce identical terminal output.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// The character to display.
    ch: char,
    /// Foreground color.
    fg: Rgb,
    /// Background color.
    bg: Rgb,
    /// Bold (used for glowing head glyphs).
    bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank(Rgb::BLACK)
    }
}

impl Cell {
    /// An empty cell painted entirely in `color`.
    #[inline]
    pub const fn blank(color: Rgb) -> Self {
        Self {
            ch: ' ',
            fg: color,
            bg: color,
            bold: false,
        }
    }

    /// Create a cell showing `ch` in `fg` over `bg`.
    #[inline]
    pub const fn new(ch: char, fg: Rgb, bg: Rgb) -> Self {
        Self {
            ch,
            fg,
            bg,
            bold: false,
        }
    }

    /// The displayed character.
    #[inline]
    pub const fn ch(&self) -> char {
        self.ch
    }

    /// Foreground color.
    #[inline]
    pub const fn fg(&self) -> Rgb {
        self.fg
    }

    /// Background color.
    #[inline]
    pub const fn bg(&self) -> Rgb {
        self.bg
    }

    /// Bold flag.
    #[inline]
    pub const fn bold(&self) -> bool {
        self.bold
    }

    /// Replace the character.
    #[inline]
    pub fn set_ch(&mut self, ch: char) -> &mut Self {
        self.ch = ch;
        self
    }

    /// Replace the foreground color.
    #[inline]
    pub fn set_fg(&mut self, fg: Rgb) -> &mut Self {
        self.fg = fg;
        self
    }

    /// Replace the background color.
    #[inline]
    pub fn set_bg(&mut self, bg: Rgb) -> &mut Self {
        self.bg = bg;
        self
    }

    /// Replace the bold flag.
    #[inline]
    pub fn set_bold(&mut self, bold: bool) -> &mut Self {
        self.bold = bold;
        self
    }

    /// Set the foreground color (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_fg(mut self, fg: Rgb) -> Self {
        self.fg = fg;
        self
    }

    /// Set the background color (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_bg(mut self, bg: Rgb) -> Self {
        self.bg = bg;
        self
    }

    /// Set the bold flag (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cell")
            .field("ch", &self.ch)
            .field("fg", &self.fg)
            .field("bg", &self.bg)
            .field("bold", &self.bold)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_from_tuple() {
        let rgb: Rgb = (255, 128, 0).into();
        assert_eq!(rgb.r, 255);
        assert_eq!(rgb.g, 128);
        assert_eq!(rgb.b, 0);
    }

    #[test]
    fn test_rgb_from_u32() {
        let rgb: Rgb = 0xFF8000.into();
        assert_eq!(rgb, Rgb::new(255, 128, 0));
    }

    #[test]
    fn test_rgb_hex_round_trip() {
        let rgb = Rgb::from_hex("#00ccff").unwrap();
        assert_eq!(rgb, Rgb::new(0, 204, 255));
        assert_eq!(rgb.to_string(), "#00ccff");

        assert_eq!(Rgb::from_hex("ffb000"), Some(Rgb::new(255, 176, 0)));
        assert_eq!(Rgb::from_hex("#fff"), None);
        assert_eq!(Rgb::from_hex("#zzzzzz"), None);
        assert_eq!(Rgb::from_hex(""), None);
    }

    #[test]
    fn test_rgb_lerp_endpoints() {
        let a = Rgb::new(0, 0, 0);
        let b = Rgb::new(255, 100, 10);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgb::new(128, 50, 5));
        // Out-of-range t clamps instead of extrapolating.
        assert_eq!(a.lerp(b, 2.0), b);
    }

    #[test]
    fn test_rgb_near() {
        let a = Rgb::new(10, 10, 10);
        assert!(a.near(Rgb::new(12, 8, 10), 2));
        assert!(!a.near(Rgb::new(13, 10, 10), 2));
    }

    #[test]
    fn test_cell_blank() {
        let cell = Cell::blank(Rgb::new(1, 2, 3));
        assert_eq!(cell.ch(), ' ');
        assert_eq!(cell.fg(), cell.bg());
    }

    #[test]
    fn test_cell_builder_pattern() {
        let cell = Cell::new('X', Rgb::WHITE, Rgb::BLACK)
            .with_fg(Rgb::new(255, 0, 0))
            .with_bg(Rgb::new(0, 0, 255))
            .with_bold(true);

        assert_eq!(cell.fg(), Rgb::new(255, 0, 0));
        assert_eq!(cell.bg(), Rgb::new(0, 0, 255));
        assert!(cell.bold());
    }

    #[test]
    fn test_cell_equality() {
        let a = Cell::new('A', Rgb::WHITE, Rgb::BLACK);
        let b = Cell::new('A', Rgb::WHITE, Rgb::BLACK);
        let c = a.with_bold(true);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
