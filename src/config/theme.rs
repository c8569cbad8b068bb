//! Color themes: named head/tail/background triples.

use crate::surface::Rgb;

/// A named color triple applied to a settings record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Short lookup key.
    pub name: &'static str,
    /// Human-readable name.
    pub title: &'static str,
    /// Head glyph color.
    pub head: Rgb,
    /// Tail glyph color.
    pub tail: Rgb,
    /// Background color.
    pub background: Rgb,
}

impl Theme {
    /// Every built-in theme, in menu order.
    pub const ALL: [Self; 6] = [
        Self {
            name: "matrix",
            title: "Matrix Green",
            head: Rgb::from_u32(0x00ff_ffff),
            tail: Rgb::from_u32(0x0000_ff00),
            background: Rgb::from_u32(0x0000_0000),
        },
        Self {
            name: "amber",
            title: "Amber Terminal",
            head: Rgb::from_u32(0x00ff_ffbe),
            tail: Rgb::from_u32(0x00ff_b000),
            background: Rgb::from_u32(0x001a_1a1a),
        },
        Self {
            name: "arctic",
            title: "Arctic Blue",
            head: Rgb::from_u32(0x00e0_ffff),
            tail: Rgb::from_u32(0x0000_ccff),
            background: Rgb::from_u32(0x0002_0412),
        },
        Self {
            name: "crimson",
            title: "Crimson Alert",
            head: Rgb::from_u32(0x00ff_ffff),
            tail: Rgb::from_u32(0x00ff_2200),
            background: Rgb::from_u32(0x0010_0000),
        },
        Self {
            name: "pink",
            title: "Hot Pink",
            head: Rgb::from_u32(0x00ff_ffff),
            tail: Rgb::from_u32(0x00ff_69b4),
            background: Rgb::from_u32(0x0000_003f),
        },
        Self {
            name: "gold",
            title: "Gold Standard",
            head: Rgb::from_u32(0x00ff_ffc8),
            tail: Rgb::from_u32(0x00ff_d700),
            background: Rgb::from_u32(0x001c_1600),
        },
    ];

    /// Look up a theme by its short key, case-insensitively.
    pub fn by_name(name: &str) -> Option<&'static Self> {
        Self::ALL.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(Theme::by_name("ARCTIC").map(|t| t.title), Some("Arctic Blue"));
        assert!(Theme::by_name("sepia").is_none());
    }

    #[test]
    fn test_matrix_theme_colors() {
        let t = Theme::by_name("matrix").unwrap();
        assert_eq!(t.head, Rgb::WHITE);
        assert_eq!(t.tail, Rgb::new(0, 255, 0));
        assert_eq!(t.background, Rgb::BLACK);
    }

    #[test]
    fn test_names_unique() {
        for (i, a) in Theme::ALL.iter().enumerate() {
            for b in &Theme::ALL[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }
}
