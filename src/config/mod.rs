//! Engine configuration.
//!
//! A [`Settings`] value is a flat record read fresh by the renderer every
//! frame. The engine never mutates one; hosts replace it wholesale through
//! the boundary protocol. Every field has a default, and the serde shape
//! uses field defaults so a partial JSON document merges against
//! [`Settings::default`] instead of leaving holes.

mod charset;
mod preset;
mod theme;

pub use charset::CharsetId;
pub use preset::Preset;
pub use theme::Theme;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::surface::Rgb;

/// How incoming text is split before entering the spawn queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Each character rains individually.
    Letters,
    /// Whitespace-delimited tokens rain as whole words.
    Words,
    /// Treated identically to [`DisplayMode::Words`].
    Sentences,
}

impl DisplayMode {
    /// Canonical lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Letters => "letters",
            Self::Words => "words",
            Self::Sentences => "sentences",
        }
    }
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "letters" => Ok(Self::Letters),
            "words" => Ok(Self::Words),
            "sentences" => Ok(Self::Sentences),
            other => Err(format!("unknown display mode: {other:?}")),
        }
    }
}

/// Which edge glyphs enter from and which direction they travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallDirection {
    /// Enter at the top, travel toward the bottom.
    Down,
    /// Enter at the bottom, travel toward the top.
    Up,
}

impl FallDirection {
    /// Canonical lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Down => "down",
            Self::Up => "up",
        }
    }
}

impl FromStr for FallDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "down" => Ok(Self::Down),
            "up" => Ok(Self::Up),
            other => Err(format!("unknown fall direction: {other:?}")),
        }
    }
}

/// The single quantity a loudness update boosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoudnessTarget {
    /// Boost fall speed.
    Speed,
    /// Boost glyph brightness.
    Brightness,
    /// Boost the ambient rain spawn rate.
    Density,
}

impl LoudnessTarget {
    /// Canonical lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Speed => "speed",
            Self::Brightness => "brightness",
            Self::Density => "density",
        }
    }
}

impl FromStr for LoudnessTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "speed" => Ok(Self::Speed),
            "brightness" => Ok(Self::Brightness),
            "density" => Ok(Self::Density),
            other => Err(format!("unknown loudness target: {other:?}")),
        }
    }
}

/// The full engine settings record.
///
/// Field semantics follow the frame renderer: probabilities are percentages,
/// distances are engine pixels, `cell_size` is the edge length of one glyph
/// cell in those pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Text split mode for incoming strings.
    pub mode: DisplayMode,
    /// Glyph cell edge length in engine pixels.
    pub cell_size: f32,
    /// Base fall speed.
    pub fall_speed: f32,
    /// Base brightness; scales tail opacity and glow.
    pub brightness: f32,
    /// Per-frame fade alpha used by ghosting.
    pub fade_out_rate: f32,
    /// Percent chance a spawn picks a random column instead of round-robin.
    pub randomization: f32,
    /// Skip background clearing entirely; history never erases.
    pub memory_mode: bool,
    /// Glow behind head glyphs.
    pub glow_effect: bool,
    /// Translucent background fade instead of an opaque clear.
    pub ghosting_effect: bool,
    /// Direction of travel.
    pub fall_direction: FallDirection,
    /// Head glyph color.
    pub head_color: Rgb,
    /// Tail glyph color.
    pub tail_color: Rgb,
    /// Background color.
    pub bg_color: Rgb,
    /// Mirror the glyph fill order of placed words.
    pub reverse_words: bool,
    /// Ambient text-independent rain.
    pub background_rain: bool,
    /// Per-column spawn probability per frame, in permille.
    pub rain_spawn_rate: f32,
    /// Character set used for rain and glitches.
    pub charset: CharsetId,
    /// Bright entry-edge gradient on column activation.
    pub spawn_flash: bool,
    /// Enable the loudness boost.
    pub loudness_reactivity: bool,
    /// Which quantity loudness boosts.
    pub loudness_affects: LoudnessTarget,
    /// Loudness sensitivity divisor input.
    pub loudness_sensitivity: f32,
    /// Percent chance per glyph per frame of a transient substitution.
    pub glitch_chance: f32,
    /// Enable pointer displacement.
    pub pointer_interaction: bool,
    /// Pointer effect radius in engine pixels.
    pub pointer_radius: f32,
    /// Pointer push strength; positive repels, negative attracts.
    pub pointer_strength: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: DisplayMode::Words,
            cell_size: 20.0,
            fall_speed: 5.0,
            brightness: 7.0,
            fade_out_rate: 0.1,
            randomization: 40.0,
            memory_mode: false,
            glow_effect: true,
            ghosting_effect: false,
            fall_direction: FallDirection::Down,
            head_color: Rgb::from_u32(0x00ff_ffff),
            tail_color: Rgb::from_u32(0x0000_ff00),
            bg_color: Rgb::BLACK,
            reverse_words: false,
            background_rain: true,
            rain_spawn_rate: 15.0,
            charset: CharsetId::Katakana,
            spawn_flash: true,
            loudness_reactivity: true,
            loudness_affects: LoudnessTarget::Speed,
            loudness_sensitivity: 50.0,
            glitch_chance: 2.0,
            pointer_interaction: true,
            pointer_radius: 100.0,
            pointer_strength: 15.0,
        }
    }
}

impl Settings {
    /// Copy a theme's three colors into this record.
    pub fn apply_theme(&mut self, theme: &Theme) {
        self.head_color = theme.head;
        self.tail_color = theme.tail;
        self.bg_color = theme.background;
    }

    /// Builder-style [`Settings::apply_theme`].
    #[must_use]
    pub fn with_theme(mut self, theme: &Theme) -> Self {
        self.apply_theme(theme);
        self
    }

    /// The glyph alphabet selected by [`Settings::charset`].
    pub const fn alphabet(&self) -> &'static str {
        self.charset.alphabet()
    }

    /// True when replacing `self` with `next` must rebuild the grid:
    /// only cell size and background color changes invalidate it.
    pub fn needs_rebuild(&self, next: &Self) -> bool {
        (self.cell_size - next.cell_size).abs() > f32::EPSILON || self.bg_color != next.bg_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let s = Settings::default();
        assert_eq!(s.mode, DisplayMode::Words);
        assert!((s.cell_size - 20.0).abs() < f32::EPSILON);
        assert!((s.fall_speed - 5.0).abs() < f32::EPSILON);
        assert!((s.brightness - 7.0).abs() < f32::EPSILON);
        assert!((s.fade_out_rate - 0.1).abs() < f32::EPSILON);
        assert!((s.randomization - 40.0).abs() < f32::EPSILON);
        assert!(!s.memory_mode);
        assert!(s.glow_effect);
        assert!(!s.ghosting_effect);
        assert_eq!(s.fall_direction, FallDirection::Down);
        assert_eq!(s.head_color, Rgb::WHITE);
        assert_eq!(s.tail_color, Rgb::new(0, 255, 0));
        assert_eq!(s.bg_color, Rgb::BLACK);
        assert_eq!(s.charset, CharsetId::Katakana);
        assert_eq!(s.loudness_affects, LoudnessTarget::Speed);
        assert!((s.pointer_radius - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_partial_json_merges_against_defaults() {
        let s: Settings = serde_json::from_str(r#"{"fallSpeed": 9.5, "charset": "binary"}"#)
            .expect("partial settings should deserialize");
        assert!((s.fall_speed - 9.5).abs() < f32::EPSILON);
        assert_eq!(s.charset, CharsetId::Binary);
        // Untouched fields keep their defaults.
        assert!((s.brightness - 7.0).abs() < f32::EPSILON);
        assert_eq!(s.mode, DisplayMode::Words);
    }

    #[test]
    fn test_settings_json_round_trip() {
        let mut s = Settings::default();
        s.head_color = Rgb::from_hex("#ffb000").unwrap();
        s.fall_direction = FallDirection::Up;
        s.loudness_affects = LoudnessTarget::Density;

        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains(r##""headColor":"#ffb000""##));
        assert!(json.contains(r#""fallDirection":"up""#));

        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_needs_rebuild_only_on_cell_or_background() {
        let base = Settings::default();

        let mut other = base;
        other.fall_speed = 12.0;
        other.glitch_chance = 50.0;
        assert!(!base.needs_rebuild(&other));

        let mut resized = base;
        resized.cell_size = 14.0;
        assert!(base.needs_rebuild(&resized));

        let mut recolored = base;
        recolored.bg_color = Rgb::new(16, 22, 0);
        assert!(base.needs_rebuild(&recolored));
    }

    #[test]
    fn test_enum_from_str() {
        assert_eq!("Words".parse::<DisplayMode>(), Ok(DisplayMode::Words));
        assert_eq!("up".parse::<FallDirection>(), Ok(FallDirection::Up));
        assert_eq!(
            "density".parse::<LoudnessTarget>(),
            Ok(LoudnessTarget::Density)
        );
        assert!("sideways".parse::<FallDirection>().is_err());
        assert_eq!(DisplayMode::Sentences.as_str(), "sentences");
    }

    #[test]
    fn test_apply_theme_patches_colors_only() {
        let theme = Theme::by_name("amber").unwrap();
        let s = Settings::default().with_theme(theme);
        assert_eq!(s.head_color, theme.head);
        assert_eq!(s.tail_color, theme.tail);
        assert_eq!(s.bg_color, theme.background);
        assert_eq!(s.mode, DisplayMode::Words);
    }
}
