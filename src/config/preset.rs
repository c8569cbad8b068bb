//! Scene presets: complete settings records built from defaults plus a patch.
//!
//! A preset never edits the caller's current record; it always starts from
//! [`Settings::default`] so two applications of the same preset are
//! identical.

use super::{CharsetId, DisplayMode, FallDirection, Settings, Theme};

/// A named ready-made scene.
#[derive(Clone, Copy)]
pub struct Preset {
    /// Short lookup key.
    pub name: &'static str,
    /// Human-readable name.
    pub title: &'static str,
    /// One-line description for menus.
    pub blurb: &'static str,
    theme: &'static str,
    patch: fn(&mut Settings),
}

impl Preset {
    /// Every built-in preset, in menu order.
    pub const ALL: [Self; 6] = [
        Self {
            name: "classic",
            title: "Classic",
            blurb: "Green katakana rain, stock motion",
            theme: "matrix",
            patch: |_| {},
        },
        Self {
            name: "typewriter",
            title: "Typewriter",
            blurb: "Amber letters, no ambient rain",
            theme: "amber",
            patch: |s| {
                s.mode = DisplayMode::Letters;
                s.charset = CharsetId::Ascii;
                s.background_rain = false;
                s.fall_speed = 3.0;
                s.randomization = 10.0;
            },
        },
        Self {
            name: "drift",
            title: "Drift",
            blurb: "Slow arctic runes rising from the bottom edge",
            theme: "arctic",
            patch: |s| {
                s.charset = CharsetId::Runes;
                s.fall_direction = FallDirection::Up;
                s.fall_speed = 2.5;
                s.rain_spawn_rate = 8.0;
                s.randomization = 85.0;
            },
        },
        Self {
            name: "storm",
            title: "Storm",
            blurb: "Fast crimson downpour with heavy glitching",
            theme: "crimson",
            patch: |s| {
                s.fall_speed = 9.0;
                s.rain_spawn_rate = 45.0;
                s.glitch_chance = 12.0;
                s.ghosting_effect = true;
                s.fade_out_rate = 0.18;
                s.randomization = 70.0;
            },
        },
        Self {
            name: "midas",
            title: "Midas",
            blurb: "Golden digits on a dark bronze field",
            theme: "gold",
            patch: |s| {
                s.charset = CharsetId::Numbers;
                s.rain_spawn_rate = 25.0;
                s.fall_speed = 4.0;
            },
        },
        Self {
            name: "cipher",
            title: "Cipher",
            blurb: "Pink binary with a restless glitch",
            theme: "pink",
            patch: |s| {
                s.mode = DisplayMode::Letters;
                s.charset = CharsetId::Binary;
                s.rain_spawn_rate = 22.0;
                s.glitch_chance = 5.0;
            },
        },
    ];

    /// Look up a preset by its short key, case-insensitively.
    pub fn by_name(name: &str) -> Option<&'static Self> {
        Self::ALL.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Materialize the preset: defaults, then theme, then patch.
    pub fn settings(&self) -> Settings {
        let mut s = Settings::default();
        if let Some(theme) = Theme::by_name(self.theme) {
            s.apply_theme(theme);
        }
        (self.patch)(&mut s);
        s
    }
}

impl std::fmt::Debug for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preset")
            .field("name", &self.name)
            .field("theme", &self.theme)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Rgb;

    #[test]
    fn test_classic_is_pure_defaults() {
        let preset = Preset::by_name("classic").unwrap();
        assert_eq!(preset.settings(), Settings::default());
    }

    #[test]
    fn test_presets_start_from_defaults_not_current_state() {
        let storm = Preset::by_name("storm").unwrap().settings();
        assert!((storm.fall_speed - 9.0).abs() < f32::EPSILON);
        assert_eq!(storm.mode, DisplayMode::Words);
        assert_eq!(storm.tail_color, Rgb::from_u32(0x00ff_2200));
        // A second materialization is identical.
        assert_eq!(storm, Preset::by_name("storm").unwrap().settings());
    }

    #[test]
    fn test_every_preset_references_a_real_theme() {
        for preset in Preset::ALL {
            assert!(
                Theme::by_name(preset.theme).is_some(),
                "{} names missing theme {}",
                preset.name,
                preset.theme
            );
        }
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(Preset::by_name("DRIFT").map(|p| p.title), Some("Drift"));
        assert!(Preset::by_name("vaporwave").is_none());
    }
}
