//! The rain engine: grid simulation and per-frame painting.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{FallDirection, LoudnessTarget, Settings};
use crate::surface::{Frame, Rgb};

use super::{Grid, SpawnQueue};

/// Divisor turning `speed * elapsed_ms` into pixels per frame.
const SPEED_TIME_BASE: f32 = 50.0;
/// Loudness below this is treated as silence.
const LOUDNESS_FLOOR: f32 = 0.01;
/// Sensitivity divisor for the loudness factor.
const LOUDNESS_SENS_BASE: f32 = 25.0;
/// Upper bound on the loudness boost factor.
const LOUDNESS_FACTOR_MAX: f32 = 4.0;
/// Flash intensity for text spawns.
const WORD_FLASH: f32 = 1.0;
/// Flash intensity for ambient rain spawns.
const RAIN_FLASH: f32 = 0.7;
/// Per-frame flash decay step.
const FLASH_DECAY: f32 = 0.04;
/// Entry-edge cells covered by the spawn flash gradient.
const FLASH_SPAN_CELLS: usize = 4;
/// Gradient alpha at the entry edge.
const FLASH_PEAK_ALPHA: f32 = 0.7;
/// Gradient alpha at the halfway stop; it reaches zero at the far end.
const FLASH_MID_ALPHA: f32 = 0.2;
/// Fraction of a column's length over which tail opacity reaches zero.
const TAIL_WINDOW: f32 = 0.8;
/// Brightness value at which tail opacity scale is exactly 1.
const BRIGHTNESS_BASE: f32 = 7.0;
/// Brightness divisor for the glow halo.
const GLOW_BRIGHTNESS_BASE: f32 = 5.0;
/// Halo tint per unit of scaled brightness.
const GLOW_TINT: f32 = 0.15;
/// Strongest halo tint allowed.
const GLOW_TINT_MAX: f32 = 0.6;
/// Head color while a glyph is glitching.
const GLITCH_HEAD: Rgb = Rgb::new(255, 68, 68);
/// Tail color while a glyph is glitching.
const GLITCH_TAIL: Rgb = Rgb::new(255, 100, 100);
/// Halo color behind a glitching head.
const GLITCH_GLOW: Rgb = Rgb::new(255, 0, 0);

/// A pointer position in engine pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPos {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
}

impl PointerPos {
    /// Create a pointer position.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The character-rain simulation and renderer.
///
/// One instance owns everything mutable: grid, spawn queue, settings,
/// loudness, pointer state, the frame it paints, and its random source.
/// Hosts normally drive it through the actor boundary; tests construct it
/// directly with [`RainEngine::with_seed`] and call
/// [`RainEngine::render_frame`] by hand.
#[derive(Debug)]
pub struct RainEngine {
    settings: Settings,
    alphabet: Vec<char>,
    grid: Grid,
    queue: SpawnQueue,
    frame: Frame,
    width: f32,
    height: f32,
    loudness: f32,
    pointer: Option<PointerPos>,
    rng: StdRng,
}

impl RainEngine {
    /// Create an engine with OS-seeded randomness.
    pub fn new(settings: Settings) -> Self {
        Self::with_rng(settings, StdRng::from_os_rng())
    }

    /// Create an engine with a fixed seed for reproducible behavior.
    pub fn with_seed(settings: Settings, seed: u64) -> Self {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: Settings, rng: StdRng) -> Self {
        let alphabet = settings.alphabet().chars().collect();
        Self {
            settings,
            alphabet,
            grid: Grid::new(0),
            queue: SpawnQueue::new(),
            frame: Frame::new(0.0, 0.0, settings.cell_size),
            width: 0.0,
            height: 0.0,
            loudness: 0.0,
            pointer: None,
            rng,
        }
    }

    /// Adopt new canvas dimensions and rebuild the grid.
    ///
    /// In-flight glyphs are lost; that is accepted behavior, not an error.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.frame = Frame::new(self.width, self.height, self.settings.cell_size);
        self.grid = Grid::new(self.frame.cols());
        self.frame.fill(self.settings.bg_color);
        debug!(
            "grid rebuilt: {} columns x {} rows",
            self.grid.len(),
            self.frame.rows()
        );
    }

    /// Replace the settings record wholesale.
    ///
    /// The grid is rebuilt only when cell size or background color changed;
    /// everything else takes effect on the next frame without losing state.
    pub fn configure(&mut self, next: Settings) {
        let rebuild = self.settings.needs_rebuild(&next);
        self.settings = next;
        self.alphabet = next.alphabet().chars().collect();
        if rebuild {
            self.rebuild();
        }
    }

    /// Split `text` per the current display mode and enqueue it.
    pub fn push_text(&mut self, text: &str) {
        self.queue.push_text(text, self.settings.mode);
    }

    /// Replace the loudness scalar; negative input clamps to silence.
    pub fn set_loudness(&mut self, loudness: f32) {
        self.loudness = loudness.max(0.0);
    }

    /// Replace the pointer position; `None` disables displacement.
    pub fn set_pointer(&mut self, pointer: Option<PointerPos>) {
        self.pointer = pointer;
    }

    /// The frame painted by the last [`RainEngine::render_frame`].
    pub const fn frame(&self) -> &Frame {
        &self.frame
    }

    /// The live settings record.
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The column grid.
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The text backlog.
    pub const fn queue(&self) -> &SpawnQueue {
        &self.queue
    }

    /// Place one word (a letter is a one-glyph word) into a free column.
    ///
    /// Returns `false` without mutating anything when every column is
    /// active; the caller keeps the item queued.
    fn place_word(&mut self, glyphs: &[char]) -> bool {
        if glyphs.is_empty() {
            return true;
        }
        let Some(idx) = self
            .grid
            .select_spawn_column(self.settings.randomization, &mut self.rng)
        else {
            return false;
        };
        let pairs = seed_pairs(
            glyphs,
            self.settings.reverse_words,
            self.settings.fall_direction,
            self.settings.cell_size,
            self.height,
        );
        self.grid.columns_mut()[idx].spawn(&pairs, WORD_FLASH);
        true
    }

    /// Move queued text into freed columns, letters first, stopping each
    /// queue at its first placement failure so arrival order is preserved.
    fn drain_queue(&mut self) {
        while let Some(ch) = self.queue.front_letter() {
            if ch.is_whitespace() {
                self.queue.pop_letter();
                continue;
            }
            if self.place_word(&[ch]) {
                self.queue.pop_letter();
            } else {
                return;
            }
        }

        while let Some(word) = self.queue.front_word().map(str::to_owned) {
            if word.is_empty() {
                self.queue.pop_word();
                continue;
            }
            let glyphs: Vec<char> = word.chars().collect();
            if self.place_word(&glyphs) {
                self.queue.pop_word();
            } else {
                return;
            }
        }
    }

    /// Simulate and paint one frame.
    ///
    /// Per frame: apply the loudness boost, clear or fade the background,
    /// roll ambient rain for idle columns, paint and decay spawn flashes,
    /// advance/glitch/displace/paint every glyph, retire columns that left
    /// the canvas, then drain the spawn queue into the freed lanes.
    pub fn render_frame(&mut self, elapsed_ms: f32) {
        let s = self.settings;
        let (speed, brightness, rain_rate) = effective_params(&s, self.loudness);

        if !s.memory_mode {
            if s.ghosting_effect {
                self.frame.fade_toward(s.bg_color, s.fade_out_rate);
            } else {
                self.frame.fill(s.bg_color);
            }
        }

        let step = speed * elapsed_ms / SPEED_TIME_BASE;
        let height = self.height;
        let cell = s.cell_size;
        let pointer = if s.pointer_interaction {
            self.pointer
        } else {
            None
        };

        let frame = &mut self.frame;
        let rng = &mut self.rng;
        let alphabet = &self.alphabet;

        for (i, column) in self.grid.columns_mut().iter_mut().enumerate() {
            if !column.is_active() {
                let spawn_rain = s.background_rain
                    && !alphabet.is_empty()
                    && rng.random_range(0.0..1000.0) < rain_rate;
                if spawn_rain {
                    let ch = alphabet[rng.random_range(0..alphabet.len())];
                    let y = match s.fall_direction {
                        FallDirection::Down => 0.0,
                        FallDirection::Up => height,
                    };
                    column.spawn(&[(ch, y)], RAIN_FLASH);
                } else {
                    continue;
                }
            }

            if s.spawn_flash && column.flash() > 0.0 {
                paint_flash(frame, i, column.flash(), s.fall_direction);
                column.fade_flash(FLASH_DECAY);
            }

            let count = column.len();
            let base_x = i as f32 * cell;
            let mut all_offscreen = true;

            for j in 0..count {
                let y = {
                    let positions = column.positions_mut();
                    let advanced = match s.fall_direction {
                        FallDirection::Down => positions[j] + step,
                        FallDirection::Up => positions[j] - step,
                    };
                    positions[j] = advanced;
                    advanced
                };

                let stored = column.glyphs()[j];
                let (ch, glitched) = if s.glitch_chance > 0.0
                    && !alphabet.is_empty()
                    && rng.random_range(0.0..100.0) < s.glitch_chance
                {
                    (alphabet[rng.random_range(0..alphabet.len())], true)
                } else {
                    (stored, false)
                };

                let x = base_x + pointer_push(pointer, base_x, y, s.pointer_radius, s.pointer_strength);

                let offscreen = is_offscreen(y, s.fall_direction, height, cell);
                if !offscreen {
                    all_offscreen = false;

                    if j + 1 == count {
                        if s.glow_effect {
                            let halo =
                                (brightness / GLOW_BRIGHTNESS_BASE * GLOW_TINT).min(GLOW_TINT_MAX);
                            let glow_color = if glitched { GLITCH_GLOW } else { s.tail_color };
                            if let Some((col, row)) = frame.cell_at(x, y) {
                                frame.tint(col, row, glow_color, halo);
                            }
                        }
                        let color = if glitched { GLITCH_HEAD } else { s.head_color };
                        frame.draw_glyph(x, y, ch, color, 1.0, s.glow_effect);
                    } else {
                        let depth = (count - 1 - j) as f32;
                        let fade = 1.0 - depth / (count as f32 * TAIL_WINDOW);
                        let opacity = (fade.max(0.0) * (brightness / BRIGHTNESS_BASE)).clamp(0.0, 1.0);
                        if opacity > 0.0 {
                            let color = if glitched { GLITCH_TAIL } else { s.tail_color };
                            frame.draw_glyph(x, y, ch, color, opacity, false);
                        }
                    }
                }
            }

            if all_offscreen {
                column.clear();
            }
        }

        self.drain_queue();
    }
}

/// Seed (glyph, position) pairs for a word entering the canvas.
///
/// Reading from tail (index 0) to head (last index) gives the word in
/// reading order, mirrored when `reverse` is set. The head sits at the
/// entry edge; each earlier glyph starts one cell deeper off-screen.
fn seed_pairs(
    glyphs: &[char],
    reverse: bool,
    direction: FallDirection,
    cell: f32,
    height: f32,
) -> Vec<(char, f32)> {
    let count = glyphs.len();
    let ordered: Box<dyn Iterator<Item = char> + '_> = if reverse {
        Box::new(glyphs.iter().rev().copied())
    } else {
        Box::new(glyphs.iter().copied())
    };
    ordered
        .enumerate()
        .map(|(j, ch)| {
            let depth = (count - 1 - j) as f32;
            let y = match direction {
                FallDirection::Down => -depth * cell,
                FallDirection::Up => height + depth * cell,
            };
            (ch, y)
        })
        .collect()
}

/// Apply the loudness boost to the chosen target quantity.
///
/// Returns (speed, brightness, rain rate) after boosting exactly one of
/// them; silence or disabled reactivity returns the base values.
fn effective_params(s: &Settings, loudness: f32) -> (f32, f32, f32) {
    let mut speed = s.fall_speed;
    let mut brightness = s.brightness;
    let mut rain_rate = s.rain_spawn_rate;

    if s.loudness_reactivity && loudness > LOUDNESS_FLOOR {
        let factor =
            (loudness * (s.loudness_sensitivity / LOUDNESS_SENS_BASE)).min(LOUDNESS_FACTOR_MAX);
        match s.loudness_affects {
            LoudnessTarget::Speed => speed += s.fall_speed * factor,
            LoudnessTarget::Brightness => brightness += s.brightness * factor,
            LoudnessTarget::Density => rain_rate += s.rain_spawn_rate * factor * 2.0,
        }
    }

    (speed, brightness, rain_rate)
}

/// Horizontal push applied by the pointer, zero outside its radius.
///
/// Positive strength pushes glyphs directly away from the pointer with an
/// inverse-distance falloff; negative strength pulls them across it.
fn pointer_push(pointer: Option<PointerPos>, x: f32, y: f32, radius: f32, strength: f32) -> f32 {
    let Some(p) = pointer else {
        return 0.0;
    };
    if radius <= 0.0 {
        return 0.0;
    }
    let dx = x - p.x;
    let dy = y - p.y;
    let dist = dx.hypot(dy);
    if dist >= radius {
        return 0.0;
    }
    let force = 1.0 - dist / radius;
    dy.atan2(dx).cos() * force * strength
}

/// A glyph is off-screen once it has fully cleared the exit edge.
fn is_offscreen(y: f32, direction: FallDirection, height: f32, cell: f32) -> bool {
    match direction {
        FallDirection::Down => y > height + cell,
        FallDirection::Up => y < -cell,
    }
}

/// Paint the spawn-flash gradient over a column's entry edge.
fn paint_flash(frame: &mut Frame, col: usize, intensity: f32, direction: FallDirection) {
    let rows = frame.rows();
    if rows == 0 {
        return;
    }
    for k in 0..FLASH_SPAN_CELLS.min(rows) {
        let t = k as f32 / FLASH_SPAN_CELLS as f32;
        let alpha = intensity * gradient_alpha(t);
        let row = match direction {
            FallDirection::Down => k,
            FallDirection::Up => rows - 1 - k,
        };
        frame.tint(col, row, Rgb::WHITE, alpha);
    }
}

/// Piecewise-linear gradient: full alpha at the edge, a fifth halfway,
/// zero at the far end.
fn gradient_alpha(t: f32) -> f32 {
    if t < 0.5 {
        FLASH_PEAK_ALPHA + (FLASH_MID_ALPHA - FLASH_PEAK_ALPHA) * (t / 0.5)
    } else {
        FLASH_MID_ALPHA * (1.0 - (t - 0.5) / 0.5)
    }
}
