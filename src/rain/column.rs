//! Column: one vertical lane of the rain grid.
//!
//! A column holds parallel glyph and position sequences. Index 0 is the
//! oldest glyph (the tail), the last index is the head. All mutation goes
//! through methods that keep the two sequences the same length.

/// One lane of falling glyphs.
#[derive(Debug, Clone, Default)]
pub struct Column {
    glyphs: Vec<char>,
    positions: Vec<f32>,
    active: bool,
    flash: f32,
}

impl Column {
    /// A fresh empty, inactive lane.
    pub fn new() -> Self {
        Self::default()
    }

    /// True while the lane holds at least one glyph.
    #[inline]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Number of glyphs currently falling here.
    #[inline]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// True when no glyphs are falling here.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Glyphs from tail (index 0) to head (last index).
    #[inline]
    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }

    /// Vertical position of each glyph, index-parallel to
    /// [`Column::glyphs`].
    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Mutable positions for per-frame advancement. Lengths cannot change
    /// through this view, so the pairing invariant holds.
    #[inline]
    pub fn positions_mut(&mut self) -> &mut [f32] {
        &mut self.positions
    }

    /// Remaining spawn-flash intensity, 0 when quiet.
    #[inline]
    pub const fn flash(&self) -> f32 {
        self.flash
    }

    /// Replace the lane's contents with `pairs` of (glyph, position) and
    /// activate it at the given flash intensity.
    ///
    /// Empty input clears the lane instead; an active column always holds
    /// at least one glyph.
    pub fn spawn(&mut self, pairs: &[(char, f32)], flash: f32) {
        self.glyphs.clear();
        self.positions.clear();
        if pairs.is_empty() {
            self.active = false;
            return;
        }
        for &(ch, y) in pairs {
            self.glyphs.push(ch);
            self.positions.push(y);
        }
        self.active = true;
        self.flash = flash;
    }

    /// Empty and deactivate the lane, returning it to the selectable pool.
    pub fn clear(&mut self) {
        self.glyphs.clear();
        self.positions.clear();
        self.active = false;
    }

    /// Decay the spawn flash by `step`, clamping at zero.
    pub fn fade_flash(&mut self, step: f32) {
        self.flash = (self.flash - step).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty_and_inactive() {
        let col = Column::new();
        assert!(!col.is_active());
        assert!(col.is_empty());
        assert_eq!(col.glyphs().len(), col.positions().len());
    }

    #[test]
    fn test_spawn_keeps_sequences_parallel() {
        let mut col = Column::new();
        col.spawn(&[('G', -20.0), ('O', 0.0)], 1.0);
        assert!(col.is_active());
        assert_eq!(col.len(), 2);
        assert_eq!(col.glyphs().len(), col.positions().len());
        assert_eq!(col.glyphs(), &['G', 'O']);
        assert!((col.flash() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_spawn_empty_input_deactivates() {
        let mut col = Column::new();
        col.spawn(&[('x', 0.0)], 1.0);
        col.spawn(&[], 1.0);
        assert!(!col.is_active());
        assert!(col.is_empty());
    }

    #[test]
    fn test_clear_returns_lane_to_pool() {
        let mut col = Column::new();
        col.spawn(&[('a', 0.0)], 0.7);
        col.clear();
        assert!(!col.is_active());
        assert_eq!(col.glyphs().len(), 0);
        assert_eq!(col.positions().len(), 0);
    }

    #[test]
    fn test_advance_through_positions_mut() {
        let mut col = Column::new();
        col.spawn(&[('a', 0.0), ('b', -20.0)], 1.0);
        for y in col.positions_mut() {
            *y += 5.0;
        }
        assert_eq!(col.positions(), &[5.0, -15.0]);
        assert_eq!(col.glyphs().len(), col.positions().len());
    }

    #[test]
    fn test_flash_decays_and_clamps() {
        let mut col = Column::new();
        col.spawn(&[('a', 0.0)], 0.1);
        col.fade_flash(0.04);
        assert!((col.flash() - 0.06).abs() < 1e-6);
        col.fade_flash(0.04);
        col.fade_flash(0.04);
        assert!(col.flash().abs() < f32::EPSILON);
    }
}
