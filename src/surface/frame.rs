//! Frame: the cell canvas one render pass paints into.
//!
//! A frame is a `cols x rows` grid of [`Cell`]s addressed two ways:
//! painter operations take engine-pixel coordinates (`cell_size` pixels per
//! cell, matching the simulation's own space), while cell operations take
//! grid coordinates. Frames are rebuilt on dimension changes, never resized
//! in place, and persist between render passes so ghosting and memory mode
//! can leave prior paint in place.

use super::{Cell, Rgb};

/// Channel tolerance at which a faded cell snaps to flat background.
const FADE_SNAP: u8 = 2;

/// A paintable grid of cells.
#[derive(Clone, PartialEq)]
pub struct Frame {
    cols: usize,
    rows: usize,
    cell_size: f32,
    cells: Vec<Cell>,
}

impl Frame {
    /// Create a frame covering `width_px` by `height_px` engine pixels at
    /// `cell_size` pixels per cell. Fractional trailing space is clipped.
    pub fn new(width_px: f32, height_px: f32, cell_size: f32) -> Self {
        let cell_size = if cell_size > 1.0 { cell_size } else { 1.0 };
        let cols = (width_px.max(0.0) / cell_size) as usize;
        let rows = (height_px.max(0.0) / cell_size) as usize;
        Self {
            cols,
            rows,
            cell_size,
            cells: vec![Cell::default(); cols * rows],
        }
    }

    /// Number of cell columns.
    #[inline]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cell rows.
    #[inline]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Edge length of one cell in engine pixels.
    #[inline]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// True when the frame has no paintable cells.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.cols == 0 || self.rows == 0
    }

    #[inline]
    const fn index(&self, col: usize, row: usize) -> usize {
        row * self.cols + col
    }

    /// Cell at grid coordinates, or `None` out of bounds.
    #[inline]
    pub fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        if col < self.cols && row < self.rows {
            self.cells.get(self.index(col, row))
        } else {
            None
        }
    }

    /// Mutable cell at grid coordinates, or `None` out of bounds.
    #[inline]
    pub fn cell_mut(&mut self, col: usize, row: usize) -> Option<&mut Cell> {
        if col < self.cols && row < self.rows {
            let idx = self.index(col, row);
            self.cells.get_mut(idx)
        } else {
            None
        }
    }

    /// Column index under an engine-pixel x coordinate, rounded to the
    /// nearest cell so displaced glyphs land where they visually sit.
    pub fn col_at(&self, x_px: f32) -> Option<usize> {
        let col = (x_px / self.cell_size).round();
        if col >= 0.0 && (col as usize) < self.cols {
            Some(col as usize)
        } else {
            None
        }
    }

    /// Row index under an engine-pixel y coordinate.
    pub fn row_at(&self, y_px: f32) -> Option<usize> {
        let row = (y_px / self.cell_size).floor();
        if row >= 0.0 && (row as usize) < self.rows {
            Some(row as usize)
        } else {
            None
        }
    }

    /// Grid coordinates under an engine-pixel position.
    pub fn cell_at(&self, x_px: f32, y_px: f32) -> Option<(usize, usize)> {
        match (self.col_at(x_px), self.row_at(y_px)) {
            (Some(col), Some(row)) => Some((col, row)),
            _ => None,
        }
    }

    /// Opaque clear: every cell becomes a blank of `color`.
    pub fn fill(&mut self, color: Rgb) {
        self.cells.fill(Cell::blank(color));
    }

    /// Translucent clear: blend every cell toward `color` by `alpha`.
    ///
    /// Cells that get close enough to the flat background snap onto it and
    /// drop their character, ending the ghost trail.
    pub fn fade_toward(&mut self, color: Rgb, alpha: f32) {
        for cell in &mut self.cells {
            let fg = cell.fg().lerp(color, alpha);
            let bg = cell.bg().lerp(color, alpha);
            if fg.near(color, FADE_SNAP) && bg.near(color, FADE_SNAP) {
                *cell = Cell::blank(color);
            } else {
                cell.set_fg(fg).set_bg(bg).set_bold(false);
            }
        }
    }

    /// Paint one glyph at an engine-pixel position.
    ///
    /// `alpha` blends the glyph color against the cell's current background;
    /// 1.0 paints the color directly. Out-of-bounds positions are ignored.
    pub fn draw_glyph(&mut self, x_px: f32, y_px: f32, ch: char, color: Rgb, alpha: f32, bold: bool) {
        let Some((col, row)) = self.cell_at(x_px, y_px) else {
            return;
        };
        let idx = self.index(col, row);
        let cell = &mut self.cells[idx];
        let fg = if alpha >= 1.0 {
            color
        } else {
            cell.bg().lerp(color, alpha)
        };
        cell.set_ch(ch).set_fg(fg).set_bold(bold);
    }

    /// Blend one cell's background toward `color` by `alpha`, leaving any
    /// glyph in the cell on top of the wash. Out-of-bounds is ignored.
    pub fn tint(&mut self, col: usize, row: usize, color: Rgb, alpha: f32) {
        if let Some(cell) = self.cell_mut(col, row) {
            let bg = cell.bg().lerp(color, alpha);
            cell.set_bg(bg);
            if cell.ch() == ' ' {
                cell.set_fg(bg);
            }
        }
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("cols", &self.cols)
            .field("rows", &self.rows)
            .field("cell_size", &self.cell_size)
            .finish_non_exhaustive()
    }
}
