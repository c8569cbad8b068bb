//! Terminal presentation: minimal ANSI emission and the live surface.
//!
//! [`AnsiPresenter`] turns frames into escape sequences:
//! 1. Compare the previous and next frame cell by cell
//! 2. Emit cursor moves only when the write position jumps
//! 3. Track SGR state (truecolor fg/bg, bold) to skip redundant sequences
//! 4. Accumulate everything in one buffer for a single flush
//!
//! [`TermSurface`] owns the real terminal: raw mode, alternate screen, mouse
//! capture, bracketed paste and cursor visibility are acquired on
//! construction and restored on drop, so a panicking host still gets its
//! shell back.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{cursor, event, execute, terminal};
use log::{debug, trace};

use super::{Frame, Rgb, Surface};

/// Counters describing one presentation pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresentStats {
    /// Number of cells that produced output.
    pub cells_changed: usize,
    /// Number of cursor move sequences emitted.
    pub cursor_moves: usize,
    /// Number of color change sequences emitted.
    pub color_changes: usize,
}

/// Stateful ANSI generator.
///
/// Tracks what the terminal currently shows (cursor position, SGR state) so
/// consecutive [`AnsiPresenter::render_diff`] calls emit only what changed.
#[derive(Debug, Clone)]
pub struct AnsiPresenter {
    /// Write position after the last emitted glyph; `None` forces a move.
    cursor: Option<(usize, usize)>,
    fg: Option<Rgb>,
    bg: Option<Rgb>,
    bold: Option<bool>,
}

impl Default for AnsiPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl AnsiPresenter {
    /// Create a presenter with unknown terminal state.
    pub const fn new() -> Self {
        Self {
            cursor: None,
            fg: None,
            bg: None,
            bold: None,
        }
    }

    /// Forget all tracked state, forcing explicit sequences on next use.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Repaint every cell of `frame` from the home position.
    ///
    /// Leaves SGR tracking valid for a following diff but the cursor
    /// position unknown.
    pub fn render_full(&mut self, frame: &Frame, output: &mut Vec<u8>) -> PresentStats {
        let mut stats = PresentStats {
            cursor_moves: 1,
            ..PresentStats::default()
        };
        output.extend_from_slice(b"\x1b[H");

        for row in 0..frame.rows() {
            if row > 0 {
                output.extend_from_slice(b"\r\n");
            }
            for col in 0..frame.cols() {
                let Some(cell) = frame.cell(col, row) else {
                    continue;
                };
                self.sgr(output, cell.fg(), cell.bg(), cell.bold(), &mut stats);
                emit_char(output, cell.ch());
                stats.cells_changed += 1;
            }
        }

        self.cursor = None;
        stats
    }

    /// Emit only the cells where `next` differs from `prev`.
    ///
    /// The frames must have identical dimensions; the caller falls back to
    /// [`AnsiPresenter::render_full`] when they do not.
    pub fn render_diff(&mut self, prev: &Frame, next: &Frame, output: &mut Vec<u8>) -> PresentStats {
        debug_assert_eq!(prev.cols(), next.cols());
        debug_assert_eq!(prev.rows(), next.rows());

        let mut stats = PresentStats::default();

        for row in 0..next.rows() {
            for col in 0..next.cols() {
                let (Some(old), Some(new)) = (prev.cell(col, row), next.cell(col, row)) else {
                    continue;
                };
                if old == new {
                    continue;
                }
                stats.cells_changed += 1;

                if self.cursor != Some((col, row)) {
                    emit_cursor_move(output, col, row);
                    stats.cursor_moves += 1;
                }
                self.sgr(output, new.fg(), new.bg(), new.bold(), &mut stats);
                emit_char(output, new.ch());
                self.cursor = Some((col + 1, row));
            }
        }

        stats
    }

    /// Emit whichever SGR sequences are needed to reach the given state.
    fn sgr(&mut self, output: &mut Vec<u8>, fg: Rgb, bg: Rgb, bold: bool, stats: &mut PresentStats) {
        if self.bold != Some(bold) {
            output.extend_from_slice(if bold { b"\x1b[1m" } else { b"\x1b[22m" });
            self.bold = Some(bold);
        }
        if self.fg != Some(fg) {
            emit_fg_color(output, fg);
            self.fg = Some(fg);
            stats.color_changes += 1;
        }
        if self.bg != Some(bg) {
            emit_bg_color(output, bg);
            self.bg = Some(bg);
            stats.color_changes += 1;
        }
    }
}

/// Emit a cursor move sequence in its most compact form.
#[inline]
fn emit_cursor_move(output: &mut Vec<u8>, col: usize, row: usize) {
    // ANSI positions are 1-indexed
    let row = row + 1;
    let col = col + 1;

    if row == 1 && col == 1 {
        output.extend_from_slice(b"\x1b[H");
    } else if col == 1 {
        let _ = write!(output, "\x1b[{row}H");
    } else {
        let _ = write!(output, "\x1b[{row};{col}H");
    }
}

/// Emit a truecolor foreground sequence.
#[inline]
fn emit_fg_color(output: &mut Vec<u8>, color: Rgb) {
    let _ = write!(output, "\x1b[38;2;{};{};{}m", color.r, color.g, color.b);
}

/// Emit a truecolor background sequence.
#[inline]
fn emit_bg_color(output: &mut Vec<u8>, color: Rgb) {
    let _ = write!(output, "\x1b[48;2;{};{};{}m", color.r, color.g, color.b);
}

#[inline]
fn emit_char(output: &mut Vec<u8>, ch: char) {
    let mut utf8 = [0u8; 4];
    output.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
}

/// Queue and flush every screen mode the surface runs under.
///
/// Raw mode is a tty attribute rather than an escape sequence and is
/// toggled separately by the caller.
fn enter_screen_modes(out: &mut impl Write) -> io::Result<()> {
    execute!(
        out,
        terminal::EnterAlternateScreen,
        event::EnableMouseCapture,
        // DECSET 2004: a paste arrives as one Event::Paste, not keystrokes
        event::EnableBracketedPaste,
        cursor::Hide,
        terminal::Clear(terminal::ClearType::All),
    )
}

/// Reverse every mode set by [`enter_screen_modes`], alternate screen last.
fn restore_screen_modes(out: &mut impl Write) -> io::Result<()> {
    execute!(
        out,
        cursor::Show,
        event::DisableBracketedPaste,
        event::DisableMouseCapture,
        terminal::LeaveAlternateScreen,
    )
}

/// The live terminal as a [`Surface`].
///
/// Presentation diffs against the previously presented frame; the first
/// present and any present after a dimension change repaint everything.
pub struct TermSurface {
    out: BufWriter<Stdout>,
    presenter: AnsiPresenter,
    prev: Option<Frame>,
    buf: Vec<u8>,
}

impl TermSurface {
    /// Take over the terminal: raw mode, alternate screen, mouse capture,
    /// bracketed paste, hidden cursor.
    pub fn new() -> io::Result<Self> {
        let mut out = BufWriter::new(io::stdout());
        terminal::enable_raw_mode()?;
        enter_screen_modes(&mut out)?;
        debug!("terminal surface acquired");
        Ok(Self {
            out,
            presenter: AnsiPresenter::new(),
            prev: None,
            buf: Vec::with_capacity(16 * 1024),
        })
    }

    /// Current terminal size in character cells (columns, rows).
    pub fn grid_size() -> io::Result<(u16, u16)> {
        terminal::size()
    }
}

impl Surface for TermSurface {
    fn present(&mut self, frame: &Frame) -> io::Result<()> {
        self.buf.clear();

        let stats = match &self.prev {
            Some(prev) if prev.cols() == frame.cols() && prev.rows() == frame.rows() => {
                self.presenter.render_diff(prev, frame, &mut self.buf)
            }
            _ => {
                self.presenter.reset();
                self.buf.extend_from_slice(b"\x1b[2J");
                self.presenter.render_full(frame, &mut self.buf)
            }
        };

        if !self.buf.is_empty() {
            self.out.write_all(&self.buf)?;
            self.out.flush()?;
        }
        trace!(
            "presented frame: {} cells, {} bytes",
            stats.cells_changed,
            self.buf.len()
        );

        match &mut self.prev {
            Some(prev) => prev.clone_from(frame),
            None => self.prev = Some(frame.clone()),
        }
        Ok(())
    }
}

impl Drop for TermSurface {
    fn drop(&mut self) {
        let _ = restore_screen_modes(&mut self.out);
        let _ = terminal::disable_raw_mode();
        debug!("terminal surface released");
    }
}

impl std::fmt::Debug for TermSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TermSurface")
            .field("bound", &self.prev.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(cols: usize, rows: usize) -> Frame {
        let mut f = Frame::new(cols as f32 * 10.0, rows as f32 * 10.0, 10.0);
        f.fill(Rgb::BLACK);
        f
    }

    #[test]
    fn test_diff_identical_frames_is_empty() {
        let a = frame(10, 5);
        let b = frame(10, 5);
        let mut output = Vec::new();
        let mut presenter = AnsiPresenter::new();

        let stats = presenter.render_diff(&a, &b, &mut output);

        assert_eq!(stats.cells_changed, 0);
        assert!(output.is_empty());
    }

    #[test]
    fn test_diff_single_cell_change() {
        let a = frame(10, 5);
        let mut b = frame(10, 5);
        b.draw_glyph(50.0, 20.0, 'X', Rgb::WHITE, 1.0, false);

        let mut output = Vec::new();
        let mut presenter = AnsiPresenter::new();
        let stats = presenter.render_diff(&a, &b, &mut output);

        assert_eq!(stats.cells_changed, 1);
        let text = String::from_utf8_lossy(&output);
        assert!(text.contains("\x1b[3;6H"), "move to row 3 col 6: {text:?}");
        assert!(text.contains('X'));
        assert!(text.contains("\x1b[38;2;255;255;255m"));
    }

    #[test]
    fn test_diff_adjacent_run_moves_once() {
        let a = frame(10, 5);
        let mut b = frame(10, 5);
        for (i, ch) in ['A', 'B', 'C'].into_iter().enumerate() {
            b.draw_glyph(i as f32 * 10.0, 0.0, ch, Rgb::WHITE, 1.0, false);
        }

        let mut output = Vec::new();
        let mut presenter = AnsiPresenter::new();
        let stats = presenter.render_diff(&a, &b, &mut output);

        assert_eq!(stats.cells_changed, 3);
        // One forced initial move (home), then the cursor rides the run.
        assert_eq!(stats.cursor_moves, 1);
        assert!(output.starts_with(b"\x1b[H"));
    }

    #[test]
    fn test_diff_tracks_colors_across_cells() {
        let a = frame(10, 2);
        let mut b = frame(10, 2);
        let green = Rgb::new(0, 255, 0);
        b.draw_glyph(0.0, 0.0, 'a', green, 1.0, false);
        b.draw_glyph(10.0, 0.0, 'b', green, 1.0, false);

        let mut output = Vec::new();
        let mut presenter = AnsiPresenter::new();
        let stats = presenter.render_diff(&a, &b, &mut output);

        // fg and bg emitted once for the first cell, reused for the second.
        assert_eq!(stats.color_changes, 2);
    }

    #[test]
    fn test_bold_toggles_on_and_off() {
        let a = frame(4, 1);
        let mut b = frame(4, 1);
        b.draw_glyph(0.0, 0.0, 'H', Rgb::WHITE, 1.0, true);
        b.draw_glyph(10.0, 0.0, 't', Rgb::WHITE, 1.0, false);

        let mut output = Vec::new();
        let mut presenter = AnsiPresenter::new();
        presenter.render_diff(&a, &b, &mut output);

        let text = String::from_utf8_lossy(&output);
        let bold_on = text.find("\x1b[1m").expect("bold on");
        let bold_off = text.find("\x1b[22m").expect("bold off");
        assert!(bold_on < bold_off);
    }

    #[test]
    fn test_render_full_covers_frame() {
        let mut f = frame(3, 2);
        f.draw_glyph(0.0, 0.0, 'A', Rgb::WHITE, 1.0, false);
        f.draw_glyph(10.0, 10.0, 'B', Rgb::WHITE, 1.0, false);

        let mut output = Vec::new();
        let mut presenter = AnsiPresenter::new();
        let stats = presenter.render_full(&f, &mut output);

        assert_eq!(stats.cells_changed, 6);
        let text = String::from_utf8_lossy(&output);
        assert!(text.starts_with("\x1b[H"));
        assert!(text.contains('A') && text.contains('B'));
        assert!(text.contains("\x1b[48;2;0;0;0m"));
    }

    #[test]
    fn test_full_then_diff_reuses_sgr_state() {
        let mut presenter = AnsiPresenter::new();
        let mut output = Vec::new();
        let a = frame(4, 2);
        presenter.render_full(&a, &mut output);

        // Same colors everywhere: a diff right after should emit no SGR.
        let mut b = a.clone();
        b.draw_glyph(0.0, 0.0, 'Q', Rgb::BLACK, 1.0, false);
        output.clear();
        let stats = presenter.render_diff(&a, &b, &mut output);
        assert_eq!(stats.cells_changed, 1);
        assert_eq!(stats.color_changes, 0);
    }

    #[test]
    fn test_cursor_move_compact_forms() {
        let mut output = Vec::new();
        emit_cursor_move(&mut output, 0, 0);
        assert_eq!(&output, b"\x1b[H");

        output.clear();
        emit_cursor_move(&mut output, 0, 5);
        assert_eq!(&output, b"\x1b[6H");

        output.clear();
        emit_cursor_move(&mut output, 10, 5);
        assert_eq!(&output, b"\x1b[6;11H");
    }

    #[test]
    fn test_screen_modes_enable_bracketed_paste() {
        let mut out = Vec::new();
        enter_screen_modes(&mut out).unwrap();

        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("\x1b[?1049h"), "alternate screen: {text:?}");
        assert!(text.contains("\x1b[?1000h"), "mouse capture: {text:?}");
        assert!(text.contains("\x1b[?2004h"), "bracketed paste: {text:?}");
        assert!(text.contains("\x1b[?25l"), "hidden cursor: {text:?}");
    }

    #[test]
    fn test_restore_reverses_every_screen_mode() {
        let mut out = Vec::new();
        restore_screen_modes(&mut out).unwrap();

        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("\x1b[?25h"), "cursor shown: {text:?}");
        assert!(text.contains("\x1b[?2004l"), "bracketed paste off: {text:?}");
        assert!(text.contains("\x1b[?1000l"), "mouse capture off: {text:?}");
        assert!(text.ends_with("\x1b[?1049l"), "alternate screen last: {text:?}");
    }
}
