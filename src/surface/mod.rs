//! Drawing surfaces: cells, frames, and terminal presentation.
//!
//! The engine paints into a [`Frame`] and hands it to a [`Surface`] each
//! tick. The production surface is [`TermSurface`]; tests substitute an
//! in-memory capture.

mod cell;
mod frame;
mod term;

pub use cell::{Cell, Rgb};
pub use frame::Frame;
pub use term::{AnsiPresenter, PresentStats, TermSurface};

use std::io;

/// An output device that can display completed frames.
///
/// Implementations move into the engine thread at bind time, so they must
/// be [`Send`]. Presentation failures are reported, not panicked; the
/// engine logs and skips the frame.
pub trait Surface: Send {
    /// Push a completed frame to the output device.
    fn present(&mut self, frame: &Frame) -> io::Result<()>;
}
