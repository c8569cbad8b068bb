//! # Glyphrain
//!
//! A continuously animated character-rain engine driven by live text.
//!
//! Glyphrain renders the classic falling-glyph effect, but the glyphs are
//! not random noise: letters and words stream in from the host (a
//! transcript, a log, typed input) and fall through a column grid, with
//! loudness and pointer position bending the animation in real time.
//!
//! ## Core Concepts
//!
//! - **Column grid**: One lane per cell column; words occupy a lane until
//!   they fall off, queued text waits for a vacancy
//! - **Actor model**: The simulation runs on its own worker thread, driven
//!   by messages and a non-queuing frame scheduler
//! - **Surfaces**: The engine paints a [`Frame`] of cells; a [`Surface`]
//!   presents it, with diffed ANSI output for terminals built in
//!
//! ## Example
//!
//! ```rust,ignore
//! use glyphrain::{EngineHandle, Settings, TermSurface};
//! use std::time::Duration;
//!
//! let handle = EngineHandle::launch(Settings::default(), Duration::from_millis(33));
//! let surface = TermSurface::new()?;
//! let (cols, rows) = TermSurface::grid_size()?;
//! let cell = Settings::default().cell_size;
//! handle.bind(Box::new(surface), f32::from(cols) * cell, f32::from(rows) * cell);
//! handle.text("wake up");
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
#[cfg(feature = "audio")]
pub mod audio;
pub mod config;
pub mod rain;
pub mod surface;

// Re-exports for convenience
pub use actor::{
    EngineHandle, EngineMessage, FrameTick, FrameTicker, InputActor, InputEvent, KeyCode,
    KeyModifiers,
};
pub use config::{
    CharsetId, DisplayMode, FallDirection, LoudnessTarget, Preset, Settings, Theme,
};
pub use rain::{PointerPos, RainEngine};
pub use surface::{Cell, Frame, Rgb, Surface, TermSurface};
