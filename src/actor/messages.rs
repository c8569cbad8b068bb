//! Message types for actor communication.
//!
//! These enums define the protocol between the host, the input actor, and
//! the engine worker.

use std::fmt;
use std::time::Duration;

use crate::config::Settings;
use crate::rain::PointerPos;
use crate::surface::Surface;

/// Control messages sent from the host to the engine worker.
///
/// Every mutation of the running simulation travels through this enum, so
/// the full host-to-engine protocol is visible in one place. The worker
/// applies all pending messages before rendering each frame, in arrival
/// order.
pub enum EngineMessage {
    /// Attach an output surface and adopt canvas dimensions in engine
    /// pixels. Replaces any previously bound surface.
    Bind {
        /// Where frames are presented.
        surface: Box<dyn Surface>,
        /// Canvas width in engine pixels.
        width: f32,
        /// Canvas height in engine pixels.
        height: f32,
    },

    /// Adopt new canvas dimensions, rebuilding the grid.
    Resize {
        /// Canvas width in engine pixels.
        width: f32,
        /// Canvas height in engine pixels.
        height: f32,
    },

    /// Replace the settings record wholesale.
    Configure(Box<Settings>),

    /// Enqueue text for spawning, split per the current display mode.
    Text(String),

    /// Replace the loudness scalar.
    Loudness(f32),

    /// Replace the pointer position; `None` clears it.
    Pointer(Option<PointerPos>),

    /// Stop the worker thread.
    Shutdown,
}

impl fmt::Debug for EngineMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind { width, height, .. } => f
                .debug_struct("Bind")
                .field("width", width)
                .field("height", height)
                .finish_non_exhaustive(),
            Self::Resize { width, height } => f
                .debug_struct("Resize")
                .field("width", width)
                .field("height", height)
                .finish(),
            Self::Configure(settings) => f.debug_tuple("Configure").field(settings).finish(),
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Loudness(loudness) => f.debug_tuple("Loudness").field(loudness).finish(),
            Self::Pointer(pointer) => f.debug_tuple("Pointer").field(pointer).finish(),
            Self::Shutdown => f.write_str("Shutdown"),
        }
    }
}

/// One frame-scheduler pulse.
#[derive(Debug, Clone, Copy)]
pub struct FrameTick {
    /// Frame number (monotonically increasing).
    pub frame: u64,
    /// Time elapsed since the scheduler was started.
    pub elapsed: Duration,
}

/// Key codes for keyboard input.
///
/// A small subset of crossterm's `KeyCode`, covering what a rain host
/// actually handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Tab key.
    Tab,
    /// Backspace key.
    Backspace,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Escape key.
    Esc,
}

/// Key modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyModifiers {
    /// Shift key held.
    pub shift: bool,
    /// Control key held.
    pub control: bool,
    /// Alt/Option key held.
    pub alt: bool,
}

impl KeyModifiers {
    /// No modifiers.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
    };

    /// Check if any modifier is active.
    pub const fn any(&self) -> bool {
        self.shift || self.control || self.alt
    }
}

/// Events from the input thread.
///
/// These are sent from the input actor to the host loop, which decides
/// what to forward to the engine.
#[derive(Debug, Clone)]
pub enum InputEvent {
    /// A key was pressed.
    Key {
        /// The key code.
        code: KeyCode,
        /// Modifiers held during keypress.
        modifiers: KeyModifiers,
    },

    /// Pointer moved or dragged, in terminal cell coordinates.
    PointerMove {
        /// Column under the pointer.
        column: u16,
        /// Row under the pointer.
        row: u16,
    },

    /// Terminal was resized.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },

    /// Paste event (bracketed paste).
    Paste(String),

    /// Input thread encountered an error.
    Error(String),

    /// Input thread is shutting down.
    Shutdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifiers_any() {
        assert!(!KeyModifiers::NONE.any());
        let ctrl = KeyModifiers {
            control: true,
            ..KeyModifiers::NONE
        };
        assert!(ctrl.any());
    }

    #[test]
    fn test_engine_message_debug_elides_surface() {
        let msg = EngineMessage::Resize {
            width: 80.0,
            height: 24.0,
        };
        let text = format!("{msg:?}");
        assert!(text.contains("Resize"));
        assert!(text.contains("80"));
    }
}
