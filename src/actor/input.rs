//! Input Actor: Dedicated thread for polling terminal events.
//!
//! This actor runs in its own thread and uses crossterm's event polling
//! to capture keyboard, pointer, and resize events without blocking the
//! host loop. It forwards host-level events; the host decides which of
//! them become engine messages.

use super::messages::{InputEvent, KeyCode, KeyModifiers};
use crossbeam_channel::Sender;
use crossterm::event::{self, Event, KeyEventKind, MouseEventKind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Input actor that polls terminal events.
pub struct InputActor {
    /// Handle to the input thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl InputActor {
    /// Spawn the input actor thread.
    ///
    /// `poll_timeout` bounds how long the thread waits for an event before
    /// rechecking the shutdown flag.
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn the input thread.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn(sender: Sender<InputEvent>, poll_timeout: Duration) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("glyphrain-input".to_string())
            .spawn(move || {
                Self::run_loop(&sender, &shutdown_clone, poll_timeout);
            })
            .expect("Failed to spawn input thread");

        Self {
            handle: Some(handle),
            shutdown,
        }
    }

    /// Signal the input thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the input thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main input polling loop.
    fn run_loop(sender: &Sender<InputEvent>, shutdown: &Arc<AtomicBool>, poll_timeout: Duration) {
        loop {
            if shutdown.load(Ordering::Relaxed) {
                let _ = sender.send(InputEvent::Shutdown);
                break;
            }

            match event::poll(poll_timeout) {
                Ok(true) => match event::read() {
                    Ok(event) => {
                        if let Some(input_event) = Self::convert_event(event) {
                            if sender.send(input_event).is_err() {
                                // Receiver dropped, exit
                                break;
                            }
                        }
                    }
                    Err(e) => {
                        let _ = sender.send(InputEvent::Error(e.to_string()));
                    }
                },
                Ok(false) => {
                    // No event, continue loop (will check shutdown)
                }
                Err(e) => {
                    let _ = sender.send(InputEvent::Error(e.to_string()));
                }
            }
        }
    }

    /// Convert a crossterm event to our InputEvent.
    fn convert_event(event: Event) -> Option<InputEvent> {
        match event {
            Event::Key(key_event) => {
                // Only process key press events (not release or repeat)
                if key_event.kind != KeyEventKind::Press {
                    return None;
                }

                let code = Self::convert_key_code(key_event.code)?;
                let modifiers = Self::convert_modifiers(key_event.modifiers);

                Some(InputEvent::Key { code, modifiers })
            }

            Event::Mouse(mouse_event) => match mouse_event.kind {
                MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                    Some(InputEvent::PointerMove {
                        column: mouse_event.column,
                        row: mouse_event.row,
                    })
                }
                _ => None,
            },

            Event::Resize(width, height) => Some(InputEvent::Resize { width, height }),

            Event::Paste(text) => Some(InputEvent::Paste(text)),

            Event::FocusGained | Event::FocusLost => None,
        }
    }

    /// Convert crossterm KeyCode to our KeyCode.
    fn convert_key_code(code: event::KeyCode) -> Option<KeyCode> {
        Some(match code {
            event::KeyCode::Char(c) => KeyCode::Char(c),
            event::KeyCode::Enter => KeyCode::Enter,
            event::KeyCode::Tab => KeyCode::Tab,
            event::KeyCode::Backspace => KeyCode::Backspace,
            event::KeyCode::Up => KeyCode::Up,
            event::KeyCode::Down => KeyCode::Down,
            event::KeyCode::Left => KeyCode::Left,
            event::KeyCode::Right => KeyCode::Right,
            event::KeyCode::Esc => KeyCode::Esc,
            _ => return None, // Ignore other key codes
        })
    }

    /// Convert crossterm KeyModifiers to our KeyModifiers.
    fn convert_modifiers(mods: event::KeyModifiers) -> KeyModifiers {
        KeyModifiers {
            shift: mods.contains(event::KeyModifiers::SHIFT),
            control: mods.contains(event::KeyModifiers::CONTROL),
            alt: mods.contains(event::KeyModifiers::ALT),
        }
    }
}

impl Drop for InputActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyEventState, MouseEvent};

    #[test]
    fn test_key_press_converts() {
        let event = Event::Key(KeyEvent {
            code: event::KeyCode::Char('q'),
            modifiers: event::KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        });
        let converted = InputActor::convert_event(event);
        match converted {
            Some(InputEvent::Key { code, modifiers }) => {
                assert_eq!(code, KeyCode::Char('q'));
                assert!(modifiers.control);
            }
            other => panic!("unexpected conversion: {other:?}"),
        }
    }

    #[test]
    fn test_key_release_is_dropped() {
        let event = Event::Key(KeyEvent {
            code: event::KeyCode::Char('q'),
            modifiers: event::KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert!(InputActor::convert_event(event).is_none());
    }

    #[test]
    fn test_pointer_motion_converts() {
        let event = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Moved,
            column: 12,
            row: 3,
            modifiers: event::KeyModifiers::NONE,
        });
        match InputActor::convert_event(event) {
            Some(InputEvent::PointerMove { column, row }) => {
                assert_eq!((column, row), (12, 3));
            }
            other => panic!("unexpected conversion: {other:?}"),
        }
    }

    #[test]
    fn test_paste_converts_intact() {
        // One event with the whole string, never per-character keys.
        let event = Event::Paste("wake up q".to_string());
        match InputActor::convert_event(event) {
            Some(InputEvent::Paste(text)) => assert_eq!(text, "wake up q"),
            other => panic!("unexpected conversion: {other:?}"),
        }
    }

    #[test]
    fn test_clicks_and_focus_are_ignored() {
        let click = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(event::MouseButton::Left),
            column: 0,
            row: 0,
            modifiers: event::KeyModifiers::NONE,
        });
        assert!(InputActor::convert_event(click).is_none());
        assert!(InputActor::convert_event(Event::FocusGained).is_none());
    }
}
