//! Actor Model: Message-passing concurrency around the rain engine.
//!
//! This module implements a simple actor system using crossbeam channels:
//! - **Engine Worker**: Owns the simulation and the output surface
//! - **Frame Ticker**: Paces the worker with non-queuing frame pulses
//! - **Input Actor**: Polls terminal events, forwards to the host loop
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     InputEvent      ┌──────────────┐
//! │ Input Thread │ ─────────────────▶  │              │
//! └──────────────┘                     │  Host Loop   │
//!                                      │              │
//! ┌──────────────┐    EngineMessage    │              │
//! │Engine Worker │ ◀───────────────── │              │
//! └──────────────┘                     └──────────────┘
//!        ▲
//!        │ FrameTick
//! ┌──────────────┐
//! │ Frame Ticker │
//! └──────────────┘
//! ```
//!
//! The worker never shares the engine: all mutation arrives as an
//! [`EngineMessage`], and everything queued at the moment a [`FrameTick`]
//! lands is applied before that frame is simulated and presented.

mod input;
mod messages;
mod ticker;
mod worker;

pub use input::InputActor;
pub use messages::{EngineMessage, FrameTick, InputEvent, KeyCode, KeyModifiers};
pub use ticker::FrameTicker;
pub use worker::{EngineHandle, EngineWorker};
