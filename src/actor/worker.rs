//! Engine Worker: Dedicated thread that owns the running simulation.
//!
//! The worker owns the [`RainEngine`] and the bound [`Surface`] outright;
//! nothing else touches them. It waits on two channels, control messages
//! and frame pulses, and on every pulse applies all control messages that
//! have already arrived before simulating and presenting the frame. A host
//! therefore never observes a frame rendered with half-applied state.

use super::messages::{EngineMessage, FrameTick};
use super::FrameTicker;
use crate::config::Settings;
use crate::rain::RainEngine;
use crate::surface::Surface;
use crossbeam_channel::{bounded, select, Receiver, Sender};
use std::io;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, trace, warn};

/// Capacity of the control channel; senders block briefly when a host
/// outruns the worker instead of growing without bound.
const CONTROL_QUEUE: usize = 64;

/// Worker actor that runs the simulation off the interaction thread.
pub struct EngineWorker {
    /// Handle to the worker thread.
    handle: Option<JoinHandle<()>>,
}

/// Everything the worker thread owns.
struct WorkerState {
    engine: RainEngine,
    surface: Option<Box<dyn Surface>>,
    last_frame: Option<Instant>,
    present_failures: u32,
}

impl WorkerState {
    /// Apply one control message. Returns `false` on shutdown.
    fn apply(&mut self, message: EngineMessage) -> bool {
        match message {
            EngineMessage::Bind {
                surface,
                width,
                height,
            } => {
                self.surface = Some(surface);
                self.engine.resize(width, height);
                self.last_frame = Some(Instant::now());
            }
            EngineMessage::Resize { width, height } => {
                if self.surface.is_some() {
                    self.engine.resize(width, height);
                } else {
                    debug!("resize before bind ignored");
                }
            }
            EngineMessage::Configure(settings) => self.engine.configure(*settings),
            EngineMessage::Text(text) => self.engine.push_text(&text),
            EngineMessage::Loudness(loudness) => self.engine.set_loudness(loudness),
            EngineMessage::Pointer(pointer) => self.engine.set_pointer(pointer),
            EngineMessage::Shutdown => return false,
        }
        true
    }

    /// Simulate one frame and present it. A pulse before any surface is
    /// bound is a no-op.
    fn render(&mut self, tick: FrameTick) -> io::Result<()> {
        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };

        let now = Instant::now();
        let elapsed_ms = self
            .last_frame
            .map_or(0.0, |last| now.duration_since(last).as_secs_f32() * 1000.0);
        self.last_frame = Some(now);

        self.engine.render_frame(elapsed_ms);
        surface.present(self.engine.frame())?;
        trace!("frame {} presented after {elapsed_ms:.1}ms", tick.frame);
        Ok(())
    }
}

impl EngineWorker {
    /// Spawn the worker thread around an engine.
    ///
    /// `ticks` is the frame scheduler: any producer of [`FrameTick`]s
    /// works, from a [`FrameTicker`] to a test harness sending pulses by
    /// hand. Closing either channel stops the worker.
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn the worker thread.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn(
        messages: Receiver<EngineMessage>,
        ticks: Receiver<FrameTick>,
        engine: RainEngine,
    ) -> Self {
        let handle = thread::Builder::new()
            .name("glyphrain-engine".to_string())
            .spawn(move || {
                Self::run_loop(&messages, &ticks, engine);
            })
            .expect("Failed to spawn engine worker thread");

        Self {
            handle: Some(handle),
        }
    }

    /// Wait for the worker thread to finish.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main worker loop.
    fn run_loop(
        messages: &Receiver<EngineMessage>,
        ticks: &Receiver<FrameTick>,
        engine: RainEngine,
    ) {
        let mut state = WorkerState {
            engine,
            surface: None,
            last_frame: None,
            present_failures: 0,
        };

        'run: loop {
            select! {
                recv(messages) -> message => match message {
                    Ok(message) => {
                        if !state.apply(message) {
                            break 'run;
                        }
                    }
                    Err(_) => {
                        debug!("control channel closed; engine worker stopping");
                        break 'run;
                    }
                },
                recv(ticks) -> tick => match tick {
                    Ok(tick) => {
                        // Catch up on control traffic queued since the
                        // last pulse so the frame sees consistent state.
                        while let Ok(message) = messages.try_recv() {
                            if !state.apply(message) {
                                break 'run;
                            }
                        }
                        // A surface rejecting a frame skips that frame
                        // only; the host can bind a fresh surface later.
                        match state.render(tick) {
                            Ok(()) => state.present_failures = 0,
                            Err(e) => {
                                if state.present_failures == 0 {
                                    warn!("surface rejected frame: {e}");
                                }
                                state.present_failures += 1;
                            }
                        }
                    }
                    Err(_) => {
                        debug!("frame scheduler lost; engine worker stopping");
                        break 'run;
                    }
                },
            }
        }
    }
}

/// Handle to a running rain engine.
///
/// This is the piece a host embeds: it launches the worker (and, with
/// [`EngineHandle::launch`], the default ticker), then forwards control
/// messages. Every method is fire-and-forget; once the worker has stopped,
/// sends are silently dropped.
pub struct EngineHandle {
    messages: Sender<EngineMessage>,
    ticker: Option<FrameTicker>,
    worker: Option<EngineWorker>,
}

impl EngineHandle {
    /// Launch a worker paced by a dedicated ticker at `frame_interval`.
    pub fn launch(settings: Settings, frame_interval: Duration) -> Self {
        let ticker = FrameTicker::spawn(frame_interval);
        let ticks = ticker.receiver().clone();
        Self::assemble(RainEngine::new(settings), ticks, Some(ticker))
    }

    /// Launch a worker around a prebuilt engine, paced by an external
    /// scheduler. Dropping the sending side stops the worker.
    pub fn with_scheduler(engine: RainEngine, ticks: Receiver<FrameTick>) -> Self {
        Self::assemble(engine, ticks, None)
    }

    fn assemble(
        engine: RainEngine,
        ticks: Receiver<FrameTick>,
        ticker: Option<FrameTicker>,
    ) -> Self {
        let (tx, rx) = bounded(CONTROL_QUEUE);
        let worker = EngineWorker::spawn(rx, ticks, engine);
        Self {
            messages: tx,
            ticker,
            worker: Some(worker),
        }
    }

    /// Attach an output surface and adopt canvas dimensions.
    pub fn bind(&self, surface: Box<dyn Surface>, width: f32, height: f32) {
        let _ = self.messages.send(EngineMessage::Bind {
            surface,
            width,
            height,
        });
    }

    /// Adopt new canvas dimensions.
    pub fn resize(&self, width: f32, height: f32) {
        let _ = self.messages.send(EngineMessage::Resize { width, height });
    }

    /// Replace the settings record wholesale.
    pub fn configure(&self, settings: Settings) {
        let _ = self
            .messages
            .send(EngineMessage::Configure(Box::new(settings)));
    }

    /// Enqueue text for spawning.
    pub fn text(&self, text: impl Into<String>) {
        let _ = self.messages.send(EngineMessage::Text(text.into()));
    }

    /// Replace the loudness scalar.
    pub fn loudness(&self, loudness: f32) {
        let _ = self.messages.send(EngineMessage::Loudness(loudness));
    }

    /// Replace the pointer position; `None` clears it.
    pub fn pointer(&self, pointer: Option<crate::rain::PointerPos>) {
        let _ = self.messages.send(EngineMessage::Pointer(pointer));
    }

    /// Stop the worker and ticker, waiting for both to finish.
    pub fn shutdown(mut self) {
        let _ = self.messages.send(EngineMessage::Shutdown);
        if let Some(ticker) = self.ticker.take() {
            ticker.join();
        }
        if let Some(worker) = self.worker.take() {
            worker.join();
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        if self.worker.is_some() {
            let _ = self.messages.send(EngineMessage::Shutdown);
            if let Some(ticker) = self.ticker.take() {
                ticker.join();
            }
            if let Some(worker) = self.worker.take() {
                worker.join();
            }
        }
    }
}
