//! Frame Ticker: Dedicated thread for generating frame pulses.
//!
//! The ticker is the default frame scheduler. It is deliberately dumb: it
//! sends [`FrameTick`]s at a fixed interval and never queues them up, so a
//! slow consumer drops frames instead of building a backlog. The worker
//! accepts any `Receiver<FrameTick>`, which lets tests drive frames by
//! hand without a thread or a clock.

use super::messages::FrameTick;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Ticker actor that generates regular frame pulses.
pub struct FrameTicker {
    /// Handle to the ticker thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
    /// Receiver for frame pulses.
    tick_rx: Receiver<FrameTick>,
}

impl FrameTicker {
    /// Spawn a new ticker with the given interval.
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn the ticker thread.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn(interval: Duration) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        // Bounded channel with small buffer: ticks must not queue up.
        let (tick_tx, tick_rx) = bounded(2);

        let handle = thread::Builder::new()
            .name("glyphrain-ticker".to_string())
            .spawn(move || {
                Self::run_loop(&tick_tx, &shutdown_clone, interval);
            })
            .expect("Failed to spawn ticker thread");

        Self {
            handle: Some(handle),
            shutdown,
            tick_rx,
        }
    }

    /// Get a reference to the tick receiver.
    ///
    /// Clone it and hand it to the engine worker, or use it directly with
    /// `select!` in a host loop.
    #[inline]
    pub const fn receiver(&self) -> &Receiver<FrameTick> {
        &self.tick_rx
    }

    /// Signal the ticker to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the ticker thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main ticker loop.
    fn run_loop(tick_tx: &Sender<FrameTick>, shutdown: &Arc<AtomicBool>, interval: Duration) {
        let start = Instant::now();
        let mut frame = 0u64;
        let mut next_tick = start + interval;

        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            let now = Instant::now();
            if now >= next_tick {
                let tick = FrameTick {
                    frame,
                    elapsed: now - start,
                };

                // Non-blocking send: when the buffer is full the consumer
                // is behind, so this frame is dropped rather than queued.
                let _ = tick_tx.try_send(tick);

                frame += 1;
                next_tick += interval;

                // When far behind, rebase instead of firing a burst.
                if next_tick < now {
                    next_tick = now + interval;
                }
            } else {
                let sleep_duration = next_tick - now;
                thread::sleep(sleep_duration.min(Duration::from_millis(1)));
            }
        }
    }
}

impl Drop for FrameTicker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_delivers_pulses() {
        let ticker = FrameTicker::spawn(Duration::from_millis(10));

        let tick = ticker.receiver().recv_timeout(Duration::from_millis(100));
        assert!(tick.is_ok());
        assert_eq!(tick.unwrap().frame, 0);

        let tick2 = ticker.receiver().recv_timeout(Duration::from_millis(50));
        assert!(tick2.is_ok());

        ticker.join();
    }

    #[test]
    fn test_ticker_shutdown_stops_pulses() {
        let ticker = FrameTicker::spawn(Duration::from_millis(5));
        ticker.shutdown();
        thread::sleep(Duration::from_millis(30));

        // Drain whatever was in flight before the flag was seen.
        while ticker.receiver().try_recv().is_ok() {}
        thread::sleep(Duration::from_millis(30));
        assert!(ticker.receiver().try_recv().is_err());

        ticker.join();
    }

    #[test]
    fn test_slow_consumer_drops_ticks_instead_of_queueing() {
        let ticker = FrameTicker::spawn(Duration::from_millis(1));
        thread::sleep(Duration::from_millis(50));

        // Roughly fifty pulses were generated; at most the channel bound
        // survives unconsumed.
        let mut drained = 0;
        while ticker.receiver().try_recv().is_ok() {
            drained += 1;
        }
        assert!(drained <= 2, "drained {drained} queued ticks");

        ticker.join();
    }
}
