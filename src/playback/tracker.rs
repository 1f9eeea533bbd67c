use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use log::debug;

/// Called from the ticker thread with the generation that fired. Returning
/// false (receiver gone) ends the thread.
pub type TickNotify = Arc<dyn Fn(u64) -> bool + Send + Sync>;

struct Ticker {
    stop: Arc<AtomicBool>,
}

impl Ticker {
    fn spawn(period: Duration, generation: u64, notify: TickNotify) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        thread::spawn(move || {
            loop {
                thread::sleep(period);
                if flag.load(Ordering::Acquire) || !notify(generation) {
                    return;
                }
            }
        });
        Self { stop }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
    }
}

/// Owns at most one periodic ticker. The ticker thread only emits
/// `Tick(generation)` notifications; the owner applies them on its own
/// thread and drops any whose generation is no longer current.
pub struct TimeTracker {
    period: Duration,
    notify: TickNotify,
    active: Option<Ticker>,
    generation: u64,
}

impl TimeTracker {
    pub fn new(period: Duration, notify: impl Fn(u64) -> bool + Send + Sync + 'static) -> Self {
        Self {
            period,
            notify: Arc::new(notify),
            active: None,
            generation: 0,
        }
    }

    /// Replaces any running ticker.
    pub fn start(&mut self) {
        self.stop();
        self.generation += 1;
        debug!("time tracking started (generation {})", self.generation);
        self.active = Some(Ticker::spawn(
            self.period,
            self.generation,
            Arc::clone(&self.notify),
        ));
    }

    pub fn stop(&mut self) {
        if self.active.take().is_some() {
            debug!("time tracking stopped (generation {})", self.generation);
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a tick stamped `generation` should still be applied.
    pub fn accepts(&self, generation: u64) -> bool {
        self.is_running() && generation == self.generation
    }
}
