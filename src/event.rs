use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

pub enum AppEvent {
    /// A command line typed by the learner.
    Line(String),
    /// Wall-clock tick that drives the simulated player.
    Clock,
    /// Subtitle sync tick from a `TimeTracker`, stamped with its generation.
    Sync(u64),
    InputClosed,
}

pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
    tx: mpsc::Sender<AppEvent>,
}

impl EventHandler {
    pub fn new(clock_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        let input_tx = tx.clone();
        thread::spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if input_tx.send(AppEvent::Line(line)).is_err() {
                    return;
                }
            }
            let _ = input_tx.send(AppEvent::InputClosed);
        });

        let clock_tx = tx.clone();
        thread::spawn(move || {
            loop {
                thread::sleep(clock_rate);
                if clock_tx.send(AppEvent::Clock).is_err() {
                    return;
                }
            }
        });

        Self { rx, tx }
    }

    /// For producers living elsewhere, such as sync trackers.
    pub fn sender(&self) -> mpsc::Sender<AppEvent> {
        self.tx.clone()
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}
