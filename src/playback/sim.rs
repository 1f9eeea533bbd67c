use crate::playback::player::{PlayerState, VideoPlayer};

/// A player whose clock only moves when `advance` is called. State changes
/// queue up like the iframe's asynchronous notifications and are collected
/// with `take_state_changes`.
#[derive(Debug)]
pub struct SimulatedPlayer {
    time: f64,
    duration: f64,
    state: PlayerState,
    pending: Vec<PlayerState>,
}

impl SimulatedPlayer {
    pub fn new(duration: f64) -> Self {
        Self {
            time: 0.0,
            duration: duration.max(0.0),
            state: PlayerState::Unstarted,
            pending: Vec::new(),
        }
    }

    /// Move the clock forward by `seconds` if playing.
    pub fn advance(&mut self, seconds: f64) {
        if self.state != PlayerState::Playing {
            return;
        }
        self.time += seconds;
        if self.time >= self.duration {
            self.time = self.duration;
            self.set_state(PlayerState::Ended);
        }
    }

    pub fn take_state_changes(&mut self) -> Vec<PlayerState> {
        std::mem::take(&mut self.pending)
    }

    fn set_state(&mut self, state: PlayerState) {
        if self.state != state {
            self.state = state;
            self.pending.push(state);
        }
    }
}

impl VideoPlayer for SimulatedPlayer {
    fn play(&mut self) {
        if self.time >= self.duration {
            self.time = 0.0;
        }
        self.set_state(PlayerState::Playing);
    }

    fn pause(&mut self) {
        if self.state == PlayerState::Playing || self.state == PlayerState::Buffering {
            self.set_state(PlayerState::Paused);
        }
    }

    fn seek_to(&mut self, seconds: f64) {
        self.time = seconds.clamp(0.0, self.duration);
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn state(&self) -> PlayerState {
        self.state
    }
}
