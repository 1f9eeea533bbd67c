use log::{debug, info};

use crate::model::{StepType, Subtitle};
use crate::playback::lookup::{position_at, position_of_index};
use crate::playback::player::{PlayerState, VideoPlayer};
use crate::playback::tracker::TimeTracker;
use crate::store::progress::VideoProgressStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReviewStep {
    Idle,
    Activated(u32),
    /// The repeat window wrapped back to its start.
    Looped(u32),
    /// Playback passed the last subtitle; the review step is complete.
    Ended,
}

/// Follows the whole video, highlighting the spoken line, with an optional
/// single-line repeat window.
pub struct ReviewSync {
    video_id: String,
    subtitles: Vec<Subtitle>,
    current: Option<usize>,
    repeat: Option<usize>,
    finished: bool,
    tracker: TimeTracker,
}

impl ReviewSync {
    pub fn new(video_id: &str, subtitles: Vec<Subtitle>, tracker: TimeTracker) -> Self {
        Self {
            video_id: video_id.to_string(),
            subtitles,
            current: None,
            repeat: None,
            finished: false,
            tracker,
        }
    }

    pub fn subtitles(&self) -> &[Subtitle] {
        &self.subtitles
    }

    pub fn current(&self) -> Option<&Subtitle> {
        self.current.and_then(|p| self.subtitles.get(p))
    }

    /// Index of the line under repeat, if any.
    pub fn repeat_index(&self) -> Option<u32> {
        self.repeat.map(|p| self.subtitles[p].index)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_tracking(&self) -> bool {
        self.tracker.is_running()
    }

    /// `Ended` from the player completes the step just like reaching the
    /// end of the last line, unless a repeat window is engaged.
    pub fn on_state_change(
        &mut self,
        state: PlayerState,
        player: &mut dyn VideoPlayer,
        progress: &mut VideoProgressStore,
    ) -> ReviewStep {
        match state {
            PlayerState::Ended => match self.repeat {
                Some(pos) => {
                    let window = &self.subtitles[pos];
                    player.seek_to(window.start_time);
                    player.play();
                    ReviewStep::Looped(window.index)
                }
                None => self.end(player, progress),
            },
            PlayerState::Playing => {
                self.tracker.start();
                ReviewStep::Idle
            }
            _ => {
                self.tracker.stop();
                ReviewStep::Idle
            }
        }
    }

    pub fn handle_tick(
        &mut self,
        generation: u64,
        player: &mut dyn VideoPlayer,
        progress: &mut VideoProgressStore,
    ) -> ReviewStep {
        if !self.tracker.accepts(generation) {
            return ReviewStep::Idle;
        }
        self.step(player, progress)
    }

    pub fn step(
        &mut self,
        player: &mut dyn VideoPlayer,
        progress: &mut VideoProgressStore,
    ) -> ReviewStep {
        let time = player.current_time();

        // An engaged window keeps looping even over the last line.
        if let Some(pos) = self.repeat {
            let window = &self.subtitles[pos];
            if !window.contains(time) {
                player.seek_to(window.start_time);
                return ReviewStep::Looped(window.index);
            }
            return ReviewStep::Idle;
        }

        if self
            .subtitles
            .last()
            .is_some_and(|last| time >= last.end_time)
        {
            return self.end(player, progress);
        }

        match position_at(&self.subtitles, time) {
            Some(pos) if self.current != Some(pos) => {
                self.current = Some(pos);
                ReviewStep::Activated(self.subtitles[pos].index)
            }
            _ => ReviewStep::Idle,
        }
    }

    /// Engage the repeat window on `index`, or release it if that line is
    /// already repeating. Either way playback jumps to the line.
    pub fn toggle_repeat(&mut self, index: u32, player: &mut dyn VideoPlayer) -> bool {
        let Some(pos) = position_of_index(&self.subtitles, index) else {
            return false;
        };
        self.repeat = if self.repeat == Some(pos) {
            debug!("repeat released on subtitle {index}");
            None
        } else {
            debug!("repeating subtitle {index}");
            Some(pos)
        };
        self.current = Some(pos);
        player.seek_to(self.subtitles[pos].start_time);
        player.play();
        true
    }

    /// Watch again from the top.
    pub fn restart(&mut self, player: &mut dyn VideoPlayer) {
        self.finished = false;
        self.current = None;
        player.seek_to(0.0);
        player.play();
        self.tracker.start();
    }

    fn end(
        &mut self,
        player: &mut dyn VideoPlayer,
        progress: &mut VideoProgressStore,
    ) -> ReviewStep {
        self.tracker.stop();
        player.pause();
        if self.finished {
            return ReviewStep::Idle;
        }
        self.finished = true;
        progress.mark_step_completed(&self.video_id, StepType::Review);
        info!("review of {} finished", self.video_id);
        ReviewStep::Ended
    }
}
