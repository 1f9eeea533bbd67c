use log::debug;
use rand::Rng;

use crate::model::{SelectedWordInfo, StepType, Subtitle};
use crate::playback::lookup::{next_position, position_at, previous_position};
use crate::playback::player::{PlayerState, VideoPlayer};
use crate::playback::tracker::TimeTracker;
use crate::session::word_game::WordGame;
use crate::store::LearningStores;
use crate::store::completion::CompletionLookup;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncStep {
    Idle,
    /// The subtitle with this index became active.
    Activated(u32),
    /// Playback hit the end of this subtitle and was rewound to its start.
    Looped(u32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    Moved(u32),
    /// The current sentence has not been completed yet.
    Blocked,
    /// No neighbouring subtitle in that direction.
    AtEnd,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SentenceDone {
    /// More subtitles follow; the host may cue the "next" control.
    NextUnlocked,
    /// That was the last subtitle: the build step is now complete.
    StepFinished,
}

/// Keeps the build view's active subtitle in step with the player clock
/// and loops each spoken line until its sentence is rebuilt.
pub struct BuildSync {
    video_id: String,
    subtitles: Vec<Subtitle>,
    current: Option<usize>,
    tracker: TimeTracker,
}

impl BuildSync {
    pub fn new(video_id: &str, subtitles: Vec<Subtitle>, tracker: TimeTracker) -> Self {
        Self {
            video_id: video_id.to_string(),
            subtitles,
            current: None,
            tracker,
        }
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn subtitles(&self) -> &[Subtitle] {
        &self.subtitles
    }

    pub fn current(&self) -> Option<&Subtitle> {
        self.current.and_then(|p| self.subtitles.get(p))
    }

    pub fn is_tracking(&self) -> bool {
        self.tracker.is_running()
    }

    /// Track the clock only while the player is playing.
    pub fn on_state_change(&mut self, state: PlayerState) {
        if state == PlayerState::Playing {
            self.tracker.start();
        } else {
            self.tracker.stop();
        }
    }

    /// Apply a tick from the tracker; stale or post-stop ticks are dropped.
    pub fn handle_tick(&mut self, generation: u64, player: &mut dyn VideoPlayer) -> SyncStep {
        if !self.tracker.accepts(generation) {
            return SyncStep::Idle;
        }
        self.step(player)
    }

    pub fn step(&mut self, player: &mut dyn VideoPlayer) -> SyncStep {
        let time = player.current_time();

        let Some(active_pos) = self.current else {
            return self.activate_at(time);
        };
        let active = &self.subtitles[active_pos];
        if time < active.end_time {
            return SyncStep::Idle;
        }

        if active.is_silent() {
            return match position_at(&self.subtitles, time) {
                Some(pos) if pos != active_pos => self.activate(pos),
                _ => SyncStep::Idle,
            };
        }

        let (index, start) = (active.index, active.start_time);
        player.pause();
        player.seek_to(start);
        debug!("subtitle {index} reached its end, rewinding to {start:.2}s");
        SyncStep::Looped(index)
    }

    /// "Next" is open when there is no current subtitle, it is silent, or it
    /// is recorded as completed.
    pub fn can_go_next(&self, completions: &dyn CompletionLookup) -> bool {
        match self.current() {
            None => true,
            Some(sub) => sub.is_silent() || completions.is_completed(&self.video_id, sub.index),
        }
    }

    pub fn can_go_previous(&self) -> bool {
        self.current
            .is_some_and(|p| previous_position(&self.subtitles, p).is_some())
    }

    pub fn next(
        &mut self,
        player: &mut dyn VideoPlayer,
        completions: &dyn CompletionLookup,
    ) -> Navigation {
        if !self.can_go_next(completions) {
            return Navigation::Blocked;
        }
        let target = match self.current {
            Some(p) => next_position(&self.subtitles, p),
            None => (!self.subtitles.is_empty()).then_some(0),
        };
        let Some(target) = target else {
            return Navigation::AtEnd;
        };
        self.current = Some(target);
        let sub = &self.subtitles[target];
        player.seek_to(sub.start_time);
        player.play();
        Navigation::Moved(sub.index)
    }

    pub fn previous(&mut self, player: &mut dyn VideoPlayer) -> Navigation {
        let Some(target) = self
            .current
            .and_then(|p| previous_position(&self.subtitles, p))
        else {
            return Navigation::AtEnd;
        };
        self.current = Some(target);
        let sub = &self.subtitles[target];
        player.seek_to(sub.start_time);
        Navigation::Moved(sub.index)
    }

    /// Replay the active line from its start (or the video from 0).
    pub fn repeat(&mut self, player: &mut dyn VideoPlayer) {
        let start = self.current().map_or(0.0, |s| s.start_time);
        player.seek_to(start);
        player.play();
    }

    /// Record the solved sentence. After the last subtitle the build step
    /// is marked complete.
    pub fn complete_current(
        &mut self,
        selected_words: Vec<SelectedWordInfo>,
        stores: &mut LearningStores,
    ) -> Option<SentenceDone> {
        let pos = self.current?;
        let index = self.subtitles[pos].index;
        stores
            .dialogues
            .mark_completed(&self.video_id, index, selected_words);

        if next_position(&self.subtitles, pos).is_some() {
            Some(SentenceDone::NextUnlocked)
        } else {
            stores
                .progress
                .mark_step_completed(&self.video_id, StepType::Build);
            Some(SentenceDone::StepFinished)
        }
    }

    /// A word game for the active line, restored if it was solved before.
    /// Silent lines have no game.
    pub fn word_game<R: Rng + ?Sized>(
        &self,
        stores: &LearningStores,
        rng: &mut R,
    ) -> Option<WordGame> {
        let sub = self.current().filter(|s| !s.is_silent())?;
        let game = match stores.dialogues.completed_words(&self.video_id, sub.index) {
            Some(words) => WordGame::restore(&sub.text, words, rng),
            None => WordGame::new(&sub.text, rng),
        };
        Some(game)
    }

    fn activate_at(&mut self, time: f64) -> SyncStep {
        match position_at(&self.subtitles, time) {
            Some(pos) => self.activate(pos),
            None => SyncStep::Idle,
        }
    }

    fn activate(&mut self, pos: usize) -> SyncStep {
        self.current = Some(pos);
        let index = self.subtitles[pos].index;
        debug!("subtitle {index} active");
        SyncStep::Activated(index)
    }
}
