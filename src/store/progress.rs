use log::info;

use crate::model::StepType;
use crate::store::schema::{ProgressState, VideoProgress, load_state, save_state};
use crate::store::storage::Storage;

pub const PROGRESS_KEY: &str = "shortglish.video_progress";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepStatus {
    Locked,
    Available,
    /// The step the learner should take next.
    InProgress,
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NextStep {
    Step(StepType),
    AllCompleted,
}

/// Per-video completion of the build, fill and review steps.
pub struct VideoProgressStore {
    storage: Box<dyn Storage>,
    state: ProgressState,
}

impl VideoProgressStore {
    pub fn load(storage: Box<dyn Storage>) -> Self {
        let state = load_state(&*storage, PROGRESS_KEY);
        Self { storage, state }
    }

    pub fn mark_step_completed(&mut self, video_id: &str, step: StepType) {
        self.state
            .progress
            .entry(video_id.to_string())
            .or_default()
            .step_mut(step)
            .is_completed = true;
        info!("{video_id}: {} step completed", step.as_str());
        self.persist();
    }

    pub fn is_step_completed(&self, video_id: &str, step: StepType) -> bool {
        self.state
            .progress
            .get(video_id)
            .is_some_and(|p| p.step(step).is_completed)
    }

    /// Build is always open; fill needs build; review needs build and fill.
    pub fn can_access_step(&self, video_id: &str, step: StepType) -> bool {
        match step {
            StepType::Build => true,
            StepType::Fill => self.is_step_completed(video_id, StepType::Build),
            StepType::Review => {
                self.is_step_completed(video_id, StepType::Build)
                    && self.is_step_completed(video_id, StepType::Fill)
            }
        }
    }

    pub fn reset_step(&mut self, video_id: &str, step: StepType) {
        self.state
            .progress
            .entry(video_id.to_string())
            .or_default()
            .step_mut(step)
            .is_completed = false;
        self.persist();
    }

    pub fn reset_video(&mut self, video_id: &str) {
        if self.state.progress.remove(video_id).is_some() {
            self.persist();
        }
    }

    pub fn video_progress(&self, video_id: &str) -> VideoProgress {
        self.state
            .progress
            .get(video_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn next_step(&self, video_id: &str) -> NextStep {
        StepType::all()
            .iter()
            .copied()
            .find(|&step| {
                !self.is_step_completed(video_id, step) && self.can_access_step(video_id, step)
            })
            .map_or(NextStep::AllCompleted, NextStep::Step)
    }

    pub fn step_status(&self, video_id: &str, step: StepType) -> StepStatus {
        if self.is_step_completed(video_id, step) {
            StepStatus::Completed
        } else if self.next_step(video_id) == NextStep::Step(step) {
            StepStatus::InProgress
        } else if self.can_access_step(video_id, step) {
            StepStatus::Available
        } else {
            StepStatus::Locked
        }
    }

    fn persist(&mut self) {
        save_state(&mut *self.storage, PROGRESS_KEY, &self.state);
    }
}
