use crate::model::SelectedWordInfo;
use crate::store::schema::{
    DialogueCompletionState, SubtitleCompletionSnapshot, SubtitleCompletionState, load_state,
    save_state,
};
use crate::store::storage::Storage;

pub const DIALOGUE_KEY: &str = "shortglish.dialogue_completion";
pub const FILL_KEY: &str = "shortglish.subtitle_completion";

/// Read side shared by the completion stores, used for navigation gating.
pub trait CompletionLookup {
    fn is_completed(&self, video_id: &str, subtitle_index: u32) -> bool;
}

/// The word list that solved each subtitle of the build step.
pub struct DialogueCompletionStore {
    storage: Box<dyn Storage>,
    state: DialogueCompletionState,
}

impl DialogueCompletionStore {
    pub fn load(storage: Box<dyn Storage>) -> Self {
        let state = load_state(&*storage, DIALOGUE_KEY);
        Self { storage, state }
    }

    pub fn mark_completed(
        &mut self,
        video_id: &str,
        subtitle_index: u32,
        selected_words: Vec<SelectedWordInfo>,
    ) {
        self.state
            .completions
            .entry(video_id.to_string())
            .or_default()
            .insert(subtitle_index, selected_words);
        self.persist();
    }

    pub fn completed_words(&self, video_id: &str, subtitle_index: u32) -> Option<&[SelectedWordInfo]> {
        self.state
            .completions
            .get(video_id)?
            .get(&subtitle_index)
            .map(Vec::as_slice)
    }

    pub fn completed_count(&self, video_id: &str) -> usize {
        self.state.completions.get(video_id).map_or(0, |m| m.len())
    }

    pub fn clear_video(&mut self, video_id: &str) {
        if self.state.completions.remove(video_id).is_some() {
            self.persist();
        }
    }

    fn persist(&mut self) {
        save_state(&mut *self.storage, DIALOGUE_KEY, &self.state);
    }
}

impl CompletionLookup for DialogueCompletionStore {
    fn is_completed(&self, video_id: &str, subtitle_index: u32) -> bool {
        self.state
            .completions
            .get(video_id)
            .is_some_and(|m| m.contains_key(&subtitle_index))
    }
}

/// Which subtitles of a video were solved in the fill step.
pub struct SubtitleCompletionStore {
    storage: Box<dyn Storage>,
    state: SubtitleCompletionState,
}

impl SubtitleCompletionStore {
    pub fn load(storage: Box<dyn Storage>) -> Self {
        let snapshot: SubtitleCompletionSnapshot = load_state(&*storage, FILL_KEY);
        Self {
            storage,
            state: snapshot.into(),
        }
    }

    pub fn mark_completed(&mut self, video_id: &str, subtitle_index: u32) {
        let inserted = self
            .state
            .completions
            .entry(video_id.to_string())
            .or_default()
            .insert(subtitle_index);
        if inserted {
            self.persist();
        }
    }

    /// Completed indices in ascending order.
    pub fn completed(&self, video_id: &str) -> Vec<u32> {
        let mut indices: Vec<u32> = self
            .state
            .completions
            .get(video_id)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default();
        indices.sort_unstable();
        indices
    }

    pub fn clear_video(&mut self, video_id: &str) {
        if self.state.completions.remove(video_id).is_some() {
            self.persist();
        }
    }

    fn persist(&mut self) {
        let snapshot = SubtitleCompletionSnapshot::from(&self.state);
        save_state(&mut *self.storage, FILL_KEY, &snapshot);
    }
}

impl CompletionLookup for SubtitleCompletionStore {
    fn is_completed(&self, video_id: &str, subtitle_index: u32) -> bool {
        self.state
            .completions
            .get(video_id)
            .is_some_and(|s| s.contains(&subtitle_index))
    }
}
