pub mod completion;
pub mod progress;
pub mod schema;
pub mod storage;

use std::path::PathBuf;

use crate::store::completion::{DialogueCompletionStore, SubtitleCompletionStore};
use crate::store::progress::VideoProgressStore;
use crate::store::storage::LocalStorage;

/// Every persisted store of a learner, handed to the views that need them.
pub struct LearningStores {
    pub progress: VideoProgressStore,
    pub dialogues: DialogueCompletionStore,
    pub fills: SubtitleCompletionStore,
}

impl LearningStores {
    pub fn open(data_dir: PathBuf) -> Self {
        Self {
            progress: VideoProgressStore::load(Box::new(LocalStorage::open(data_dir.clone()))),
            dialogues: DialogueCompletionStore::load(Box::new(LocalStorage::open(
                data_dir.clone(),
            ))),
            fills: SubtitleCompletionStore::load(Box::new(LocalStorage::open(data_dir))),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            progress: VideoProgressStore::load(Box::new(LocalStorage::in_memory())),
            dialogues: DialogueCompletionStore::load(Box::new(LocalStorage::in_memory())),
            fills: SubtitleCompletionStore::load(Box::new(LocalStorage::in_memory())),
        }
    }

    /// Start a video over: step flags and every per-subtitle record go.
    pub fn reset_video(&mut self, video_id: &str) {
        self.progress.reset_video(video_id);
        self.dialogues.clear_video(video_id);
        self.fills.clear_video(video_id);
    }
}
