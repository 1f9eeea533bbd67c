use std::collections::{BTreeMap, HashSet};

use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::{SelectedWordInfo, StepType};
use crate::store::storage::Storage;

const STATE_VERSION: u32 = 0;

/// On-disk wrapper around a store's state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Persisted<T> {
    pub state: T,
    pub version: u32,
}

/// Missing, unparsable or foreign-version payloads load as the default.
pub fn load_state<T: DeserializeOwned + Default>(storage: &dyn Storage, key: &str) -> T {
    let Some(raw) = storage.get(key) else {
        return T::default();
    };
    match serde_json::from_str::<Persisted<T>>(&raw) {
        Ok(p) if p.version == STATE_VERSION => p.state,
        Ok(p) => {
            warn!("{key}: unsupported state version {}, starting fresh", p.version);
            T::default()
        }
        Err(e) => {
            warn!("{key}: unreadable state ({e}), starting fresh");
            T::default()
        }
    }
}

pub fn save_state<T: Serialize>(storage: &mut dyn Storage, key: &str, state: &T) {
    let payload = Persisted {
        state,
        version: STATE_VERSION,
    };
    let result = serde_json::to_string(&payload)
        .map_err(StoreError::from)
        .and_then(|json| storage.set(key, &json));
    if let Err(e) = result {
        warn!("{key}: failed to persist state: {e}");
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepProgress {
    #[serde(rename = "isCompleted")]
    pub is_completed: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoProgress {
    #[serde(default)]
    pub build: StepProgress,
    #[serde(default)]
    pub fill: StepProgress,
    #[serde(default)]
    pub review: StepProgress,
}

impl VideoProgress {
    pub fn step(&self, step: StepType) -> &StepProgress {
        match step {
            StepType::Build => &self.build,
            StepType::Fill => &self.fill,
            StepType::Review => &self.review,
        }
    }

    pub fn step_mut(&mut self, step: StepType) -> &mut StepProgress {
        match step {
            StepType::Build => &mut self.build,
            StepType::Fill => &mut self.fill,
            StepType::Review => &mut self.review,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProgressState {
    #[serde(default)]
    pub progress: BTreeMap<String, VideoProgress>,
}

/// video id -> subtitle index -> accepted words.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DialogueCompletionState {
    #[serde(default)]
    pub completions: BTreeMap<String, BTreeMap<u32, Vec<SelectedWordInfo>>>,
}

/// In-memory form: sets of completed subtitle indices per video.
#[derive(Clone, Debug, Default)]
pub struct SubtitleCompletionState {
    pub completions: BTreeMap<String, HashSet<u32>>,
}

/// Storage form of [`SubtitleCompletionState`]: sets become sorted arrays.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SubtitleCompletionSnapshot {
    #[serde(default)]
    pub completions: BTreeMap<String, Vec<u32>>,
}

impl From<&SubtitleCompletionState> for SubtitleCompletionSnapshot {
    fn from(state: &SubtitleCompletionState) -> Self {
        let completions = state
            .completions
            .iter()
            .map(|(video, set)| {
                let mut indices: Vec<u32> = set.iter().copied().collect();
                indices.sort_unstable();
                (video.clone(), indices)
            })
            .collect();
        Self { completions }
    }
}

impl From<SubtitleCompletionSnapshot> for SubtitleCompletionState {
    fn from(snapshot: SubtitleCompletionSnapshot) -> Self {
        let completions = snapshot
            .completions
            .into_iter()
            .map(|(video, indices)| (video, indices.into_iter().collect()))
            .collect();
        Self { completions }
    }
}
