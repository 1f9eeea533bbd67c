use std::collections::BTreeMap;

use log::{debug, info};

use crate::model::{StepType, Subtitle};
use crate::session::fill_blank::{BlankLayout, all_filled, check_answer, compute_layout};
use crate::session::letter_input::{FocusTarget, LetterEvent, LetterInputs};
use crate::speech::{Speaker, Utterance, Voice};
use crate::store::LearningStores;
use crate::store::completion::{CompletionLookup, SubtitleCompletionStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckResult {
    Pending,
    Success,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillAdvance {
    /// The current sentence has not been checked as correct.
    Blocked,
    Next,
    /// The last sentence was solved; the fill step is complete.
    StepFinished,
}

/// Walks the blank-bearing subtitles of a video one sentence at a time.
#[derive(Debug)]
pub struct FillSession {
    video_id: String,
    subtitles: Vec<Subtitle>,
    current: usize,
    layout: BlankLayout,
    blanks: BTreeMap<usize, LetterInputs>,
    focused: Option<usize>,
    hint_shown: bool,
    result: CheckResult,
}

impl FillSession {
    pub fn new(video_id: &str, subtitles: Vec<Subtitle>) -> Self {
        let subtitles: Vec<Subtitle> = subtitles.into_iter().filter(|s| s.has_blanks()).collect();
        let mut session = Self {
            video_id: video_id.to_string(),
            subtitles,
            current: 0,
            layout: BlankLayout::default(),
            blanks: BTreeMap::new(),
            focused: None,
            hint_shown: false,
            result: CheckResult::Pending,
        };
        session.load_current();
        session
    }

    /// Start at the first sentence not yet solved, or from the top when
    /// every one is.
    pub fn resume(video_id: &str, subtitles: Vec<Subtitle>, fills: &SubtitleCompletionStore) -> Self {
        let mut session = Self::new(video_id, subtitles);
        let first_open = session
            .subtitles
            .iter()
            .position(|s| !fills.is_completed(video_id, s.index));
        if let Some(pos) = first_open
            && pos != 0
        {
            session.current = pos;
            session.load_current();
        }
        session
    }

    pub fn is_empty(&self) -> bool {
        self.subtitles.is_empty()
    }

    pub fn current(&self) -> Option<&Subtitle> {
        self.subtitles.get(self.current)
    }

    /// One-based position and total, for the progress bar.
    pub fn progress(&self) -> (usize, usize) {
        if self.subtitles.is_empty() {
            (0, 0)
        } else {
            (self.current + 1, self.subtitles.len())
        }
    }

    pub fn layout(&self) -> &BlankLayout {
        &self.layout
    }

    pub fn blank(&self, position: usize) -> Option<&LetterInputs> {
        self.blanks.get(&position)
    }

    pub fn focused_blank(&self) -> Option<usize> {
        self.focused
    }

    pub fn result(&self) -> CheckResult {
        self.result
    }

    pub fn hint_shown(&self) -> bool {
        self.hint_shown
    }

    /// Typed text per blank position.
    pub fn inputs(&self) -> BTreeMap<usize, String> {
        self.blanks
            .iter()
            .map(|(&pos, input)| (pos, input.value()))
            .collect()
    }

    pub fn focus_blank(&mut self, position: usize) -> bool {
        if !self.blanks.contains_key(&position) {
            return false;
        }
        self.move_focus(position, false);
        true
    }

    pub fn type_char(&mut self, ch: char) -> LetterEvent {
        let Some(pos) = self.focused else {
            return LetterEvent::Ignored;
        };
        let Some(input) = self.blanks.get_mut(&pos) else {
            return LetterEvent::Ignored;
        };
        let event = input.type_char(ch);
        match event {
            LetterEvent::Advanced => self.result = CheckResult::Pending,
            LetterEvent::WordComplete => {
                self.result = CheckResult::Pending;
                if let Some(next) = self.neighbour_blank(pos, true) {
                    self.move_focus(next, false);
                }
            }
            _ => {}
        }
        event
    }

    pub fn backspace(&mut self) -> LetterEvent {
        let Some(pos) = self.focused else {
            return LetterEvent::Ignored;
        };
        let Some(input) = self.blanks.get_mut(&pos) else {
            return LetterEvent::Ignored;
        };
        let event = input.backspace();
        match event {
            LetterEvent::Cleared => self.result = CheckResult::Pending,
            LetterEvent::MoveToPrevWord => {
                if let Some(prev) = self.neighbour_blank(pos, false) {
                    self.move_focus(prev, true);
                }
            }
            _ => {}
        }
        event
    }

    /// Replace a blank's content wholesale.
    pub fn set_input(&mut self, position: usize, text: &str) -> bool {
        let Some(input) = self.blanks.get_mut(&position) else {
            return false;
        };
        input.set_value(text);
        self.result = CheckResult::Pending;
        true
    }

    /// Reveal the first letter of every blank. Stays on until the
    /// sentence changes.
    pub fn show_hint(&mut self) {
        if self.hint_shown {
            return;
        }
        self.hint_shown = true;
        for input in self.blanks.values_mut() {
            input.reveal_hint();
        }
        // A one-letter blank has nothing left to type once hinted.
        if let Some(pos) = self.focused
            && self.blanks.get(&pos).is_some_and(|b| b.focused().is_none())
        {
            let target = self
                .neighbour_blank(pos, true)
                .or_else(|| self.neighbour_blank(pos, false));
            if let Some(target) = target {
                self.move_focus(target, false);
            }
        }
    }

    /// Grade the sentence. Nothing happens until every blank is typed to
    /// the full length of its word.
    pub fn check(&mut self) -> CheckResult {
        let inputs = self.inputs();
        if self.is_empty() || !all_filled(&inputs, &self.layout) {
            return self.result;
        }
        self.result = if check_answer(&inputs, &self.layout) {
            CheckResult::Success
        } else {
            CheckResult::Error
        };
        debug!("fill check on {}: {:?}", self.video_id, self.result);
        self.result
    }

    /// Back to editing after a wrong answer.
    pub fn retry(&mut self) {
        if self.result == CheckResult::Error {
            self.result = CheckResult::Pending;
        }
    }

    pub fn advance(&mut self, stores: &mut LearningStores) -> FillAdvance {
        if self.result != CheckResult::Success {
            return FillAdvance::Blocked;
        }
        let Some(index) = self.current().map(|s| s.index) else {
            return FillAdvance::Blocked;
        };
        stores.fills.mark_completed(&self.video_id, index);

        if self.current + 1 < self.subtitles.len() {
            self.current += 1;
            self.load_current();
            FillAdvance::Next
        } else {
            stores
                .progress
                .mark_step_completed(&self.video_id, StepType::Fill);
            info!("fill step of {} finished", self.video_id);
            FillAdvance::StepFinished
        }
    }

    /// Read the current sentence aloud.
    pub fn speak(&self, speaker: &mut dyn Speaker, voice: &Voice) {
        if let Some(sub) = self.current() {
            speaker.speak(&Utterance {
                text: sub.text.clone(),
                voice: voice.clone(),
            });
        }
    }

    fn load_current(&mut self) {
        self.hint_shown = false;
        self.result = CheckResult::Pending;
        self.focused = None;
        self.blanks.clear();
        self.layout = match self.subtitles.get(self.current) {
            Some(sub) => compute_layout(&sub.text, sub.blanked_words.as_deref().unwrap_or_default()),
            None => BlankLayout::default(),
        };
        for &pos in &self.layout.blanked_positions {
            let word = &self.layout.display_words[pos].word;
            self.blanks.insert(pos, LetterInputs::new(word));
        }
        if let Some(&first) = self.layout.blanked_positions.first() {
            self.move_focus(first, false);
        }
    }

    /// Closest blank in one direction that still has a cell to type into.
    fn neighbour_blank(&self, position: usize, forward: bool) -> Option<usize> {
        let positions = &self.layout.blanked_positions;
        let at = positions.iter().position(|&p| p == position)?;
        let editable = |p: &usize| {
            self.blanks
                .get(p)
                .is_some_and(|b| b.cells().iter().any(|c| c.is_editable()))
        };
        if forward {
            positions[at + 1..].iter().find(|p| editable(p)).copied()
        } else {
            positions[..at].iter().rev().find(|p| editable(p)).copied()
        }
    }

    fn move_focus(&mut self, position: usize, last: bool) {
        if let Some(old) = self.focused.and_then(|p| self.blanks.get_mut(&p)) {
            old.blur();
        }
        if let Some(input) = self.blanks.get_mut(&position) {
            if last {
                input.focus_last();
            } else {
                input.focus();
            }
            self.focused = Some(position);
        }
    }
}
