use std::collections::HashSet;

use log::debug;
use rand::Rng;

use crate::model::SelectedWordInfo;
use crate::text::{WordToken, shuffle, tokenize};

/// A shuffled word choice. `id` is the button's position after shuffling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordButton {
    pub id: usize,
    pub word: String,
    pub original_index: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonState {
    Available,
    /// Struck through until the next correct pick.
    Wrong,
    Selected,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Unknown id, already used, already marked wrong, or game over.
    Ignored,
    Accepted(SelectedWordInfo),
    /// The host replays the clip on this.
    Wrong { id: usize },
    /// The last word was accepted; carries the full accepted list.
    Completed(Vec<SelectedWordInfo>),
}

/// One slot of the sentence being rebuilt: punctuation is always shown,
/// the word only once accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slot<'a> {
    pub prefix: &'a str,
    pub word: &'a str,
    pub suffix: &'a str,
    pub accepted: Option<&'a SelectedWordInfo>,
}

/// Word-order game for one subtitle line.
pub struct WordGame {
    tokens: Vec<WordToken>,
    buttons: Vec<WordButton>,
    selected: Vec<SelectedWordInfo>,
    wrong: HashSet<usize>,
}

impl WordGame {
    pub fn new<R: Rng + ?Sized>(sentence: &str, rng: &mut R) -> Self {
        let tokens = tokenize(sentence);
        let ordered: Vec<(usize, String)> = tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (i, t.word.clone()))
            .collect();
        let buttons = shuffle(&ordered, rng)
            .into_iter()
            .enumerate()
            .map(|(id, (original_index, word))| WordButton {
                id,
                word,
                original_index,
            })
            .collect();
        Self {
            tokens,
            buttons,
            selected: Vec::new(),
            wrong: HashSet::new(),
        }
    }

    /// Re-enter a sentence solved earlier. A snapshot that does not spell
    /// the sentence is discarded and the game starts fresh.
    pub fn restore<R: Rng + ?Sized>(
        sentence: &str,
        completed: &[SelectedWordInfo],
        rng: &mut R,
    ) -> Self {
        let mut game = Self::new(sentence, rng);
        let matches = completed.len() == game.tokens.len()
            && completed
                .iter()
                .zip(&game.tokens)
                .all(|(info, token)| info.word == token.word);
        if matches {
            // Saved ids came from an earlier shuffle.
            game.selected = completed
                .iter()
                .enumerate()
                .map(|(idx, info)| SelectedWordInfo {
                    id: game.button_for(idx).unwrap_or(info.id),
                    ..info.clone()
                })
                .collect();
        } else {
            debug!("discarding stale completion snapshot for {sentence:?}");
        }
        game
    }

    /// Fully accepted state with one attempt per word, ids taken from the
    /// button holding each original position.
    pub fn solved<R: Rng + ?Sized>(sentence: &str, rng: &mut R) -> Self {
        let mut game = Self::new(sentence, rng);
        game.selected = game
            .tokens
            .iter()
            .enumerate()
            .map(|(idx, token)| SelectedWordInfo {
                word: token.word.clone(),
                attempts: 1,
                id: game.button_for(idx).unwrap_or(idx),
            })
            .collect();
        game
    }

    fn button_for(&self, original_index: usize) -> Option<usize> {
        self.buttons
            .iter()
            .find(|b| b.original_index == original_index)
            .map(|b| b.id)
    }

    pub fn click(&mut self, id: usize) -> ClickOutcome {
        if self.is_complete() || self.wrong.contains(&id) || self.is_selected(id) {
            return ClickOutcome::Ignored;
        }
        let Some(button) = self.buttons.iter().find(|b| b.id == id) else {
            return ClickOutcome::Ignored;
        };

        let expected = &self.tokens[self.position()].word;
        if button.word != *expected {
            self.wrong.insert(id);
            return ClickOutcome::Wrong { id };
        }

        let attempts = if self.wrong.is_empty() {
            1
        } else {
            self.wrong.len() as u32 + 1
        };
        let info = SelectedWordInfo {
            word: button.word.clone(),
            attempts,
            id,
        };
        self.selected.push(info.clone());
        self.wrong.clear();

        if self.is_complete() {
            ClickOutcome::Completed(self.selected.clone())
        } else {
            ClickOutcome::Accepted(info)
        }
    }

    /// Id of an available button carrying the next expected word.
    pub fn hint(&self) -> Option<usize> {
        let expected = &self.tokens.get(self.position())?.word;
        self.buttons
            .iter()
            .find(|b| {
                b.word == *expected && !self.wrong.contains(&b.id) && !self.is_selected(b.id)
            })
            .map(|b| b.id)
    }

    pub fn position(&self) -> usize {
        self.selected.len()
    }

    pub fn word_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_complete(&self) -> bool {
        self.selected.len() >= self.tokens.len()
    }

    pub fn buttons(&self) -> &[WordButton] {
        &self.buttons
    }

    pub fn selected(&self) -> &[SelectedWordInfo] {
        &self.selected
    }

    pub fn wrong_ids(&self) -> &HashSet<usize> {
        &self.wrong
    }

    pub fn button_state(&self, id: usize) -> ButtonState {
        if self.is_selected(id) {
            ButtonState::Selected
        } else if self.wrong.contains(&id) {
            ButtonState::Wrong
        } else {
            ButtonState::Available
        }
    }

    pub fn slots(&self) -> Vec<Slot<'_>> {
        self.tokens
            .iter()
            .enumerate()
            .map(|(i, t)| Slot {
                prefix: &t.prefix,
                word: &t.word,
                suffix: &t.suffix,
                accepted: self.selected.get(i),
            })
            .collect()
    }

    fn is_selected(&self, id: usize) -> bool {
        self.selected.iter().any(|s| s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(11)
    }

    /// Button ids in sentence order, picking distinct buttons for repeats.
    fn ids_in_order(game: &WordGame) -> Vec<usize> {
        let mut by_index: Vec<&WordButton> = game.buttons().iter().collect();
        by_index.sort_by_key(|b| b.original_index);
        by_index.iter().map(|b| b.id).collect()
    }

    fn wrong_id_for(game: &WordGame) -> usize {
        let expected = &game.slots()[game.position()].word.to_string();
        game.buttons()
            .iter()
            .find(|b| b.word != *expected && game.button_state(b.id) == ButtonState::Available)
            .map(|b| b.id)
            .unwrap()
    }

    #[test]
    fn test_in_order_clicks_complete_with_single_attempts() {
        let mut game = WordGame::new("Hold on, okay?", &mut rng());
        let ids = ids_in_order(&game);
        let mut completions = 0;
        let mut last = None;
        for id in ids {
            match game.click(id) {
                ClickOutcome::Accepted(_) => {}
                ClickOutcome::Completed(list) => {
                    completions += 1;
                    last = Some(list);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!(completions, 1);
        let list = last.unwrap();
        assert_eq!(list.len(), 3);
        assert!(list.iter().all(|s| s.attempts == 1));
        assert_eq!(
            list.iter().map(|s| s.word.as_str()).collect::<Vec<_>>(),
            vec!["Hold", "on", "okay"]
        );
        assert!(game.is_complete());
    }

    #[test]
    fn test_wrong_then_right_counts_two_attempts_for_that_word_only() {
        let mut game = WordGame::new("we can do it", &mut rng());
        let ids = ids_in_order(&game);

        let wrong = wrong_id_for(&game);
        assert_eq!(game.click(wrong), ClickOutcome::Wrong { id: wrong });
        assert_eq!(game.button_state(wrong), ButtonState::Wrong);

        for id in ids {
            game.click(id);
        }
        let attempts: Vec<u32> = game.selected().iter().map(|s| s.attempts).collect();
        assert_eq!(attempts, vec![2, 1, 1, 1]);
    }

    #[test]
    fn test_wrong_marks_clear_after_correct_pick() {
        let mut game = WordGame::new("one two three", &mut rng());
        let ids = ids_in_order(&game);
        let wrong = wrong_id_for(&game);
        game.click(wrong);
        game.click(ids[0]);
        assert!(game.wrong_ids().is_empty());
        assert_eq!(game.button_state(wrong), ButtonState::Available);
    }

    #[test]
    fn test_repeated_clicks_are_ignored() {
        let mut game = WordGame::new("a b c", &mut rng());
        let ids = ids_in_order(&game);
        game.click(ids[0]);

        // Already accepted.
        assert_eq!(game.click(ids[0]), ClickOutcome::Ignored);
        assert_eq!(game.position(), 1);

        // Currently marked wrong.
        let wrong = ids[2];
        assert_eq!(game.click(wrong), ClickOutcome::Wrong { id: wrong });
        assert_eq!(game.click(wrong), ClickOutcome::Ignored);
        assert_eq!(game.wrong_ids().len(), 1);

        // Unknown id.
        assert_eq!(game.click(99), ClickOutcome::Ignored);
        assert_eq!(game.position(), 1);
    }

    #[test]
    fn test_duplicate_words_match_by_position() {
        let mut game = WordGame::new("no no yes", &mut rng());
        let no_buttons: Vec<usize> = game
            .buttons()
            .iter()
            .filter(|b| b.word == "no")
            .map(|b| b.id)
            .collect();
        let yes = game.buttons().iter().find(|b| b.word == "yes").unwrap().id;

        assert!(matches!(game.click(yes), ClickOutcome::Wrong { .. }));
        // Either "no" button satisfies the next expected text.
        assert!(matches!(game.click(no_buttons[1]), ClickOutcome::Accepted(_)));
        assert!(matches!(game.click(no_buttons[0]), ClickOutcome::Accepted(_)));
        assert!(matches!(game.click(yes), ClickOutcome::Completed(_)));
    }

    #[test]
    fn test_clicks_after_completion_are_ignored() {
        let mut game = WordGame::new("hi", &mut rng());
        let id = game.buttons()[0].id;
        assert!(matches!(game.click(id), ClickOutcome::Completed(_)));
        assert_eq!(game.click(id), ClickOutcome::Ignored);
    }

    #[test]
    fn test_restore_accepts_matching_snapshot() {
        let mut first = WordGame::new("see you soon", &mut rng());
        for id in ids_in_order(&first) {
            first.click(id);
        }
        let snapshot = first.selected().to_vec();

        let restored = WordGame::restore("see you soon", &snapshot, &mut rng());
        assert!(restored.is_complete());
        assert_eq!(restored.selected(), snapshot.as_slice());
    }

    #[test]
    fn test_restore_remaps_ids_onto_the_new_shuffle() {
        let snapshot: Vec<SelectedWordInfo> = ["see", "you", "soon"]
            .iter()
            .map(|w| SelectedWordInfo {
                word: w.to_string(),
                attempts: 2,
                id: 7,
            })
            .collect();

        let game = WordGame::restore("see you soon", &snapshot, &mut rng());
        assert!(game.is_complete());
        for (idx, info) in game.selected().iter().enumerate() {
            let button = game.buttons().iter().find(|b| b.id == info.id).unwrap();
            assert_eq!(button.original_index, idx);
            assert_eq!(info.word, snapshot[idx].word);
            assert_eq!(info.attempts, 2);
        }
        for button in game.buttons() {
            assert_eq!(game.button_state(button.id), ButtonState::Selected);
        }
    }

    #[test]
    fn test_restore_discards_mismatched_snapshot() {
        let snapshot = vec![SelectedWordInfo {
            word: "other".to_string(),
            attempts: 1,
            id: 0,
        }];
        let game = WordGame::restore("see you soon", &snapshot, &mut rng());
        assert_eq!(game.position(), 0);
    }

    #[test]
    fn test_solved_maps_ids_by_original_index() {
        let game = WordGame::solved("left right", &mut rng());
        assert!(game.is_complete());
        for (idx, info) in game.selected().iter().enumerate() {
            let button = game.buttons().iter().find(|b| b.id == info.id).unwrap();
            assert_eq!(button.original_index, idx);
            assert_eq!(info.attempts, 1);
        }
    }

    #[test]
    fn test_hint_points_at_expected_word() {
        let mut game = WordGame::new("red green blue", &mut rng());
        let hinted = game.hint().unwrap();
        assert!(matches!(game.click(hinted), ClickOutcome::Accepted(_)));
        let hinted = game.hint().unwrap();
        assert_eq!(
            game.buttons().iter().find(|b| b.id == hinted).unwrap().word,
            "green"
        );
    }

    #[test]
    fn test_slots_show_accepted_words_with_punctuation() {
        let mut game = WordGame::new("Hold on, okay?", &mut rng());
        let first = ids_in_order(&game)[0];
        game.click(first);
        let slots = game.slots();
        assert_eq!(slots.len(), 3);
        assert!(slots[0].accepted.is_some());
        assert!(slots[1].accepted.is_none());
        assert_eq!(slots[1].suffix, ",");
        assert_eq!(slots[2].suffix, "?");
    }
}
