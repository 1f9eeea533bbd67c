use shortglish::playback::ReviewSync;
use shortglish::session::fill_blank::BlankLayout;
use shortglish::session::{ButtonState, Cell, FillSession, LetterInputs, WordGame};
use shortglish::store::progress::StepStatus;

/// The sentence as rebuilt so far; missing words show as underscores.
pub fn sentence_line(game: &WordGame) -> String {
    game.slots()
        .iter()
        .map(|slot| match slot.accepted {
            Some(_) => format!("{}{}{}", slot.prefix, slot.word, slot.suffix),
            None => format!(
                "{}{}{}",
                slot.prefix,
                "_".repeat(slot.word.chars().count()),
                slot.suffix
            ),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn buttons_line(game: &WordGame) -> String {
    game.buttons()
        .iter()
        .map(|b| match game.button_state(b.id) {
            ButtonState::Available => format!("[{}] {}", b.id, b.word),
            ButtonState::Wrong => format!("[{}] x{}x", b.id, b.word),
            ButtonState::Selected => format!("[{}] -", b.id),
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn blank_cells(input: &LetterInputs, focused: bool) -> String {
    input
        .cells()
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let ch = match cell {
                Cell::Empty => '_',
                other => other.shown().unwrap_or('_'),
            };
            if focused && input.focused() == Some(i) {
                format!("[{ch}]")
            } else {
                ch.to_string()
            }
        })
        .collect()
}

pub fn blanks_line(session: &FillSession) -> String {
    let layout: &BlankLayout = session.layout();
    layout
        .display_words
        .iter()
        .enumerate()
        .map(|(pos, word)| match session.blank(pos) {
            Some(input) if word.is_blank => {
                blank_cells(input, session.focused_blank() == Some(pos))
            }
            _ => word.word.clone(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The dialogue list; `>` marks the spoken line, `*` the repeating one.
pub fn dialogue_list(sync: &ReviewSync) -> String {
    let current = sync.current().map(|s| s.index);
    let repeat = sync.repeat_index();
    sync.subtitles()
        .iter()
        .filter(|s| !s.is_silent())
        .map(|s| {
            let mark = match (current == Some(s.index), repeat == Some(s.index)) {
                (_, true) => '*',
                (true, false) => '>',
                _ => ' ',
            };
            if s.translation.is_empty() {
                format!("{mark} {:>3} {}", s.index, s.text)
            } else {
                format!("{mark} {:>3} {}  ({})", s.index, s.text, s.translation)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn step_badge(status: StepStatus) -> &'static str {
    match status {
        StepStatus::Completed => "done",
        StepStatus::InProgress => "next",
        StepStatus::Available => "open",
        StepStatus::Locked => "locked",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use shortglish::model::Subtitle;
    use shortglish::session::ClickOutcome;

    #[test]
    fn test_sentence_line_hides_pending_words() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut game = WordGame::new("Hold on, okay?", &mut rng);
        assert_eq!(sentence_line(&game), "____ __, ____?");
        let id = game.hint().unwrap();
        assert!(matches!(game.click(id), ClickOutcome::Accepted(_)));
        assert_eq!(sentence_line(&game), "Hold __, ____?");
        assert!(buttons_line(&game).contains(&format!("[{id}] -")));
    }

    #[test]
    fn test_blanks_line_marks_focused_cell() {
        let subtitle = Subtitle {
            index: 0,
            start_time: 0.0,
            end_time: 1.0,
            text: "I am fine".to_string(),
            translation: String::new(),
            blanked_words: Some(vec!["fine".to_string()]),
        };
        let mut session = FillSession::new("vid", vec![subtitle]);
        assert_eq!(blanks_line(&session), "I am [_]___");
        session.type_char('f');
        assert_eq!(blanks_line(&session), "I am f[_]__");
    }
}
