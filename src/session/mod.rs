pub mod fill_blank;
pub mod fill_session;
pub mod letter_input;
pub mod word_game;

pub use fill_session::{CheckResult, FillAdvance, FillSession};
pub use letter_input::{Cell, FocusTarget, LetterEvent, LetterInputs};
pub use word_game::{ButtonState, ClickOutcome, WordGame};
