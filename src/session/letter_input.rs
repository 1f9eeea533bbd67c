/// Focus commands a parent can issue to a blank without reaching into it.
pub trait FocusTarget {
    fn focus(&mut self);
    fn focus_last(&mut self);
    fn blur(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Letter(char),
    /// Non-letter part of the expected word, shown as-is.
    Fixed(char),
    /// Revealed first letter; not editable.
    Hint(char),
}

impl Cell {
    pub fn is_editable(self) -> bool {
        matches!(self, Cell::Empty | Cell::Letter(_))
    }

    pub fn shown(self) -> Option<char> {
        match self {
            Cell::Empty => None,
            Cell::Letter(c) | Cell::Fixed(c) | Cell::Hint(c) => Some(c),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LetterEvent {
    /// No cell focused.
    Ignored,
    /// Not a letter.
    Rejected,
    Advanced,
    /// The last editable cell was filled.
    WordComplete,
    Cleared,
    MovedBack,
    /// Backspace on the first empty cell; the parent focuses the previous word.
    MoveToPrevWord,
}

/// One input cell per character of a blanked word.
#[derive(Clone, Debug)]
pub struct LetterInputs {
    word: String,
    cells: Vec<Cell>,
    focus: Option<usize>,
}

impl LetterInputs {
    pub fn new(word: &str) -> Self {
        let cells = word
            .chars()
            .map(|c| {
                if c.is_ascii_alphabetic() {
                    Cell::Empty
                } else {
                    Cell::Fixed(c)
                }
            })
            .collect();
        Self {
            word: word.to_string(),
            cells,
            focus: None,
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn focused(&self) -> Option<usize> {
        self.focus
    }

    /// Shown characters in order; empty cells contribute nothing.
    pub fn value(&self) -> String {
        self.cells.iter().filter_map(|c| c.shown()).collect()
    }

    pub fn is_full(&self) -> bool {
        !self.cells.contains(&Cell::Empty)
    }

    pub fn type_char(&mut self, ch: char) -> LetterEvent {
        let Some(index) = self.focus else {
            return LetterEvent::Ignored;
        };
        let ch = ch.to_ascii_lowercase();
        if !ch.is_ascii_lowercase() {
            return LetterEvent::Rejected;
        }
        self.cells[index] = Cell::Letter(ch);
        match self.next_editable(index) {
            Some(next) => {
                self.focus = Some(next);
                LetterEvent::Advanced
            }
            None => LetterEvent::WordComplete,
        }
    }

    /// A filled cell is cleared in place. On an empty cell focus steps back
    /// to the previous editable cell, leaving its letter alone.
    pub fn backspace(&mut self) -> LetterEvent {
        let Some(index) = self.focus else {
            return LetterEvent::Ignored;
        };
        if let Cell::Letter(_) = self.cells[index] {
            self.cells[index] = Cell::Empty;
            return LetterEvent::Cleared;
        }
        match self.prev_editable(index) {
            Some(prev) => {
                self.focus = Some(prev);
                LetterEvent::MovedBack
            }
            None => LetterEvent::MoveToPrevWord,
        }
    }

    /// Fill editable cells from the letters of `text`, in order.
    pub fn set_value(&mut self, text: &str) {
        let mut letters = text
            .chars()
            .map(|c| c.to_ascii_lowercase())
            .filter(char::is_ascii_lowercase);
        for cell in self.cells.iter_mut().filter(|c| c.is_editable()) {
            *cell = match letters.next() {
                Some(c) => Cell::Letter(c),
                None => Cell::Empty,
            };
        }
    }

    /// Reveal the first letter if its cell is still empty.
    pub fn reveal_hint(&mut self) {
        let Some(first) = self.word.chars().position(|c| c.is_ascii_alphabetic()) else {
            return;
        };
        if self.cells[first] != Cell::Empty {
            return;
        }
        let letter = self.word.chars().nth(first).map(|c| c.to_ascii_lowercase());
        if let Some(letter) = letter {
            self.cells[first] = Cell::Hint(letter);
        }
        if self.focus == Some(first) {
            self.focus = self.next_editable(first);
        }
    }

    fn next_editable(&self, index: usize) -> Option<usize> {
        (index + 1..self.cells.len()).find(|&i| self.cells[i].is_editable())
    }

    fn prev_editable(&self, index: usize) -> Option<usize> {
        (0..index).rev().find(|&i| self.cells[i].is_editable())
    }
}

impl FocusTarget for LetterInputs {
    fn focus(&mut self) {
        self.focus = self.cells.iter().position(|c| c.is_editable());
    }

    fn focus_last(&mut self) {
        self.focus = self.cells.iter().rposition(|c| c.is_editable());
    }

    fn blur(&mut self) {
        self.focus = None;
    }
}
