use std::collections::BTreeMap;

/// Characters dropped before comparing answers.
const IGNORED_PUNCTUATION: &[char] = &[',', '!', '?', ';', ':', '.', '~', '\'', '"', '(', ')', '-'];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayWord {
    pub word: String,
    pub is_blank: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlankLayout {
    pub display_words: Vec<DisplayWord>,
    /// Ascending indices into `display_words`.
    pub blanked_positions: Vec<usize>,
}

impl BlankLayout {
    pub fn expected(&self, position: usize) -> Option<&str> {
        self.display_words.get(position).map(|w| w.word.as_str())
    }
}

/// Lowercase, drop punctuation, trim.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| !IGNORED_PUNCTUATION.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Lay out `sentence` with every word matching a blanked word hidden.
/// Punctuation stays attached to its word here.
pub fn compute_layout(sentence: &str, blanked_words: &[String]) -> BlankLayout {
    let targets: Vec<String> = blanked_words.iter().map(|w| normalize(w)).collect();
    let mut layout = BlankLayout::default();
    for (index, word) in sentence.split_whitespace().enumerate() {
        let is_blank = targets.contains(&normalize(word));
        if is_blank {
            layout.blanked_positions.push(index);
        }
        layout.display_words.push(DisplayWord {
            word: word.to_string(),
            is_blank,
        });
    }
    layout
}

/// Every blank has been typed out to the literal length of its word.
pub fn all_filled(inputs: &BTreeMap<usize, String>, layout: &BlankLayout) -> bool {
    layout.blanked_positions.iter().all(|&pos| {
        let typed = inputs.get(&pos).map_or(0, |s| s.chars().count());
        layout
            .expected(pos)
            .is_some_and(|expected| typed == expected.chars().count())
    })
}

pub fn check_answer(inputs: &BTreeMap<usize, String>, layout: &BlankLayout) -> bool {
    if !all_filled(inputs, layout) {
        return false;
    }
    layout.blanked_positions.iter().all(|&pos| {
        let typed = inputs.get(&pos).map(String::as_str).unwrap_or("");
        layout
            .expected(pos)
            .is_some_and(|expected| normalize(typed) == normalize(expected))
    })
}
