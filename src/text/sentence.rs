use std::sync::LazyLock;

use regex::Regex;

/// Punctuation that may cling to either side of a word.
pub const PUNCTUATION: &str = r#",!?;:.~'"-"#;

static GLUED_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([,!?;:.~'"-])([a-zA-Z])"#).expect("valid regex"));

static AFFIXES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^([,!?;:.~'"-]*)(.+?)([,!?;:.~'"-]*)$"#).expect("valid regex")
});

/// A word with the punctuation runs stripped off its edges.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WordToken {
    pub prefix: String,
    pub word: String,
    pub suffix: String,
}

impl WordToken {
    pub fn rejoin(&self) -> String {
        format!("{}{}{}", self.prefix, self.word, self.suffix)
    }
}

/// Split a subtitle line into words, peeling leading and trailing
/// punctuation into `prefix`/`suffix`.
///
/// Punctuation glued to a following letter is separated first, so
/// `"okay,hold"` yields two tokens. A blank sentence yields no tokens.
pub fn tokenize(sentence: &str) -> Vec<WordToken> {
    let spaced = GLUED_PUNCTUATION.replace_all(sentence, "${1} ${2}");
    spaced
        .split_whitespace()
        .map(|token| match AFFIXES.captures(token) {
            Some(caps) => WordToken {
                prefix: caps[1].to_string(),
                word: caps[2].to_string(),
                suffix: caps[3].to_string(),
            },
            None => WordToken {
                prefix: String::new(),
                word: token.to_string(),
                suffix: String::new(),
            },
        })
        .collect()
}

pub fn extract_words(tokens: &[WordToken]) -> Vec<String> {
    tokens.iter().map(|t| t.word.clone()).collect()
}

/// Whitespace split that keeps punctuation attached: `"Hello, world!"`
/// becomes `["Hello,", "world!"]`.
pub fn split_words(sentence: &str) -> Vec<&str> {
    sentence.split_whitespace().collect()
}
