pub mod sentence;
pub mod shuffle;

pub use sentence::{WordToken, extract_words, split_words, tokenize};
pub use shuffle::shuffle;
