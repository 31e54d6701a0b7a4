use std::{collections::HashSet, sync::OnceLock};

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Word runs: letters, numbers and `_`.
/// Narrower than the regex crate's Unicode `\w`, which also takes combining
/// marks; a decomposed `e\u{301}` therefore ends a token at the accent.
fn word_regex() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"[\p{L}\p{N}_]+").expect("static word pattern"))
}

/// Skill text tokenizer.
///
/// Lower-cases, splits on anything that is not a word character,
/// and keeps tokens of at least `min_token_len` characters that are not stopwords.
/// The default (`min_token_len = 2`, no stopwords) matches the conventional
/// `\b\w\w+\b` token pattern, so a one-letter skill such as `"C"` yields no token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenizer {
    min_token_len: usize,
    stopwords: HashSet<String>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self {
            min_token_len: 2,
            stopwords: HashSet::new(),
        }
    }
}

impl Tokenizer {
    pub fn new(min_token_len: usize) -> Self {
        Self {
            min_token_len: min_token_len.max(1),
            stopwords: HashSet::new(),
        }
    }

    /// Add stopwords; compared after lower-casing
    pub fn with_stopwords<I, S>(mut self, stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stopwords
            .extend(stopwords.into_iter().map(|s| s.as_ref().trim().to_lowercase()));
        self
    }

    pub fn min_token_len(&self) -> usize {
        self.min_token_len
    }

    /// Split text into tokens, in order of appearance
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        word_regex()
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|t| t.chars().count() >= self.min_token_len)
            .filter(|t| !self.stopwords.contains(*t))
            .map(str::to_string)
            .collect()
    }

    /// Tokenize straight into a [`TokenFrequency`]
    pub fn token_frequency(&self, text: &str) -> TokenFrequency {
        let mut freq = TokenFrequency::new();
        freq.add_tokens(&self.tokenize(text));
        freq
    }
}

/// TokenFrequency
/// Token occurrence counts of one document, in first-seen order.
///
/// # Examples
/// ```
/// use occupation_similarity::TokenFrequency;
/// let mut freq = TokenFrequency::new();
/// freq.add_tokens(&["sql", "python", "sql"]);
/// assert_eq!(freq.token_count("sql"), 2);
/// assert_eq!(freq.token_sum(), 3);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TokenFrequency {
    #[serde(with = "indexmap::map::serde_seq")]
    token_count: IndexMap<String, u32>,
    total_token_count: u64,
}

impl TokenFrequency {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one occurrence of `token`
    #[inline]
    pub fn add_token(&mut self, token: &str) -> &mut Self {
        let count = self.token_count.entry(token.to_string()).or_insert(0);
        *count += 1;
        self.total_token_count += 1;
        self
    }

    #[inline]
    pub fn add_tokens<T>(&mut self, tokens: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for token in tokens {
            self.add_token(token.as_ref());
        }
        self
    }

    /// occurrences of `token`, 0 when absent
    #[inline]
    pub fn token_count(&self, token: &str) -> u32 {
        self.token_count.get(token).copied().unwrap_or(0)
    }

    /// total number of tokens added
    #[inline]
    pub fn token_sum(&self) -> u64 {
        self.total_token_count
    }

    /// number of distinct tokens
    #[inline]
    pub fn token_num(&self) -> usize {
        self.token_count.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.token_count.is_empty()
    }

    /// `(token, count)` in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.token_count.iter().map(|(t, &c)| (t.as_str(), c))
    }

    /// distinct tokens in first-seen order
    pub fn token_set_ref_str(&self) -> impl Iterator<Item = &str> {
        self.token_count.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tokenizer_lowercases_and_splits_on_punctuation() {
        let tokens = Tokenizer::default().tokenize("Patient-Monitoring, SQL/Python  C++ R");
        assert_eq!(tokens, vec!["patient", "monitoring", "sql", "python"]);
    }

    #[test]
    fn min_len_one_keeps_single_letters() {
        let tokens = Tokenizer::new(1).tokenize("C R go");
        assert_eq!(tokens, vec!["c", "r", "go"]);
    }

    #[test]
    fn stopwords_are_removed_case_insensitively() {
        let tokens = Tokenizer::default()
            .with_stopwords(["And", "of"])
            .tokenize("Management of Budget and Payroll");
        assert_eq!(tokens, vec!["management", "budget", "payroll"]);
    }

    #[test]
    fn unicode_words_are_tokens() {
        let tokens = Tokenizer::default().tokenize("Übersetzung café");
        assert_eq!(tokens, vec!["übersetzung", "café"]);
    }

    #[test]
    fn combining_marks_split_words() {
        let tokens = Tokenizer::default().tokenize("cafe\u{301} na\u{303}o x\u{301}y");
        assert_eq!(tokens, vec!["cafe", "na"]);
    }

    #[test]
    fn token_frequency_counts() {
        let freq = Tokenizer::default().token_frequency("SQL Python SQL");
        assert_eq!(freq.token_count("sql"), 2);
        assert_eq!(freq.token_count("python"), 1);
        assert_eq!(freq.token_count("rust"), 0);
        assert_eq!(freq.token_sum(), 3);
        assert_eq!(freq.token_num(), 2);
        assert_eq!(freq.token_set_ref_str().collect::<Vec<_>>(), vec!["sql", "python"]);
    }
}
