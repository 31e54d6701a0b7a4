use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::vectorizer::token::TokenFrequency;

/// Document count and per-token document frequency.
///
/// It does not keep document text or keys; it is only the base data for IDF.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Corpus {
    /// number of documents added
    doc_num: u64,
    /// token -> number of documents containing it, first-seen order
    #[serde(with = "indexmap::map::serde_seq")]
    token_doc_counts: IndexMap<Box<str>, u64>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document's distinct tokens
    pub fn add_doc(&mut self, freq: &TokenFrequency) {
        self.doc_num += 1;
        for token in freq.token_set_ref_str() {
            *self.token_doc_counts.entry(token.into()).or_insert(0) += 1;
        }
    }

    /// number of documents
    pub fn get_doc_num(&self) -> u64 {
        self.doc_num
    }

    /// number of documents containing `token`
    pub fn get_token_count(&self, token: &str) -> u64 {
        self.token_doc_counts.get(token).copied().unwrap_or(0)
    }

    /// number of distinct tokens seen
    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.token_doc_counts.len()
    }

    /// All tokens, sorted, so the dimension order does not depend on input order
    pub fn sorted_tokens(&self) -> Vec<Box<str>> {
        let mut tokens: Vec<Box<str>> = self.token_doc_counts.keys().cloned().collect();
        tokens.sort_unstable();
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_documents_not_occurrences() {
        let mut corpus = Corpus::new();
        let mut a = TokenFrequency::new();
        a.add_tokens(&["sql", "sql", "python"]);
        let mut b = TokenFrequency::new();
        b.add_tokens(&["sql", "nursing"]);
        corpus.add_doc(&a);
        corpus.add_doc(&b);

        assert_eq!(corpus.get_doc_num(), 2);
        assert_eq!(corpus.get_token_count("sql"), 2);
        assert_eq!(corpus.get_token_count("python"), 1);
        assert_eq!(corpus.get_token_count("rust"), 0);
        assert_eq!(corpus.vocab_size(), 3);
        let sorted_tokens = corpus.sorted_tokens();
        let sorted: Vec<&str> = sorted_tokens.iter().map(|t| &**t).collect();
        assert_eq!(sorted, vec!["nursing", "python", "sql"]);
    }
}
