pub mod corpus;
pub mod tfidf;
pub mod token;

use std::{collections::HashSet, marker::PhantomData};

use indexmap::IndexSet;
use tracing::{debug, info, warn};

use crate::{
    aggregate::OccupationDocument,
    error::{PipelineError, Result},
    utils::math::vector::SparseVec,
    vectorizer::{
        corpus::Corpus,
        tfidf::{DefaultTFIDFEngine, TFIDFEngine},
        token::{TokenFrequency, Tokenizer},
    },
};

/// L2-normalized TF-IDF weights of one occupation over the shared vocabulary
pub type FeatureVector = SparseVec<f64>;

/// Token dimension space shared by every vector of one fit.
/// Index of a token == its dimension.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    tokens: IndexSet<Box<str>>,
}

impl Vocabulary {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// dimension of `token`
    pub fn index_of(&self, token: &str) -> Option<u32> {
        self.tokens.get_index_of(token).map(|i| i as u32)
    }

    /// token at dimension `index`
    pub fn token(&self, index: u32) -> Option<&str> {
        self.tokens.get_index(index as usize).map(|t| &**t)
    }
}

/// Output of [`TFIDFVectorizer::fit`].
///
/// `keys`, `labels` and `vectors` are parallel and follow the input document order
/// (documents with no usable token are left out).
#[derive(Debug, Clone)]
pub struct FittedCorpus {
    pub keys: Vec<String>,
    pub labels: Vec<String>,
    pub vectors: Vec<FeatureVector>,
    pub vocabulary: Vocabulary,
}

impl FittedCorpus {
    /// number of occupations
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// TF-IDF Vectorizer
/// Turns occupation skill documents into L2-normalized TF-IDF vectors
/// over one vocabulary built from all documents.
///
/// `E` picks the weighting (see [`TFIDFEngine`]).
#[derive(Debug, Clone, Default)]
pub struct TFIDFVectorizer<E = DefaultTFIDFEngine>
where
    E: TFIDFEngine,
{
    pub tokenizer: Tokenizer,
    _marker: PhantomData<E>,
}

impl<E> TFIDFVectorizer<E>
where
    E: TFIDFEngine,
{
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self {
            tokenizer,
            _marker: PhantomData,
        }
    }

    /// Fit the vocabulary and vectorize every document.
    ///
    /// # Errors
    /// `Configuration` when fewer than 2 documents are given, when two documents
    /// share a key, when the combined vocabulary is empty, or when fewer than
    /// 2 documents have at least one token.
    pub fn fit(&self, docs: &[OccupationDocument]) -> Result<FittedCorpus> {
        if docs.len() < 2 {
            return Err(PipelineError::Configuration(format!(
                "at least 2 distinct occupations are required, got {}",
                docs.len()
            )));
        }
        let mut seen = HashSet::with_capacity(docs.len());
        if let Some(dup) = docs.iter().find(|d| !seen.insert(d.key.as_str())) {
            return Err(PipelineError::Configuration(format!("duplicate occupation key '{}'", dup.key)));
        }

        // tokenize, keep documents that produced tokens
        let mut kept: Vec<(&OccupationDocument, TokenFrequency)> = Vec::with_capacity(docs.len());
        for doc in docs {
            let freq = self.tokenizer.token_frequency(&doc.skill_text);
            if freq.is_empty() {
                warn!(
                    occupation = %doc.key,
                    skills = doc.skill_count,
                    skill_text = %doc.skill_text,
                    "no usable token; occupation left out of the matrix"
                );
                continue;
            }
            kept.push((doc, freq));
        }
        if kept.is_empty() {
            return Err(PipelineError::Configuration(
                "combined vocabulary is empty after tokenization".into(),
            ));
        }
        if kept.len() < 2 {
            return Err(PipelineError::Configuration(format!(
                "only {} occupation has usable skill tokens; at least 2 are required",
                kept.len()
            )));
        }

        let mut corpus = Corpus::new();
        for (_, freq) in &kept {
            corpus.add_doc(freq);
        }
        let vocabulary = Vocabulary {
            tokens: corpus.sorted_tokens().into_iter().collect(),
        };
        let dim = vocabulary.len();
        let doc_num = corpus.get_doc_num();

        // idf per dimension, computed once
        let idf: Vec<f64> = (0..dim as u32)
            .map(|i| {
                let token = vocabulary.token(i).unwrap_or_default();
                E::idf(doc_num, corpus.get_token_count(token))
            })
            .collect();

        let mut keys = Vec::with_capacity(kept.len());
        let mut labels = Vec::with_capacity(kept.len());
        let mut vectors = Vec::with_capacity(kept.len());
        for (doc, freq) in &kept {
            let doc_len = freq.token_sum();
            let pairs = freq.iter().filter_map(|(token, count)| {
                vocabulary
                    .index_of(token)
                    .map(|i| (i, E::tf(count, doc_len) * idf[i as usize]))
            });
            let mut vec = FeatureVector::from_pairs(dim, pairs);
            vec.l2_normalize();
            debug!(occupation = %doc.key, nnz = vec.nnz(), "vectorized");
            keys.push(doc.key.clone());
            labels.push(doc.label.clone());
            vectors.push(vec);
        }

        info!(
            occupations = keys.len(),
            skipped = docs.len() - keys.len(),
            vocabulary = dim,
            "fitted tf-idf vectors"
        );
        Ok(FittedCorpus {
            keys,
            labels,
            vectors,
            vocabulary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::tfidf::{smooth_idf, SublinearTFIDFEngine};

    fn doc(key: &str, text: &str) -> OccupationDocument {
        OccupationDocument {
            key: key.to_string(),
            label: key.to_string(),
            skill_text: text.to_string(),
            skill_count: text.split_whitespace().count(),
        }
    }

    #[test]
    fn single_document_is_a_configuration_error() {
        let v: TFIDFVectorizer = TFIDFVectorizer::default();
        let err = v.fit(&[doc("nurse", "triage charting")]).unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
    }

    #[test]
    fn empty_vocabulary_is_a_configuration_error() {
        let v: TFIDFVectorizer = TFIDFVectorizer::default();
        let err = v.fit(&[doc("a", "C R"), doc("b", "- !")]).unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let v: TFIDFVectorizer = TFIDFVectorizer::default();
        let err = v.fit(&[doc("a", "sql"), doc("a", "python")]).unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
    }

    #[test]
    fn tokenless_documents_are_left_out() {
        let v: TFIDFVectorizer = TFIDFVectorizer::default();
        let fitted = v.fit(&[doc("a", "sql"), doc("b", "C"), doc("c", "python")]).unwrap();
        assert_eq!(fitted.keys, vec!["a", "c"]);
    }

    #[test]
    fn vectors_are_unit_length_and_share_the_vocabulary() {
        let v: TFIDFVectorizer = TFIDFVectorizer::default();
        let fitted = v
            .fit(&[doc("a", "sql python sql"), doc("b", "python excel"), doc("c", "triage")])
            .unwrap();
        assert_eq!(fitted.vocabulary.len(), 4);
        for vec in &fitted.vectors {
            assert_eq!(vec.dim(), 4);
            assert!((vec.l2_norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn weights_follow_smoothed_idf() {
        let v: TFIDFVectorizer = TFIDFVectorizer::default();
        let fitted = v.fit(&[doc("a", "sql python sql"), doc("b", "python")]).unwrap();
        // doc a: sql tf=2 df=1, python tf=1 df=2
        let sql = 2.0 * smooth_idf(2, 1);
        let python = 1.0 * smooth_idf(2, 2);
        let norm = (sql * sql + python * python).sqrt();
        let a = &fitted.vectors[0];
        let sql_i = fitted.vocabulary.index_of("sql").unwrap();
        let python_i = fitted.vocabulary.index_of("python").unwrap();
        assert!((a.get(sql_i) - sql / norm).abs() < 1e-12);
        assert!((a.get(python_i) - python / norm).abs() < 1e-12);
    }

    #[test]
    fn sublinear_engine_changes_weights() {
        let docs = [doc("a", "sql sql sql sql python"), doc("b", "python")];
        let plain: TFIDFVectorizer = TFIDFVectorizer::default();
        let sub: TFIDFVectorizer<SublinearTFIDFEngine> = TFIDFVectorizer::default();
        let p = plain.fit(&docs).unwrap();
        let s = sub.fit(&docs).unwrap();
        let sql_i = p.vocabulary.index_of("sql").unwrap();
        assert!(s.vectors[0].get(sql_i) < p.vectors[0].get(sql_i));
    }
}
