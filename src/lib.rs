//! This crate builds an occupation transferability matrix from skill text
//! using a TF-IDF Vectorizer and cosine similarity.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod matrix_io;
pub mod pipeline;
pub mod record;
pub mod service;
pub mod similarity;
pub mod tagging;
pub mod utils;
pub mod vectorizer;
pub mod view;

/// Pipeline Error
/// Every fallible operation of this crate returns `Result<T, PipelineError>`.
///
/// - `Input`: missing or empty input, missing columns
/// - `Configuration`: fewer than 2 usable occupations, empty vocabulary
/// - `NumericAnomaly`: a similarity value broke the unit diagonal,
///   symmetry or [-1, 1] range invariant
/// - `UnknownOccupation`: a lookup key that is not in the matrix
pub use error::{PipelineError, Result};

/// Skill Record and key normalization
/// `SkillRecord` is one `(occupation, skill)` input row.
/// `normalize_key` (trim + lower-case) gives the canonical occupation identity
/// used from aggregation onwards; persisted keys are already normalized.
pub use record::{normalize_key, SkillRecord};

/// Skill Aggregator
/// Groups records into one `OccupationDocument` per occupation, skills joined
/// by spaces in first-occurrence order. Malformed rows are dropped.
pub use aggregate::{aggregate, OccupationDocument};

/// TF-IDF Vectorizer
/// Fits one vocabulary over all occupation documents and produces an
/// L2-normalized sparse vector per occupation.
///
/// `TFIDFVectorizer<E>` has one generic parameter:
/// - `E`: TF-IDF calculation engine type (`DefaultTFIDFEngine` or
///   `SublinearTFIDFEngine`)
///
/// Fitting fails with `PipelineError::Configuration` on a degenerate corpus.
pub use vectorizer::{FeatureVector, FittedCorpus, TFIDFVectorizer};

/// TF IDF Calculation Engine Trait
/// Plug different TF weightings into `TFIDFVectorizer<E>`.
/// Both provided engines use the smoothed idf `ln((1 + N) / (1 + df)) + 1`.
pub use vectorizer::tfidf::{DefaultTFIDFEngine, SublinearTFIDFEngine, TFIDFEngine};

/// Tokenizer and Token Frequency
/// `Tokenizer` lower-cases and splits skill text into word tokens;
/// `TokenFrequency` counts them per document.
pub use vectorizer::token::{TokenFrequency, Tokenizer};

/// Similarity Matrix
/// Dense, symmetric occupation × occupation cosine similarity with a unit
/// diagonal. `top_k` ranks the most similar occupations for a query.
pub use similarity::{SimilarityMatrix, SimilarityOptions};

/// Search Hits and Hit Entry structures
/// - `Hits`: ranked lookup results, sortable by score
/// - `HitEntry`: one occupation key and its score
pub use similarity::scoring::{HitEntry, Hits};

pub use config::{PipelineConfig, ServiceConfig, TfWeighting};
pub use service::{SimilarOccupation, SimilarityService};
pub use view::{AiExposureFilter, DisplayOptions};
