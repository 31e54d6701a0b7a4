use std::path::PathBuf;

use crate::{similarity::DEFAULT_EPSILON, tagging::DEFAULT_AI_KEYWORDS};

/// Term frequency weighting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TfWeighting {
    /// raw token count
    #[default]
    Raw,
    /// 1 + ln(count)
    Sublinear,
}

/// Everything one pipeline run needs
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// raw `(occupation, skill)` CSV
    pub input: PathBuf,
    /// matrix artifact, `.cbor` for a snapshot, CSV otherwise
    pub output: PathBuf,
    /// optional AI-tagged copy of the input
    pub tagged_output: Option<PathBuf>,
    pub min_token_len: usize,
    pub stopwords: Vec<String>,
    pub tf_weighting: TfWeighting,
    pub ai_keywords: Vec<String>,
    pub parallel: bool,
    pub epsilon: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data/dashboard_ai_tagged_renamed.csv"),
            output: PathBuf::from("data/occupation_similarity_matrix.csv"),
            tagged_output: None,
            min_token_len: 2,
            stopwords: Vec::new(),
            tf_weighting: TfWeighting::Raw,
            ai_keywords: DEFAULT_AI_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            parallel: true,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

/// Read side configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// persisted matrix, CSV or `.cbor`
    pub matrix_path: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            matrix_path: PathBuf::from("data/occupation_similarity_matrix.csv"),
        }
    }
}
