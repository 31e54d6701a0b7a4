pub mod scoring;

use std::collections::HashMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    error::{PipelineError, Result},
    vectorizer::FittedCorpus,
};

/// Tolerance used for the unit diagonal and the [-1, 1] range
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Knobs for [`SimilarityMatrix::compute`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityOptions {
    /// spread rows over the rayon pool; the result is identical either way
    pub parallel: bool,
    /// tolerance for the diagonal and range checks
    pub epsilon: f64,
}

impl Default for SimilarityOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

/// Dense occupation × occupation cosine similarity.
///
/// Row-major `values`, `keys` label both axes in the same order.
/// `labels` holds the display spelling of each key, in the same order.
/// Symmetric with a unit diagonal; immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    keys: Vec<String>,
    #[serde(default)]
    labels: Vec<String>,
    values: Vec<f64>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl SimilarityMatrix {
    /// Compute every pairwise cosine similarity.
    ///
    /// The vectors are already L2-normalized, so each cell is a plain dot product.
    /// Only the upper triangle is computed; the lower one is mirrored.
    ///
    /// # Errors
    /// `NumericAnomaly` when a diagonal cell is not 1 or a cell leaves [-1, 1]
    /// (both within `options.epsilon`).
    pub fn compute(fitted: &FittedCorpus, options: &SimilarityOptions) -> Result<Self> {
        let n = fitted.len();
        let vectors = &fitted.vectors;

        let row = |i: usize| -> Vec<f64> { (i..n).map(|j| vectors[i].dot(&vectors[j])).collect() };
        let upper: Vec<Vec<f64>> = if options.parallel {
            (0..n).into_par_iter().map(row).collect()
        } else {
            (0..n).map(row).collect()
        };

        let mut values = vec![0.0; n * n];
        for (i, tail) in upper.into_iter().enumerate() {
            for (offset, v) in tail.into_iter().enumerate() {
                let j = i + offset;
                values[i * n + j] = v;
                values[j * n + i] = v;
            }
        }

        let matrix = Self::from_parts(fitted.keys.clone(), values)?.with_labels(fitted.labels.clone())?;
        matrix.validate(options.epsilon)?;
        info!(occupations = n, parallel = options.parallel, "computed similarity matrix");
        Ok(matrix)
    }

    /// Assemble from keys and row-major values; labels default to the keys.
    /// Checks the shape only; see [`SimilarityMatrix::validate`] for the numeric invariants.
    pub fn from_parts(keys: Vec<String>, values: Vec<f64>) -> Result<Self> {
        let mut matrix = Self {
            keys,
            labels: Vec::new(),
            values,
            index: HashMap::new(),
        };
        matrix.rebuild_index()?;
        Ok(matrix)
    }

    /// Replace the display labels, one per key
    pub fn with_labels(mut self, labels: Vec<String>) -> Result<Self> {
        self.labels = labels;
        self.rebuild_index()?;
        Ok(self)
    }

    /// Check the shape and rebuild the key index.
    /// The index is not serialized; call after deserializing.
    /// Snapshots without labels get the keys as labels.
    pub(crate) fn rebuild_index(&mut self) -> Result<()> {
        let n = self.keys.len();
        if self.values.len() != n * n {
            return Err(PipelineError::Configuration(format!(
                "matrix for {n} occupations needs {} values, got {}",
                n * n,
                self.values.len()
            )));
        }
        if self.labels.is_empty() {
            self.labels = self.keys.clone();
        } else if self.labels.len() != n {
            return Err(PipelineError::Configuration(format!(
                "matrix for {n} occupations has {} labels",
                self.labels.len()
            )));
        }
        self.index = HashMap::with_capacity(self.keys.len());
        for (i, key) in self.keys.iter().enumerate() {
            if self.index.insert(key.clone(), i).is_some() {
                return Err(PipelineError::Configuration(format!("duplicate occupation key '{key}'")));
            }
        }
        Ok(())
    }

    /// Check unit diagonal, symmetry and range, within `epsilon`
    pub fn validate(&self, epsilon: f64) -> Result<()> {
        let n = self.len();
        let anomaly = |i: usize, j: usize, value: f64, reason: &'static str| PipelineError::NumericAnomaly {
            row: self.keys[i].clone(),
            col: self.keys[j].clone(),
            value,
            reason,
        };
        for i in 0..n {
            let d = self.values[i * n + i];
            if !d.is_finite() || (d - 1.0).abs() > epsilon {
                return Err(anomaly(i, i, d, "self-similarity is not 1"));
            }
            for j in (i + 1)..n {
                let v = self.values[i * n + j];
                if !v.is_finite() || v < -1.0 - epsilon || v > 1.0 + epsilon {
                    return Err(anomaly(i, j, v, "similarity outside [-1, 1]"));
                }
                if (v - self.values[j * n + i]).abs() > epsilon {
                    return Err(anomaly(i, j, v, "matrix is not symmetric"));
                }
            }
        }
        debug!(occupations = n, epsilon, "similarity matrix validated");
        Ok(())
    }

    /// number of occupations
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Occupation keys, in row/column order
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Display labels, in row/column order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Display label by position
    pub fn label(&self, i: usize) -> Option<&str> {
        self.labels.get(i).map(String::as_str)
    }

    /// Position of an exact (already normalized) key
    pub fn position(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Cell by position
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        let n = self.len();
        (i < n && j < n).then(|| self.values[i * n + j])
    }

    /// Cell by exact keys
    pub fn get_by_key(&self, row: &str, col: &str) -> Option<f64> {
        self.get(self.position(row)?, self.position(col)?)
    }

    /// Whole row by position
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        let n = self.len();
        (i < n).then(|| &self.values[i * n..(i + 1) * n])
    }

    /// Largest absolute cell difference against another matrix with the same keys.
    /// `None` when the key order differs.
    pub fn max_abs_diff(&self, other: &Self) -> Option<f64> {
        if self.keys != other.keys {
            return None;
        }
        Some(
            self.values
                .iter()
                .zip(&other.values)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max),
        )
    }
}
