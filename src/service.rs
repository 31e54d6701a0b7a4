//! Read side: cached access to the persisted matrix.
//!
//! The matrix is loaded lazily and kept until the file on disk changes
//! (modification time or length), then reloaded on the next access.

use std::{
    fs,
    sync::{Arc, Mutex, MutexGuard},
    time::SystemTime,
};

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    config::ServiceConfig,
    error::{PipelineError, Result},
    matrix_io::read_matrix,
    similarity::SimilarityMatrix,
    view::DisplayOptions,
};

/// What the cached copy was loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: Option<SystemTime>,
    len: u64,
}

#[derive(Debug)]
struct Cached {
    stamp: FileStamp,
    matrix: Arc<SimilarityMatrix>,
}

/// One lookup result, ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarOccupation {
    /// normalized key
    pub key: String,
    /// first-seen spelling from the input
    pub label: String,
    pub score: f64,
}

#[derive(Debug)]
pub struct SimilarityService {
    config: ServiceConfig,
    cache: Mutex<Option<Cached>>,
}

impl SimilarityService {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config,
            cache: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, Option<Cached>> {
        // a panic while holding the lock leaves at worst a stale cache entry
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn stamp(&self) -> Result<FileStamp> {
        let path = &self.config.matrix_path;
        let meta = fs::metadata(path).map_err(|e| PipelineError::io(path, e))?;
        Ok(FileStamp {
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }

    /// Current matrix, reloaded if the file changed since the last load
    pub fn matrix(&self) -> Result<Arc<SimilarityMatrix>> {
        let stamp = self.stamp()?;
        let mut cache = self.lock();
        if let Some(cached) = cache.as_ref() {
            if cached.stamp == stamp {
                debug!("similarity matrix cache hit");
                return Ok(Arc::clone(&cached.matrix));
            }
            info!(path = %self.config.matrix_path.display(), "similarity matrix changed on disk; reloading");
        }
        let matrix = Arc::new(read_matrix(&self.config.matrix_path)?);
        *cache = Some(Cached {
            stamp,
            matrix: Arc::clone(&matrix),
        });
        Ok(matrix)
    }

    /// Drop the cached matrix; the next access reloads it
    pub fn invalidate(&self) {
        *self.lock() = None;
    }

    /// Similar occupations for `query`, sized and filtered by `options`
    pub fn similar(&self, query: &str, options: &DisplayOptions) -> Result<Vec<SimilarOccupation>> {
        let matrix = self.matrix()?;
        let hits = matrix.top_k(query, options.top_n, options.include_self)?;
        Ok(hits
            .list
            .into_iter()
            .map(|e| {
                let label = matrix
                    .position(e.key)
                    .and_then(|i| matrix.label(i))
                    .unwrap_or(e.key)
                    .to_string();
                SimilarOccupation {
                    key: e.key.to_string(),
                    label,
                    score: e.score,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix_io::write_matrix;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("occsim-service-{}", std::process::id()))
            .join(name)
    }

    fn matrix(keys: &[&str]) -> SimilarityMatrix {
        let n = keys.len();
        let mut values = vec![0.5; n * n];
        for i in 0..n {
            values[i * n + i] = 1.0;
        }
        SimilarityMatrix::from_parts(keys.iter().map(|k| k.to_string()).collect(), values).unwrap()
    }

    #[test]
    fn cached_matrix_is_reused_until_the_file_changes() {
        let path = temp_path("reuse.csv");
        write_matrix(&path, &matrix(&["a", "b"])).unwrap();
        let service = SimilarityService::new(ServiceConfig { matrix_path: path.clone() });

        let first = service.matrix().unwrap();
        let second = service.matrix().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        // different length guarantees a new stamp even on coarse mtime filesystems
        write_matrix(&path, &matrix(&["a", "b", "c"])).unwrap();
        let third = service.matrix().unwrap();
        assert_eq!(third.len(), 3);
        assert!(!Arc::ptr_eq(&first, &third));
    }

    #[test]
    fn invalidate_forces_a_reload() {
        let path = temp_path("invalidate.cbor");
        write_matrix(&path, &matrix(&["a", "b"])).unwrap();
        let service = SimilarityService::new(ServiceConfig { matrix_path: path });
        let first = service.matrix().unwrap();
        service.invalidate();
        let second = service.matrix().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }

    #[test]
    fn similar_applies_display_options() {
        let path = temp_path("similar.csv");
        write_matrix(&path, &matrix(&["nurse", "medic", "pilot"])).unwrap();
        let service = SimilarityService::new(ServiceConfig { matrix_path: path });

        let opts = DisplayOptions { top_n: 5, include_self: false, ..Default::default() };
        let hits = service.similar("  Nurse ", &opts).unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.key != "nurse"));

        let opts = DisplayOptions { top_n: 1, ..Default::default() };
        let hits = service.similar("NURSE", &opts).unwrap();
        assert_eq!(hits[0].key, "nurse");
        assert_eq!(hits[0].score, 1.0);
    }

    #[test]
    fn similar_reports_display_labels() {
        let path = temp_path("labels.csv");
        let labelled = matrix(&["nurse", "data analyst"])
            .with_labels(vec!["Nurse".into(), "Data Analyst".into()])
            .unwrap();
        write_matrix(&path, &labelled).unwrap();
        let service = SimilarityService::new(ServiceConfig { matrix_path: path });

        let opts = DisplayOptions { include_self: false, ..Default::default() };
        let hits = service.similar("nurse", &opts).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].key, "data analyst");
        assert_eq!(hits[0].label, "Data Analyst");
    }

    #[test]
    fn missing_matrix_is_an_io_error() {
        let service = SimilarityService::new(ServiceConfig { matrix_path: temp_path("absent.csv") });
        assert!(matches!(service.matrix(), Err(PipelineError::Io { .. })));
    }
}
