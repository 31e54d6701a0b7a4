use std::fmt::{self, Debug, Display};

use serde::Serialize;

use crate::{
    error::{PipelineError, Result},
    record::normalize_key,
    similarity::SimilarityMatrix,
};

/// One ranked lookup result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitEntry<K> {
    pub key: K,
    pub score: f64,
}

/// Ranked lookup results
#[derive(Clone, PartialEq, Serialize)]
pub struct Hits<K> {
    pub list: Vec<HitEntry<K>>,
}

impl<K> Hits<K> {
    pub fn new(list: Vec<HitEntry<K>>) -> Self {
        Self { list }
    }

    /// Sort by descending score, NaN scores removed.
    /// Stable, so equal scores keep their previous (matrix) order.
    pub fn sort_by_score_desc(&mut self) -> &mut Self {
        self.list.retain(|e| !e.score.is_nan());
        self.list.sort_by(|a, b| b.score.total_cmp(&a.score));
        self
    }

    /// Keep the first `k` entries
    pub fn truncate(&mut self, k: usize) -> &mut Self {
        self.list.truncate(k);
        self
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

impl<K: Debug> Debug for Hits<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Hits [")?;
            for e in &self.list {
                writeln!(f, "    {:?}: {:.6}", e.key, e.score)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(self.list.iter().map(|e| (&e.key, e.score))).finish()
        }
    }
}

/// `<score>\t<key>` per line
impl<K: Display> Display for Hits<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for e in &self.list {
            writeln!(f, "{:.6}\t{}", e.score, e.key)?;
        }
        Ok(())
    }
}

impl SimilarityMatrix {
    /// Most similar occupations to `query`.
    ///
    /// `query` is normalized (trim + lower-case) before the lookup; persisted
    /// keys are already normalized. With `include_self` the query's own
    /// occupation takes part in the ranking (it scores 1.0).
    ///
    /// # Errors
    /// `UnknownOccupation` when the normalized query is not a row of the matrix.
    pub fn top_k(&self, query: &str, k: usize, include_self: bool) -> Result<Hits<&str>> {
        let key = normalize_key(query);
        let pos = self
            .position(&key)
            .ok_or_else(|| PipelineError::UnknownOccupation(query.trim().to_string()))?;
        let row = self.row(pos).unwrap_or_default();

        let list = self
            .keys()
            .iter()
            .zip(row)
            .enumerate()
            .filter(|(j, _)| include_self || *j != pos)
            .map(|(_, (key, &score))| HitEntry { key: key.as_str(), score })
            .collect();
        let mut hits = Hits::new(list);
        hits.sort_by_score_desc().truncate(k);
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> SimilarityMatrix {
        let keys = vec!["nurse".to_string(), "data analyst".to_string(), "medic".to_string()];
        #[rustfmt::skip]
        let values = vec![
            1.0, 0.1, 0.8,
            0.1, 1.0, 0.2,
            0.8, 0.2, 1.0,
        ];
        SimilarityMatrix::from_parts(keys, values).unwrap()
    }

    #[test]
    fn lookup_normalizes_the_query() {
        let m = matrix();
        let a = m.top_k("  Nurse  ", 3, true).unwrap();
        let b = m.top_k("nurse", 3, true).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.list[0].key, "nurse");
        assert_eq!(a.list[0].score, 1.0);
    }

    #[test]
    fn exclude_self_drops_the_query_row() {
        let m = matrix();
        let hits = m.top_k("NURSE", 10, false).unwrap();
        let keys: Vec<&str> = hits.list.iter().map(|e| e.key).collect();
        assert_eq!(keys, vec!["medic", "data analyst"]);
    }

    #[test]
    fn k_limits_results() {
        let m = matrix();
        assert_eq!(m.top_k("medic", 1, true).unwrap().len(), 1);
        assert!(m.top_k("medic", 0, true).unwrap().is_empty());
    }

    #[test]
    fn unknown_occupation_is_an_error() {
        let m = matrix();
        assert!(matches!(m.top_k("pilot", 5, true), Err(PipelineError::UnknownOccupation(_))));
    }

    #[test]
    fn display_is_tab_separated() {
        let m = matrix();
        let out = m.top_k("data analyst", 1, true).unwrap().to_string();
        assert_eq!(out, "1.000000\tdata analyst\n");
    }
}
