//! Skill Aggregator: one skill document per occupation

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::record::{normalize_key, SkillRecord};

/// All skills of one occupation joined into a single text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupationDocument {
    /// canonical key (see [`normalize_key`])
    pub key: String,
    /// first-seen spelling, trimmed; display only
    pub label: String,
    /// skills joined by a single space, first-occurrence order
    pub skill_text: String,
    /// number of skill records merged into this document
    pub skill_count: usize,
}

/// Group records into documents.
///
/// Records with a blank occupation or skill are dropped.
/// Occupations keep first-occurrence order, and so do the skills inside each one.
/// Occupation strings differing only in case or surrounding whitespace
/// are the same occupation.
pub fn aggregate<'a, I>(records: I) -> Vec<OccupationDocument>
where
    I: IntoIterator<Item = &'a SkillRecord>,
{
    let mut groups: IndexMap<String, OccupationDocument> = IndexMap::new();
    let mut dropped = 0usize;

    for record in records {
        if !record.is_well_formed() {
            dropped += 1;
            continue;
        }
        let skill = record.skill.trim();
        let doc = groups
            .entry(normalize_key(&record.occupation))
            .or_insert_with_key(|key| OccupationDocument {
                key: key.clone(),
                label: record.occupation.trim().to_string(),
                skill_text: String::new(),
                skill_count: 0,
            });
        if !doc.skill_text.is_empty() {
            doc.skill_text.push(' ');
        }
        doc.skill_text.push_str(skill);
        doc.skill_count += 1;
    }

    if dropped > 0 {
        debug!(dropped, "dropped malformed skill records");
    }
    info!(occupations = groups.len(), dropped, "aggregated skill documents");
    groups.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recs(rows: &[(&str, &str)]) -> Vec<SkillRecord> {
        rows.iter().map(|(o, s)| SkillRecord::new(*o, *s)).collect()
    }

    #[test]
    fn groups_in_first_occurrence_order() {
        let records = recs(&[("A", "sql"), ("B", "nursing"), ("A", "python")]);
        let docs = aggregate(&records);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].label, "A");
        assert_eq!(docs[0].key, "a");
        assert_eq!(docs[0].skill_text, "sql python");
        assert_eq!(docs[0].skill_count, 2);
        assert_eq!(docs[1].label, "B");
        assert_eq!(docs[1].skill_text, "nursing");
    }

    #[test]
    fn malformed_rows_are_dropped_not_grouped() {
        let records = recs(&[("", "sql"), ("Nurse", "  "), ("Nurse", "Triage"), ("   ", "x")]);
        let docs = aggregate(&records);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].skill_text, "Triage");
    }

    #[test]
    fn case_and_whitespace_variants_merge() {
        let records = recs(&[("Nurse", "Triage"), (" nurse ", "Charting"), ("NURSE", "Triage")]);
        let docs = aggregate(&records);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].label, "Nurse");
        assert_eq!(docs[0].skill_text, "Triage Charting Triage");
        assert_eq!(docs[0].skill_count, 3);
    }

    #[test]
    fn empty_input_gives_no_documents() {
        assert!(aggregate(&Vec::<SkillRecord>::new()).is_empty());
    }
}
