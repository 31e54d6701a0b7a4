use serde::{Deserialize, Serialize};

/// One `(occupation, skill)` row of the raw dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRecord {
    pub occupation: String,
    pub skill: String,
}

impl SkillRecord {
    pub fn new(occupation: impl Into<String>, skill: impl Into<String>) -> Self {
        Self {
            occupation: occupation.into(),
            skill: skill.into(),
        }
    }

    /// Both fields carry something other than whitespace
    pub fn is_well_formed(&self) -> bool {
        !self.occupation.trim().is_empty() && !self.skill.trim().is_empty()
    }
}

/// Canonical occupation identity: trimmed and lower-cased.
///
/// Applied once when documents are grouped, and to lookup queries.
/// Persisted keys are already in this form.
pub fn normalize_key(occupation: &str) -> String {
    occupation.trim().to_lowercase()
}

/// `"  Data Analyst "` -> `"data_analyst"`
pub fn clean_job_title(occupation: &str) -> String {
    normalize_key(occupation).replace(' ', "_")
}
