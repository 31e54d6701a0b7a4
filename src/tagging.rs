//! AI-exposure tagging of skill rows

use tracing::info;

use crate::{
    error::Result,
    input::SkillTable,
    record::clean_job_title,
};

/// Column appended by [`AiTagger::tag_table`], `1` / `0`
pub const AI_EXPOSED_COLUMN: &str = "ai_exposed";
/// Column appended by [`AiTagger::tag_table`]
pub const CLEAN_JOB_TITLE_COLUMN: &str = "clean_job_title";

/// Keywords used when none are configured
pub const DEFAULT_AI_KEYWORDS: &[&str] = &[
    "machine learning",
    "deep learning",
    "tensorflow",
    "nlp",
    "ai",
    "artificial intelligence",
    "pytorch",
];

/// Flags skills that mention an AI keyword.
///
/// Matching is a case-insensitive substring test, so the short keyword `ai`
/// also fires inside longer words ("maintenance", "training").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiTagger {
    keywords: Vec<String>,
}

impl Default for AiTagger {
    fn default() -> Self {
        Self::new(DEFAULT_AI_KEYWORDS.iter().copied())
    }
}

impl AiTagger {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_exposed(&self, skill: &str) -> bool {
        let skill = skill.to_lowercase();
        self.keywords.iter().any(|k| skill.contains(k.as_str()))
    }

    /// Copy of `table` with `ai_exposed` and `clean_job_title` appended.
    /// Existing columns of the same name are overwritten in place.
    pub fn tag_table(&self, table: &SkillTable) -> Result<SkillTable> {
        let occ = table.occupation_column()?;
        let skill = table.skill_column()?;

        let mut tagged = table.clone();
        let ai_col = ensure_column(&mut tagged, AI_EXPOSED_COLUMN);
        let title_col = ensure_column(&mut tagged, CLEAN_JOB_TITLE_COLUMN);
        let width = tagged.headers.len();

        let mut exposed = 0usize;
        for row in tagged.rows.iter_mut() {
            let is_exposed = row.get(skill).is_some_and(|s| self.is_exposed(s));
            let title = row.get(occ).map(|o| clean_job_title(o)).unwrap_or_default();
            row.resize(width, String::new());
            row[ai_col] = if is_exposed { "1" } else { "0" }.to_string();
            row[title_col] = title;
            exposed += usize::from(is_exposed);
        }
        info!(rows = tagged.rows.len(), exposed, "tagged AI exposure");
        Ok(tagged)
    }
}

fn ensure_column(table: &mut SkillTable, name: &str) -> usize {
    table.column(name).unwrap_or_else(|| {
        table.headers.push(name.to_string());
        table.headers.len() - 1
    })
}
