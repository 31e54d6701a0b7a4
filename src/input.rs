//! Raw skill table ingestion

use std::{fs, path::Path};

use tracing::{debug, info};

use crate::{
    error::{PipelineError, Result},
    record::SkillRecord,
    utils::csv::{normalize_header, parse_rows},
};

/// Header names accepted for the occupation column, in preference order
pub const OCCUPATION_COLUMNS: &[&str] = &["occupation", "occupation_title"];
/// Header name of the skill column
pub const SKILL_COLUMN: &str = "skill";

/// A parsed CSV table with normalized headers.
///
/// Rows are kept whole so that downstream steps (tagging, display filters)
/// can see columns other than occupation and skill.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SkillTable {
    /// Build from raw CSV text. The first row is the header.
    pub fn from_csv_str(text: &str) -> Result<Self> {
        let mut rows = parse_rows(text);
        if rows.is_empty() {
            return Err(PipelineError::Input("input has no header row".into()));
        }
        let headers = rows.remove(0).iter().map(|h| normalize_header(h)).collect();
        Ok(Self { headers, rows })
    }

    /// Read a skill table from disk.
    /// Fails on a missing file or a file without data rows.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(PipelineError::Input(format!("input file not found: {}", path.display())));
        }
        let text = fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        let table = Self::from_csv_str(&text)?;
        if table.rows.is_empty() {
            return Err(PipelineError::Input(format!("input file has no data rows: {}", path.display())));
        }
        info!(path = %path.display(), rows = table.rows.len(), columns = table.headers.len(), "loaded skill table");
        Ok(table)
    }

    /// Index of a column by (already normalized) header name
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell value, `None` for short rows
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col)).map(String::as_str)
    }

    pub fn occupation_column(&self) -> Result<usize> {
        OCCUPATION_COLUMNS
            .iter()
            .find_map(|name| self.column(name))
            .ok_or_else(|| {
                PipelineError::Input(format!(
                    "no occupation column (expected one of {:?}, found {:?})",
                    OCCUPATION_COLUMNS, self.headers
                ))
            })
    }

    pub fn skill_column(&self) -> Result<usize> {
        self.column(SKILL_COLUMN).ok_or_else(|| {
            PipelineError::Input(format!("no '{SKILL_COLUMN}' column (found {:?})", self.headers))
        })
    }

    /// Extract `(occupation, skill)` records in row order.
    ///
    /// Short rows yield empty fields and are left for the aggregator to drop.
    pub fn records(&self) -> Result<Vec<SkillRecord>> {
        let occ = self.occupation_column()?;
        let skill = self.skill_column()?;
        let records: Vec<SkillRecord> = (0..self.rows.len())
            .map(|i| {
                SkillRecord::new(
                    self.cell(i, occ).unwrap_or_default(),
                    self.cell(i, skill).unwrap_or_default(),
                )
            })
            .collect();
        debug!(records = records.len(), "extracted skill records");
        Ok(records)
    }
}
