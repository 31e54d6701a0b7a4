//! Display options shared by every dashboard view.
//!
//! One options object replaces per-view variations: which state and agency
//! are selected, how AI exposure filters rows, and how many similar
//! occupations a lookup returns.

use serde::{Deserialize, Serialize};

use crate::{input::SkillTable, tagging::AI_EXPOSED_COLUMN};

/// Header of the state column
pub const STATE_COLUMN: &str = "state";
/// Header of the agency column
pub const AGENCY_COLUMN: &str = "agency_name";

/// Row filter on the `ai_exposed` tag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiExposureFilter {
    #[default]
    All,
    ExposedOnly,
    NotExposed,
}

impl AiExposureFilter {
    fn accepts(self, tag: Option<&str>) -> bool {
        let exposed = matches!(tag.map(str::trim), Some("1") | Some("true") | Some("True"));
        match self {
            Self::All => true,
            Self::ExposedOnly => exposed,
            Self::NotExposed => !exposed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOptions {
    /// `None` = every state
    pub state: Option<String>,
    /// `None` = every agency
    pub agency: Option<String>,
    pub ai_exposure: AiExposureFilter,
    /// size of similar-occupation lists
    pub top_n: usize,
    /// whether a lookup may return the queried occupation itself
    pub include_self: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            state: None,
            agency: None,
            ai_exposure: AiExposureFilter::All,
            top_n: 10,
            include_self: true,
        }
    }
}

fn same_value(cell: Option<&str>, wanted: &str) -> bool {
    cell.is_some_and(|c| c.trim().eq_ignore_ascii_case(wanted.trim()))
}

impl DisplayOptions {
    /// Indices of the rows of a tagged table that pass every filter.
    ///
    /// A filter on a column the table does not have matches nothing.
    pub fn filter(&self, table: &SkillTable) -> Vec<usize> {
        let state_col = table.column(STATE_COLUMN);
        let agency_col = table.column(AGENCY_COLUMN);
        let ai_col = table.column(AI_EXPOSED_COLUMN);

        (0..table.rows.len())
            .filter(|&i| match &self.state {
                Some(state) => same_value(state_col.and_then(|c| table.cell(i, c)), state),
                None => true,
            })
            .filter(|&i| match &self.agency {
                Some(agency) => same_value(agency_col.and_then(|c| table.cell(i, c)), agency),
                None => true,
            })
            .filter(|&i| {
                self.ai_exposure
                    .accepts(ai_col.and_then(|c| table.cell(i, c)))
            })
            .collect()
    }
}
