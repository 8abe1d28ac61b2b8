//! Pages of the survey catalogue and title search over them.

use serde::{Deserialize, Serialize};

use super::structure::SurveySummary;

/// One page of the account's surveys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveyList {
    #[serde(default)]
    pub data: Vec<SurveySummary>,
    /// Surveys in the whole account, not just this page.
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
}

impl SurveyList {
    /// Keeps the surveys on this page whose title matches `query`.
    ///
    /// Paging fields are untouched; `total` still counts the whole account.
    pub fn retain_titles(mut self, query: &str) -> Self {
        self.data = filter_by_title(self.data, query);
        self
    }
}

/// Case-insensitive substring match on titles, preserving order.
///
/// An empty query matches every survey.
pub fn filter_by_title(surveys: Vec<SurveySummary>, query: &str) -> Vec<SurveySummary> {
    let needle = query.to_lowercase();
    surveys
        .into_iter()
        .filter(|survey| survey.title.to_lowercase().contains(&needle))
        .collect()
}
