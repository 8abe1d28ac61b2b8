//! Survey API Port - Read-only access to the survey provider.
//!
//! Three fetches are needed by the aggregation pipeline:
//!
//! - `fetch_survey_details` - full structure (pages, questions, choices)
//! - `fetch_survey` - basic record used when the structure is unavailable
//! - `fetch_responses` - one bulk page of raw responses
//!
//! `list_surveys` pages through the account's surveys for browsing.
//!
//! All calls are idempotent GETs. Timeouts are owned by the adapter.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::SurveyId;
use crate::domain::survey::{BulkResponses, SurveyDetails, SurveyList, SurveySummary};

/// Port for survey provider reads.
#[async_trait]
pub trait SurveyApi: Send + Sync {
    /// Fetches the survey with its full page/question/choice structure.
    async fn fetch_survey_details(&self, survey_id: &SurveyId)
        -> Result<SurveyDetails, SurveyApiError>;

    /// Fetches the basic survey record. Structure detail is not guaranteed.
    async fn fetch_survey(&self, survey_id: &SurveyId) -> Result<SurveySummary, SurveyApiError>;

    /// Fetches one page of raw responses.
    async fn fetch_responses(
        &self,
        survey_id: &SurveyId,
        query: &ResponseQuery,
    ) -> Result<BulkResponses, SurveyApiError>;

    /// Fetches one page of the account's surveys.
    async fn list_surveys(&self, query: &SurveyListQuery) -> Result<SurveyList, SurveyApiError>;
}

/// Sort direction for bulk response queries.
///
/// Aggregation only ever asks for the newest responses first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Desc => "DESC",
        }
    }
}

/// Query parameters for the bulk responses endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseQuery {
    pub per_page: u32,
    pub sort_order: SortOrder,
    pub sort_by: String,
}

impl ResponseQuery {
    /// Largest page the provider serves.
    pub const MAX_PER_PAGE: u32 = 1000;

    /// Newest-modified first.
    pub fn latest(per_page: u32) -> Self {
        Self {
            per_page: per_page.clamp(1, Self::MAX_PER_PAGE),
            sort_order: SortOrder::Desc,
            sort_by: "date_modified".to_string(),
        }
    }
}

impl Default for ResponseQuery {
    fn default() -> Self {
        Self::latest(Self::MAX_PER_PAGE)
    }
}

/// Paging parameters for the survey list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurveyListQuery {
    /// 1-based page number.
    pub page: u32,
    pub per_page: u32,
}

impl SurveyListQuery {
    pub const DEFAULT_PER_PAGE: u32 = 10;

    /// Clamps `page` to at least 1 and `per_page` to the provider's range.
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, ResponseQuery::MAX_PER_PAGE),
        }
    }
}

impl Default for SurveyListQuery {
    fn default() -> Self {
        Self::new(1, Self::DEFAULT_PER_PAGE)
    }
}

/// Errors from survey provider calls.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SurveyApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Survey not found: {0}")]
    NotFound(String),

    #[error("Rate limited, retry after {retry_after_secs:?}s")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Survey provider unavailable: {0}")]
    Unavailable(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Failed to parse provider response: {0}")]
    Parse(String),
}

impl SurveyApiError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if retrying the same call later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::Unavailable(_) | Self::Network(_) | Self::Timeout
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_query_sorts_by_modified_desc() {
        let query = ResponseQuery::latest(500);
        assert_eq!(query.per_page, 500);
        assert_eq!(query.sort_order.as_str(), "DESC");
        assert_eq!(query.sort_by, "date_modified");
    }

    #[test]
    fn per_page_is_clamped() {
        assert_eq!(ResponseQuery::latest(0).per_page, 1);
        assert_eq!(ResponseQuery::latest(5000).per_page, 1000);
        assert_eq!(ResponseQuery::default().per_page, 1000);
    }

    #[test]
    fn list_query_is_clamped() {
        assert_eq!(SurveyListQuery::new(0, 0), SurveyListQuery::new(1, 1));
        assert_eq!(SurveyListQuery::new(3, 5000).per_page, 1000);
        assert_eq!(SurveyListQuery::default(), SurveyListQuery::new(1, 10));
    }

    #[test]
    fn transient_errors() {
        assert!(SurveyApiError::Timeout.is_transient());
        assert!(SurveyApiError::network("reset").is_transient());
        assert!(!SurveyApiError::NotFound("s1".to_string()).is_transient());
        assert!(!SurveyApiError::parse("bad json").is_transient());
    }

    #[test]
    fn error_messages() {
        let err = SurveyApiError::RateLimited {
            retry_after_secs: Some(30),
        };
        assert!(err.to_string().contains("30"));
        assert!(SurveyApiError::Unauthorized("expired".to_string())
            .to_string()
            .contains("expired"));
    }
}
