//! ListSurveysHandler - One page of the survey catalogue, optionally searched.

use std::sync::Arc;
use thiserror::Error;

use crate::domain::survey::SurveyList;
use crate::ports::{SurveyApi, SurveyApiError, SurveyListQuery};

/// Query for one catalogue page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListSurveysQuery {
    pub paging: SurveyListQuery,
    /// Case-insensitive title search applied to the fetched page.
    pub title_query: Option<String>,
}

impl ListSurveysQuery {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            paging: SurveyListQuery::new(page, per_page),
            title_query: None,
        }
    }

    pub fn with_title_query(mut self, query: impl Into<String>) -> Self {
        self.title_query = Some(query.into());
        self
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ListSurveysError {
    #[error("Failed to load surveys.")]
    Unavailable(#[source] SurveyApiError),
}

impl ListSurveysError {
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

pub struct ListSurveysHandler {
    api: Arc<dyn SurveyApi>,
}

impl ListSurveysHandler {
    pub fn new(api: Arc<dyn SurveyApi>) -> Self {
        Self { api }
    }

    pub async fn handle(&self, query: &ListSurveysQuery) -> Result<SurveyList, ListSurveysError> {
        let page = self.api.list_surveys(&query.paging).await.map_err(|e| {
            tracing::error!(
                page = query.paging.page,
                per_page = query.paging.per_page,
                error = %e,
                transient = e.is_transient(),
                "Failed to list surveys"
            );
            ListSurveysError::Unavailable(e)
        })?;

        let fetched = page.data.len();
        let page = match query.title_query.as_deref() {
            Some(title) => page.retain_titles(title),
            None => page,
        };

        tracing::info!(
            page = query.paging.page,
            per_page = query.paging.per_page,
            total = page.total,
            fetched,
            matched = page.data.len(),
            "Listed surveys"
        );
        Ok(page)
    }
}
