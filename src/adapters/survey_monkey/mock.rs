//! Mock Survey API for testing.
//!
//! Serves fixed survey structure and responses, counts calls per endpoint
//! and lets tests inject failures per endpoint.
//!
//! # Example
//!
//! ```ignore
//! let api = MockSurveyApi::new()
//!     .with_details(details)
//!     .with_responses(responses)
//!     .with_details_error(SurveyApiError::Timeout);
//!
//! let result = handler.handle(query).await?;
//! assert_eq!(api.details_calls(), 1);
//! ```

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::foundation::SurveyId;
use crate::domain::survey::{
    BulkResponses, SurveyDetails, SurveyList, SurveyResponse, SurveySummary,
};
use crate::ports::{ResponseQuery, SurveyApi, SurveyApiError, SurveyListQuery};

#[derive(Debug, Default)]
struct MockState {
    details: SurveyDetails,
    responses: Vec<SurveyResponse>,
    details_error: Option<SurveyApiError>,
    survey_error: Option<SurveyApiError>,
    responses_error: Option<SurveyApiError>,
    queries: Vec<ResponseQuery>,
    catalogue: Vec<SurveySummary>,
    list_error: Option<SurveyApiError>,
}

/// Mock survey provider.
#[derive(Debug, Clone, Default)]
pub struct MockSurveyApi {
    state: Arc<Mutex<MockState>>,
    details_calls: Arc<AtomicUsize>,
    survey_calls: Arc<AtomicUsize>,
    responses_calls: Arc<AtomicUsize>,
    list_calls: Arc<AtomicUsize>,
}

impl MockSurveyApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Sets the structure returned by the details endpoint.
    ///
    /// The basic survey record is derived from it.
    pub fn with_details(self, details: SurveyDetails) -> Self {
        self.state().details = details;
        self
    }

    pub fn with_responses(self, responses: Vec<SurveyResponse>) -> Self {
        self.state().responses = responses;
        self
    }

    /// Sets the account's surveys, served a page at a time.
    pub fn with_catalogue(self, surveys: Vec<SurveySummary>) -> Self {
        self.state().catalogue = surveys;
        self
    }

    pub fn with_list_error(self, error: SurveyApiError) -> Self {
        self.state().list_error = Some(error);
        self
    }

    pub fn with_details_error(self, error: SurveyApiError) -> Self {
        self.set_details_error(Some(error));
        self
    }

    pub fn with_survey_error(self, error: SurveyApiError) -> Self {
        self.set_survey_error(Some(error));
        self
    }

    pub fn with_responses_error(self, error: SurveyApiError) -> Self {
        self.set_responses_error(Some(error));
        self
    }

    /// Changes the details failure after construction; `None` heals it.
    pub fn set_details_error(&self, error: Option<SurveyApiError>) {
        self.state().details_error = error;
    }

    pub fn set_survey_error(&self, error: Option<SurveyApiError>) {
        self.state().survey_error = error;
    }

    pub fn set_responses_error(&self, error: Option<SurveyApiError>) {
        self.state().responses_error = error;
    }

    pub fn set_responses(&self, responses: Vec<SurveyResponse>) {
        self.state().responses = responses;
    }

    pub fn details_calls(&self) -> usize {
        self.details_calls.load(Ordering::SeqCst)
    }

    pub fn survey_calls(&self) -> usize {
        self.survey_calls.load(Ordering::SeqCst)
    }

    pub fn responses_calls(&self) -> usize {
        self.responses_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Total calls across all endpoints.
    pub fn total_calls(&self) -> usize {
        self.details_calls() + self.survey_calls() + self.responses_calls() + self.list_calls()
    }

    /// Queries received by the bulk responses endpoint, in call order.
    pub fn response_queries(&self) -> Vec<ResponseQuery> {
        self.state().queries.clone()
    }
}

#[async_trait]
impl SurveyApi for MockSurveyApi {
    async fn fetch_survey_details(
        &self,
        _survey_id: &SurveyId,
    ) -> Result<SurveyDetails, SurveyApiError> {
        self.details_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state();
        match &state.details_error {
            Some(error) => Err(error.clone()),
            None => Ok(state.details.clone()),
        }
    }

    async fn fetch_survey(&self, _survey_id: &SurveyId) -> Result<SurveySummary, SurveyApiError> {
        self.survey_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state();
        match &state.survey_error {
            Some(error) => Err(error.clone()),
            None => Ok(SurveySummary {
                id: state.details.id.clone(),
                title: state.details.title.clone(),
            }),
        }
    }

    async fn fetch_responses(
        &self,
        _survey_id: &SurveyId,
        query: &ResponseQuery,
    ) -> Result<BulkResponses, SurveyApiError> {
        self.responses_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state();
        state.queries.push(query.clone());
        match &state.responses_error {
            Some(error) => Err(error.clone()),
            None => Ok(BulkResponses {
                total: state.responses.len() as u64,
                data: state.responses.clone(),
            }),
        }
    }

    async fn list_surveys(&self, query: &SurveyListQuery) -> Result<SurveyList, SurveyApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state();
        if let Some(error) = &state.list_error {
            return Err(error.clone());
        }

        let per_page = query.per_page as usize;
        let skip = (query.page.saturating_sub(1) as usize).saturating_mul(per_page);
        Ok(SurveyList {
            data: state.catalogue.iter().skip(skip).take(per_page).cloned().collect(),
            total: state.catalogue.len() as u64,
            page: query.page,
            per_page: query.per_page,
        })
    }
}
