//! SurveyDetailsView - Consumer-side state for one survey details screen.
//!
//! Each request is tagged with a [`RequestId`] and the filter it was issued
//! for. Completions carrying any other tag are discarded, so a slow response
//! for an old filter can never overwrite the result of a newer one.

use crate::application::handlers::survey_data::{
    AggregatedSurveyData, GetAggregatedSurveyDataHandler, GetAggregatedSurveyDataQuery,
    SurveyDataError,
};
use crate::domain::aggregation::FetchStatus;
use crate::domain::foundation::{RequestId, StateMachine};

/// Identity of one issued request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTag {
    pub request_id: RequestId,
    pub query: GetAggregatedSurveyDataQuery,
}

/// What happened to a completion handed to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied(FetchStatus),
    /// Superseded or already settled; state unchanged.
    Discarded,
}

#[derive(Debug, Default)]
pub struct SurveyDetailsView {
    status: FetchStatus,
    current: Option<RequestTag>,
    data: Option<AggregatedSurveyData>,
    error: Option<SurveyDataError>,
}

impl SurveyDetailsView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    /// The latest result, hidden while a newer request is loading.
    pub fn data(&self) -> Option<&AggregatedSurveyData> {
        self.data.as_ref().filter(|_| self.status.has_data())
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(SurveyDataError::user_message)
    }

    /// The filter of the latest request, if any.
    pub fn current_query(&self) -> Option<&GetAggregatedSurveyDataQuery> {
        self.current.as_ref().map(|tag| &tag.query)
    }

    /// Retry is offered only after a terminal error.
    pub fn can_retry(&self) -> bool {
        self.status == FetchStatus::Error
    }

    /// Starts a new request and makes it the only one whose result is kept.
    pub fn begin(&mut self, query: GetAggregatedSurveyDataQuery) -> RequestTag {
        // Every state may restart at loading.
        self.status = FetchStatus::Loading;
        self.error = None;

        let tag = RequestTag {
            request_id: RequestId::new(),
            query,
        };
        self.current = Some(tag.clone());
        tag
    }

    /// Applies a result if it belongs to the latest request.
    ///
    /// On error the previous data is cleared; no partial data is shown.
    pub fn complete(
        &mut self,
        tag: &RequestTag,
        result: Result<AggregatedSurveyData, SurveyDataError>,
    ) -> Completion {
        if self.current.as_ref() != Some(tag) {
            tracing::debug!(request_id = %tag.request_id, "Discarding superseded result");
            return Completion::Discarded;
        }

        if self.status.is_settled() {
            tracing::debug!(request_id = %tag.request_id, status = %self.status, "Ignoring duplicate completion");
            return Completion::Discarded;
        }

        let next = match &result {
            Ok(data) => data.status,
            Err(e) => e.status(),
        };
        let Ok(status) = self.status.transition_to(next) else {
            tracing::debug!(request_id = %tag.request_id, status = %self.status, "Ignoring invalid completion");
            return Completion::Discarded;
        };

        self.status = status;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(e) => {
                self.data = None;
                self.error = Some(e);
            }
        }
        Completion::Applied(status)
    }

    /// Issues `query` through `handler` and applies the outcome.
    pub async fn load(
        &mut self,
        handler: &GetAggregatedSurveyDataHandler,
        query: GetAggregatedSurveyDataQuery,
    ) -> Completion {
        let tag = self.begin(query);
        let result = handler.handle(&tag.query).await;
        self.complete(&tag, result)
    }

    /// Re-runs the last request from `loading`.
    pub async fn retry(&mut self, handler: &GetAggregatedSurveyDataHandler) -> Option<Completion> {
        let query = self.current_query()?.clone();
        Some(self.load(handler, query).await)
    }
}
