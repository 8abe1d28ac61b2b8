//! GetAggregatedSurveyDataHandler - Cached, degradable survey aggregation.
//!
//! Resolution order for one (survey, threshold, time range) request:
//!
//! 1. A cache entry younger than the TTL is returned as `cached` without any
//!    network call.
//! 2. Primary path: survey structure and bulk responses are fetched together;
//!    both must succeed. The result is aggregated with structure labels,
//!    written to the cache and returned as `fresh`.
//! 3. Fallback path: the basic survey record and bulk responses are fetched and
//!    aggregated with first-seen numbering. Returned as `fallback`, never cached.
//! 4. If both paths fail the request ends in `error`.

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::application::CacheManager;
use crate::domain::aggregation::{
    aggregate_fallback, aggregate_responses, filter_by_time_range, response_trend,
    AggregatedQuestion, CacheEntry, CacheKey, FetchStatus, LabelMaps, SummaryStats, TimeRange,
    TrendPoint,
};
use crate::domain::foundation::{SurveyId, Timestamp};
use crate::domain::survey::SurveyResponse;
use crate::ports::{Clock, ResponseQuery, SurveyApi, SurveyApiError};

/// Query for aggregated data of one survey under one filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetAggregatedSurveyDataQuery {
    pub survey_id: SurveyId,
    pub threshold: u32,
    pub time_range: TimeRange,
}

impl GetAggregatedSurveyDataQuery {
    pub fn new(survey_id: SurveyId, threshold: u32, time_range: TimeRange) -> Self {
        Self {
            survey_id,
            threshold,
            time_range,
        }
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(&self.survey_id, self.threshold, &self.time_range)
    }
}

/// Aggregated view of one survey.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedSurveyData {
    pub title: String,
    pub question_data: Vec<AggregatedQuestion>,
    /// Time-filtered raw responses the aggregation was computed from.
    pub raw_responses: Vec<SurveyResponse>,
    pub status: FetchStatus,
}

impl AggregatedSurveyData {
    fn from_entry(entry: CacheEntry) -> Self {
        Self {
            title: entry.title,
            question_data: entry.question_data,
            raw_responses: entry.raw_responses,
            status: FetchStatus::Cached,
        }
    }

    fn to_entry(&self, cached_at: Timestamp) -> CacheEntry {
        CacheEntry {
            question_data: self.question_data.clone(),
            title: self.title.clone(),
            raw_responses: self.raw_responses.clone(),
            cached_at,
        }
    }

    pub fn summary(&self) -> SummaryStats {
        SummaryStats::compute(&self.question_data, &self.raw_responses)
    }

    pub fn trend(&self, time_range: &TimeRange) -> Vec<TrendPoint> {
        response_trend(&self.raw_responses, time_range)
    }
}

/// Terminal failure of an aggregated-data request.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SurveyDataError {
    #[error("Failed to load survey details.")]
    Unavailable {
        primary: SurveyApiError,
        fallback: SurveyApiError,
    },
}

impl SurveyDataError {
    pub fn status(&self) -> FetchStatus {
        FetchStatus::Error
    }

    /// Message suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Handler for aggregated survey data (the fallback controller).
pub struct GetAggregatedSurveyDataHandler {
    api: Arc<dyn SurveyApi>,
    cache: Arc<CacheManager>,
    clock: Arc<dyn Clock>,
    per_page: u32,
}

impl GetAggregatedSurveyDataHandler {
    pub fn new(api: Arc<dyn SurveyApi>, cache: Arc<CacheManager>, clock: Arc<dyn Clock>) -> Self {
        Self {
            api,
            cache,
            clock,
            per_page: ResponseQuery::MAX_PER_PAGE,
        }
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    pub async fn handle(
        &self,
        query: &GetAggregatedSurveyDataQuery,
    ) -> Result<AggregatedSurveyData, SurveyDataError> {
        let key = query.cache_key();

        if let Some(entry) = self.cache.get(&key).await {
            tracing::info!(
                survey_id = %query.survey_id,
                threshold = query.threshold,
                time_range = %query.time_range,
                status = %FetchStatus::Cached,
                "Served survey data from cache"
            );
            return Ok(AggregatedSurveyData::from_entry(entry));
        }

        self.load(query, &key).await
    }

    /// Runs the network paths without consulting the cache first.
    pub async fn handle_uncached(
        &self,
        query: &GetAggregatedSurveyDataQuery,
    ) -> Result<AggregatedSurveyData, SurveyDataError> {
        self.load(query, &query.cache_key()).await
    }

    async fn load(
        &self,
        query: &GetAggregatedSurveyDataQuery,
        key: &CacheKey,
    ) -> Result<AggregatedSurveyData, SurveyDataError> {
        let primary = match self.load_primary(query).await {
            Ok(data) => {
                let entry = data.to_entry(self.clock.now());
                if let Err(e) = self.cache.put(key, &entry).await {
                    tracing::warn!(key = %key, error = %e, "Failed to cache survey data");
                }
                tracing::info!(
                    survey_id = %query.survey_id,
                    threshold = query.threshold,
                    time_range = %query.time_range,
                    status = %data.status,
                    questions = data.question_data.len(),
                    "Loaded survey data"
                );
                return Ok(data);
            }
            Err(e) => e,
        };

        tracing::warn!(
            survey_id = %query.survey_id,
            error = %primary,
            transient = primary.is_transient(),
            "Primary survey load failed, trying fallback"
        );

        match self.load_fallback(query).await {
            Ok(data) => {
                tracing::info!(
                    survey_id = %query.survey_id,
                    threshold = query.threshold,
                    time_range = %query.time_range,
                    status = %data.status,
                    questions = data.question_data.len(),
                    "Loaded survey data with reduced labels"
                );
                Ok(data)
            }
            Err(fallback) => {
                tracing::error!(
                    survey_id = %query.survey_id,
                    primary_error = %primary,
                    fallback_error = %fallback,
                    transient = fallback.is_transient(),
                    status = %FetchStatus::Error,
                    "Survey data unavailable"
                );
                Err(SurveyDataError::Unavailable { primary, fallback })
            }
        }
    }

    async fn load_primary(
        &self,
        query: &GetAggregatedSurveyDataQuery,
    ) -> Result<AggregatedSurveyData, SurveyApiError> {
        let response_query = ResponseQuery::latest(self.per_page);
        let (details, bulk) = futures::try_join!(
            self.api.fetch_survey_details(&query.survey_id),
            self.api.fetch_responses(&query.survey_id, &response_query)
        )?;

        let responses = filter_by_time_range(bulk.data, &query.time_range, self.clock.now());
        let maps = LabelMaps::resolve(&details);
        let question_data = aggregate_responses(&responses, &maps, query.threshold);

        Ok(AggregatedSurveyData {
            title: details.title,
            question_data,
            raw_responses: responses,
            status: FetchStatus::Fresh,
        })
    }

    async fn load_fallback(
        &self,
        query: &GetAggregatedSurveyDataQuery,
    ) -> Result<AggregatedSurveyData, SurveyApiError> {
        let response_query = ResponseQuery::latest(self.per_page);
        let (survey, bulk) = futures::try_join!(
            self.api.fetch_survey(&query.survey_id),
            self.api.fetch_responses(&query.survey_id, &response_query)
        )?;

        let responses = filter_by_time_range(bulk.data, &query.time_range, self.clock.now());
        let question_data = aggregate_fallback(&responses, query.threshold);

        Ok(AggregatedSurveyData {
            title: survey.title,
            question_data,
            raw_responses: responses,
            status: FetchStatus::Fallback,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FixedClock, InMemoryAggregateCache, MockSurveyApi};
    use crate::domain::survey::{
        Choice, Heading, Page, Question, QuestionAnswers, RawAnswer, ResponsePage,
        ResponseQuestion, SurveyDetails,
    };

    fn now() -> Timestamp {
        Timestamp::parse_rfc3339("2024-06-15T12:00:00Z").unwrap()
    }

    fn details() -> SurveyDetails {
        SurveyDetails {
            id: "s1".to_string(),
            title: "Team Pulse".to_string(),
            pages: vec![Page {
                id: "p1".to_string(),
                questions: vec![Question {
                    id: "q1".to_string(),
                    headings: vec![Heading {
                        heading: "Favourite colour?".to_string(),
                    }],
                    family: Some("single_choice".to_string()),
                    answers: Some(QuestionAnswers {
                        choices: vec![Choice {
                            id: "c1".to_string(),
                            text: "Red".to_string(),
                        }],
                        rows: vec![],
                    }),
                }],
            }],
        }
    }

    fn response(id: &str, modified: &str) -> SurveyResponse {
        SurveyResponse {
            id: id.to_string(),
            date_modified: Some(modified.to_string()),
            response_status: Some("completed".to_string()),
            pages: vec![ResponsePage {
                id: "p1".to_string(),
                questions: vec![ResponseQuestion {
                    id: "q1".to_string(),
                    family: None,
                    answers: vec![RawAnswer {
                        choice_id: Some("c1".to_string()),
                        ..Default::default()
                    }],
                }],
            }],
            ..Default::default()
        }
    }

    struct Fixture {
        api: MockSurveyApi,
        store: Arc<InMemoryAggregateCache>,
        clock: FixedClock,
        handler: GetAggregatedSurveyDataHandler,
    }

    fn fixture(api: MockSurveyApi) -> Fixture {
        let store = Arc::new(InMemoryAggregateCache::new());
        let clock = FixedClock::new(now());
        let cache = Arc::new(CacheManager::new(store.clone(), Arc::new(clock.clone())));
        let handler =
            GetAggregatedSurveyDataHandler::new(Arc::new(api.clone()), cache, Arc::new(clock.clone()));
        Fixture {
            api,
            store,
            clock,
            handler,
        }
    }

    fn query() -> GetAggregatedSurveyDataQuery {
        GetAggregatedSurveyDataQuery::new(SurveyId::new("s1").unwrap(), 0, TimeRange::LastWeek)
    }

    fn healthy_api() -> MockSurveyApi {
        MockSurveyApi::new().with_details(details()).with_responses(vec![
            response("r1", "2024-06-15T10:00:00Z"),
            response("r2", "2024-01-01T00:00:00Z"),
        ])
    }

    #[tokio::test]
    async fn primary_success_is_fresh_filtered_and_cached() {
        let f = fixture(healthy_api());

        let data = f.handler.handle(&query()).await.unwrap();

        assert_eq!(data.status, FetchStatus::Fresh);
        assert_eq!(data.title, "Team Pulse");
        assert_eq!(data.raw_responses.len(), 1);
        assert_eq!(data.question_data[0].question, "Favourite colour?");
        assert_eq!(data.question_data[0].answers[0].label, "Red");
        assert_eq!(f.store.len().await, 1);
        assert_eq!(f.api.survey_calls(), 0);
    }

    #[tokio::test]
    async fn second_request_is_served_from_cache() {
        let f = fixture(healthy_api());
        let first = f.handler.handle(&query()).await.unwrap();
        let calls = f.api.total_calls();

        f.clock.advance_minutes(29);
        let second = f.handler.handle(&query()).await.unwrap();

        assert_eq!(second.status, FetchStatus::Cached);
        assert_eq!(second.question_data, first.question_data);
        assert_eq!(f.api.total_calls(), calls);
    }

    #[tokio::test]
    async fn bulk_query_asks_for_latest_modified() {
        let f = fixture(healthy_api());
        f.handler.handle(&query()).await.unwrap();

        let queries = f.api.response_queries();
        assert_eq!(queries, vec![ResponseQuery::latest(1000)]);
    }

    #[tokio::test]
    async fn structure_failure_falls_back_without_caching() {
        let f = fixture(healthy_api().with_details_error(SurveyApiError::Timeout));

        let data = f.handler.handle(&query()).await.unwrap();

        assert_eq!(data.status, FetchStatus::Fallback);
        assert_eq!(data.title, "Team Pulse");
        assert_eq!(data.question_data[0].question, "Question 1");
        assert_eq!(data.question_data[0].answers[0].label, "Option c1");
        assert!(f.store.is_empty().await);
    }

    #[tokio::test]
    async fn both_paths_failing_is_an_error() {
        let f = fixture(
            healthy_api()
                .with_details_error(SurveyApiError::Timeout)
                .with_survey_error(SurveyApiError::NotFound("s1".to_string())),
        );

        let err = f.handler.handle(&query()).await.unwrap_err();

        assert_eq!(err.status(), FetchStatus::Error);
        assert_eq!(err.user_message(), "Failed to load survey details.");
        assert_eq!(
            err,
            SurveyDataError::Unavailable {
                primary: SurveyApiError::Timeout,
                fallback: SurveyApiError::NotFound("s1".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn responses_failure_fails_both_paths() {
        let f = fixture(healthy_api().with_responses_error(SurveyApiError::network("reset")));

        assert!(f.handler.handle(&query()).await.is_err());
        assert_eq!(f.api.responses_calls(), 2);
    }

    #[tokio::test]
    async fn handle_uncached_ignores_fresh_entry() {
        let f = fixture(healthy_api());
        f.handler.handle(&query()).await.unwrap();

        let data = f.handler.handle_uncached(&query()).await.unwrap();

        assert_eq!(data.status, FetchStatus::Fresh);
        assert_eq!(f.api.details_calls(), 2);
    }

    #[tokio::test]
    async fn summary_and_trend_use_filtered_responses() {
        let f = fixture(healthy_api());
        let data = f.handler.handle(&query()).await.unwrap();

        let summary = data.summary();
        assert_eq!(summary.completion_rate.value(), 100.0);
        assert_eq!(summary.average_responses, 1.0);

        let trend = data.trend(&TimeRange::LastWeek);
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].bucket, "2024-06-15");
    }
}
