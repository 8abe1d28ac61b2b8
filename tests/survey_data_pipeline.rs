//! Integration tests for the survey data pipeline.
//!
//! These tests wire the real handlers to the mock survey provider, the
//! in-memory cache and a fixed clock:
//! 1. Fresh loads are cached and served until the TTL runs out
//! 2. Fallback loads use reduced labels and are never cached
//! 3. Refresh drops every cached aggregate of one survey
//! 4. The details view keeps only the latest request's result

use serde_json::json;
use std::sync::Arc;

use survey_insights::adapters::{FixedClock, InMemoryAggregateCache, MockSurveyApi};
use survey_insights::application::{
    CacheManager, Completion, GetAggregatedSurveyDataHandler, GetAggregatedSurveyDataQuery,
    RefreshSurveyDataCommand, RefreshSurveyDataHandler, SurveyDataError, SurveyDetailsView,
};
use survey_insights::domain::aggregation::{CacheKey, FetchStatus, TimeRange};
use survey_insights::domain::foundation::{SurveyId, Timestamp};
use survey_insights::domain::survey::{QuestionFamily, SurveyDetails, SurveyResponse};
use survey_insights::ports::{AggregateCache, SurveyApiError};

// =============================================================================
// Test Infrastructure
// =============================================================================

const NOW: &str = "2024-06-15T12:00:00Z";

fn now() -> Timestamp {
    Timestamp::parse_rfc3339(NOW).unwrap()
}

fn survey_id() -> SurveyId {
    SurveyId::new("123").unwrap()
}

fn details() -> SurveyDetails {
    serde_json::from_value(json!({
        "id": "123",
        "title": "Customer Feedback",
        "pages": [{
            "id": "p1",
            "questions": [
                {
                    "id": "q1",
                    "family": "single_choice",
                    "headings": [{ "heading": "Favourite colour?" }],
                    "answers": { "choices": [
                        { "id": "c1", "text": "Red" },
                        { "id": "c2", "text": "Blue" }
                    ]}
                },
                {
                    "id": "q2",
                    "family": "open_ended",
                    "headings": [{ "heading": "Anything else?" }]
                }
            ]
        }]
    }))
    .unwrap()
}

fn response(id: &str, modified: &str, choice_id: &str) -> SurveyResponse {
    serde_json::from_value(json!({
        "id": id,
        "date_modified": modified,
        "response_status": "completed",
        "pages": [{
            "id": "p1",
            "questions": [
                { "id": "q1", "answers": [{ "choice_id": choice_id }] },
                { "id": "q2", "answers": [{ "text": "  Choice great service " }] }
            ]
        }]
    }))
    .unwrap()
}

fn responses() -> Vec<SurveyResponse> {
    vec![
        response("r1", "2024-06-14T09:00:00Z", "c1"),
        response("r2", "2024-06-13T09:00:00Z", "c1"),
        response("r3", "2024-06-12T09:00:00Z", "c2"),
        // Outside the last week
        response("r4", "2024-05-01T09:00:00Z", "c2"),
    ]
}

struct Pipeline {
    api: MockSurveyApi,
    store: Arc<InMemoryAggregateCache>,
    clock: Arc<FixedClock>,
    cache: Arc<CacheManager>,
    loader: Arc<GetAggregatedSurveyDataHandler>,
}

impl Pipeline {
    fn new(api: MockSurveyApi) -> Self {
        let store = Arc::new(InMemoryAggregateCache::new());
        let clock = Arc::new(FixedClock::new(now()));
        let cache = Arc::new(CacheManager::new(store.clone(), clock.clone()));
        let loader = Arc::new(GetAggregatedSurveyDataHandler::new(
            Arc::new(api.clone()),
            cache.clone(),
            clock.clone(),
        ));
        Self {
            api,
            store,
            clock,
            cache,
            loader,
        }
    }

    fn refresh_handler(&self) -> RefreshSurveyDataHandler {
        RefreshSurveyDataHandler::new(self.cache.clone(), self.loader.clone())
    }
}

fn week_query() -> GetAggregatedSurveyDataQuery {
    GetAggregatedSurveyDataQuery::new(survey_id(), 0, TimeRange::LastWeek)
}

fn healthy_api() -> MockSurveyApi {
    MockSurveyApi::new()
        .with_details(details())
        .with_responses(responses())
}

// =============================================================================
// Fresh and Cached
// =============================================================================

#[tokio::test]
async fn fresh_load_aggregates_filtered_responses_with_structure_labels() {
    let pipeline = Pipeline::new(healthy_api());

    let data = pipeline.loader.handle(&week_query()).await.unwrap();

    assert_eq!(data.status, FetchStatus::Fresh);
    assert_eq!(data.title, "Customer Feedback");
    assert_eq!(data.raw_responses.len(), 3);

    let colour = &data.question_data[0];
    assert_eq!(colour.question, "Favourite colour?");
    assert_eq!(colour.question_type, QuestionFamily::SingleChoice);
    assert_eq!(colour.total_responses, 3);
    assert_eq!(colour.answers[0].label, "Red");
    assert_eq!(colour.answers[0].count, 2);
    assert_eq!(colour.answers[0].percent.value(), 66.7);
    assert_eq!(colour.answers[1].label, "Blue");
    assert_eq!(colour.answers[1].percent.value(), 33.3);

    let comments = &data.question_data[1];
    assert_eq!(comments.question_type, QuestionFamily::OpenEnded);
    assert_eq!(comments.answers[0].label, "great service");
    assert_eq!(comments.answers[0].count, 3);
}

#[tokio::test]
async fn provider_is_asked_for_latest_thousand_responses() {
    let pipeline = Pipeline::new(healthy_api());

    pipeline.loader.handle(&week_query()).await.unwrap();

    let queries = pipeline.api.response_queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].per_page, 1000);
    assert_eq!(queries[0].sort_by, "date_modified");
}

#[tokio::test]
async fn second_load_within_ttl_is_served_from_cache() {
    let pipeline = Pipeline::new(healthy_api());
    pipeline.loader.handle(&week_query()).await.unwrap();
    let calls_after_first = pipeline.api.total_calls();

    pipeline.clock.advance_minutes(29);
    let data = pipeline.loader.handle(&week_query()).await.unwrap();

    assert_eq!(data.status, FetchStatus::Cached);
    assert_eq!(data.title, "Customer Feedback");
    assert_eq!(data.raw_responses.len(), 3);
    assert_eq!(pipeline.api.total_calls(), calls_after_first);
}

#[tokio::test]
async fn expired_entry_triggers_a_new_fetch() {
    let pipeline = Pipeline::new(healthy_api());
    pipeline.loader.handle(&week_query()).await.unwrap();

    pipeline.clock.advance_minutes(31);
    let data = pipeline.loader.handle(&week_query()).await.unwrap();

    assert_eq!(data.status, FetchStatus::Fresh);
    assert_eq!(pipeline.api.details_calls(), 2);
    assert_eq!(pipeline.api.responses_calls(), 2);
}

#[tokio::test]
async fn cache_entries_are_per_threshold_and_window() {
    let pipeline = Pipeline::new(healthy_api());
    pipeline.loader.handle(&week_query()).await.unwrap();

    let strict = GetAggregatedSurveyDataQuery::new(survey_id(), 5, TimeRange::LastWeek);
    let data = pipeline.loader.handle(&strict).await.unwrap();

    assert_eq!(data.status, FetchStatus::Fresh);
    assert!(data.question_data.is_empty());
    assert_eq!(pipeline.store.len().await, 2);
}

// =============================================================================
// Fallback and Error
// =============================================================================

#[tokio::test]
async fn details_failure_falls_back_to_reduced_labels() {
    let api = healthy_api().with_details_error(SurveyApiError::Timeout);
    let pipeline = Pipeline::new(api);

    let data = pipeline.loader.handle(&week_query()).await.unwrap();

    assert_eq!(data.status, FetchStatus::Fallback);
    assert_eq!(data.title, "Customer Feedback");
    let colour = &data.question_data[0];
    assert_eq!(colour.question, "Question 1");
    assert_eq!(colour.answers[0].label, "Option c1");
    assert_eq!(pipeline.api.survey_calls(), 1);
}

#[tokio::test]
async fn fallback_results_are_not_cached() {
    let api = healthy_api().with_details_error(SurveyApiError::unavailable("down"));
    let pipeline = Pipeline::new(api);

    pipeline.loader.handle(&week_query()).await.unwrap();

    assert!(pipeline.store.is_empty().await);
    assert!(pipeline
        .store
        .get(&CacheKey::new(&survey_id(), 0, &TimeRange::LastWeek))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn both_paths_failing_reports_error_and_caches_nothing() {
    let api = healthy_api()
        .with_details_error(SurveyApiError::Timeout)
        .with_survey_error(SurveyApiError::NotFound("123".to_string()));
    let pipeline = Pipeline::new(api);

    let err = pipeline.loader.handle(&week_query()).await.unwrap_err();

    assert_eq!(err.status(), FetchStatus::Error);
    assert_eq!(err.user_message(), "Failed to load survey details.");
    match err {
        SurveyDataError::Unavailable { primary, fallback } => {
            assert_eq!(primary, SurveyApiError::Timeout);
            assert_eq!(fallback, SurveyApiError::NotFound("123".to_string()));
        }
    }
    assert!(pipeline.store.is_empty().await);
}

#[tokio::test]
async fn responses_failure_fails_both_paths() {
    let api = healthy_api().with_responses_error(SurveyApiError::RateLimited {
        retry_after_secs: Some(60),
    });
    let pipeline = Pipeline::new(api);

    let result = pipeline.loader.handle(&week_query()).await;

    assert!(result.is_err());
}

// =============================================================================
// Refresh
// =============================================================================

#[tokio::test]
async fn refresh_bypasses_a_valid_cache_entry() {
    let pipeline = Pipeline::new(healthy_api());
    pipeline.loader.handle(&week_query()).await.unwrap();

    pipeline.api.set_responses(vec![response("r9", "2024-06-15T08:00:00Z", "c2")]);
    pipeline.clock.advance_minutes(5);

    let data = pipeline
        .refresh_handler()
        .handle(RefreshSurveyDataCommand {
            survey_id: survey_id(),
            threshold: 0,
            time_range: TimeRange::LastWeek,
        })
        .await
        .unwrap();

    assert_eq!(data.status, FetchStatus::Fresh);
    assert_eq!(data.raw_responses.len(), 1);
    assert_eq!(data.question_data[0].answers[0].label, "Blue");

    let cached = pipeline.loader.handle(&week_query()).await.unwrap();
    assert_eq!(cached.status, FetchStatus::Cached);
    assert_eq!(cached.raw_responses.len(), 1);
}

#[tokio::test]
async fn refresh_drops_other_windows_of_the_same_survey() {
    let pipeline = Pipeline::new(healthy_api());
    let year = GetAggregatedSurveyDataQuery::new(survey_id(), 0, TimeRange::LastYear);
    pipeline.loader.handle(&year).await.unwrap();

    pipeline
        .refresh_handler()
        .handle(RefreshSurveyDataCommand {
            survey_id: survey_id(),
            threshold: 0,
            time_range: TimeRange::LastWeek,
        })
        .await
        .unwrap();

    assert!(pipeline.store.get(&year.cache_key()).await.unwrap().is_none());
    assert!(pipeline
        .store
        .get(&week_query().cache_key())
        .await
        .unwrap()
        .is_some());
}

// =============================================================================
// Details View
// =============================================================================

#[tokio::test]
async fn view_keeps_only_the_latest_filter_result() {
    let pipeline = Pipeline::new(healthy_api());
    let mut view = SurveyDetailsView::new();

    let week = view.begin(week_query());
    let year = view.begin(GetAggregatedSurveyDataQuery::new(
        survey_id(),
        0,
        TimeRange::LastYear,
    ));

    let year_result = pipeline.loader.handle(&year.query).await;
    let week_result = pipeline.loader.handle(&week.query).await;

    assert_eq!(
        view.complete(&year, year_result),
        Completion::Applied(FetchStatus::Fresh)
    );
    assert_eq!(view.complete(&week, week_result), Completion::Discarded);
    assert_eq!(view.data().unwrap().raw_responses.len(), 4);
}

#[tokio::test]
async fn view_retry_recovers_after_error() {
    let api = healthy_api()
        .with_details_error(SurveyApiError::Timeout)
        .with_survey_error(SurveyApiError::Timeout);
    let pipeline = Pipeline::new(api);
    let mut view = SurveyDetailsView::new();

    let first = view.load(&pipeline.loader, week_query()).await;
    assert_eq!(first, Completion::Applied(FetchStatus::Error));
    assert!(view.can_retry());
    assert!(view.data().is_none());

    pipeline.api.set_details_error(None);
    let retried = view.retry(&pipeline.loader).await;

    assert_eq!(retried, Some(Completion::Applied(FetchStatus::Fresh)));
    assert_eq!(view.status(), FetchStatus::Fresh);
    assert!(view.error_message().is_none());
}
