//! RefreshSurveyDataHandler - Forced re-aggregation for one survey.

use std::sync::Arc;

use super::get_aggregated_survey_data::{
    AggregatedSurveyData, GetAggregatedSurveyDataHandler, GetAggregatedSurveyDataQuery,
    SurveyDataError,
};
use crate::application::CacheManager;
use crate::domain::aggregation::{CacheKey, TimeRange};
use crate::domain::foundation::SurveyId;

/// Command to drop every cached aggregate of a survey and reload one filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshSurveyDataCommand {
    pub survey_id: SurveyId,
    pub threshold: u32,
    pub time_range: TimeRange,
}

impl From<RefreshSurveyDataCommand> for GetAggregatedSurveyDataQuery {
    fn from(cmd: RefreshSurveyDataCommand) -> Self {
        GetAggregatedSurveyDataQuery::new(cmd.survey_id, cmd.threshold, cmd.time_range)
    }
}

/// Handler for manual refresh.
pub struct RefreshSurveyDataHandler {
    cache: Arc<CacheManager>,
    loader: Arc<GetAggregatedSurveyDataHandler>,
}

impl RefreshSurveyDataHandler {
    pub fn new(cache: Arc<CacheManager>, loader: Arc<GetAggregatedSurveyDataHandler>) -> Self {
        Self { cache, loader }
    }

    /// Purges all windows and thresholds of the survey, then reloads.
    ///
    /// The reload never reads the cache, so a failed purge cannot serve the
    /// old entry.
    pub async fn handle(
        &self,
        cmd: RefreshSurveyDataCommand,
    ) -> Result<AggregatedSurveyData, SurveyDataError> {
        let prefix = CacheKey::survey_prefix(&cmd.survey_id);
        match self.cache.purge(&prefix).await {
            Ok(removed) => {
                tracing::info!(survey_id = %cmd.survey_id, removed, "Refreshing survey data");
            }
            Err(e) => {
                tracing::warn!(survey_id = %cmd.survey_id, error = %e, "Cache purge failed during refresh");
            }
        }

        self.loader.handle_uncached(&cmd.into()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FixedClock, InMemoryAggregateCache, MockSurveyApi};
    use crate::domain::aggregation::{CacheEntry, FetchStatus};
    use crate::domain::foundation::Timestamp;
    use crate::domain::survey::SurveyDetails;
    use crate::ports::AggregateCache;

    fn now() -> Timestamp {
        Timestamp::parse_rfc3339("2024-06-15T12:00:00Z").unwrap()
    }

    fn survey_id(id: &str) -> SurveyId {
        SurveyId::new(id).unwrap()
    }

    fn entry() -> CacheEntry {
        CacheEntry {
            question_data: vec![],
            title: "Old".to_string(),
            raw_responses: vec![],
            cached_at: now(),
        }
    }

    #[tokio::test]
    async fn refresh_purges_survey_and_reloads_fresh() {
        let api = MockSurveyApi::new().with_details(SurveyDetails {
            id: "1".to_string(),
            title: "New".to_string(),
            pages: vec![],
        });
        let store = Arc::new(InMemoryAggregateCache::new());
        let clock = Arc::new(FixedClock::new(now()));
        let cache = Arc::new(CacheManager::new(store.clone(), clock.clone()));
        let loader = Arc::new(GetAggregatedSurveyDataHandler::new(
            Arc::new(api.clone()),
            cache.clone(),
            clock,
        ));
        let handler = RefreshSurveyDataHandler::new(cache.clone(), loader);

        let other_window = CacheKey::new(&survey_id("1"), 3, &TimeRange::LastYear);
        let other_survey = CacheKey::new(&survey_id("12"), 0, &TimeRange::LastWeek);
        cache.put(&other_window, &entry()).await.unwrap();
        cache.put(&other_survey, &entry()).await.unwrap();
        cache
            .put(&CacheKey::new(&survey_id("1"), 0, &TimeRange::LastWeek), &entry())
            .await
            .unwrap();

        let data = handler
            .handle(RefreshSurveyDataCommand {
                survey_id: survey_id("1"),
                threshold: 0,
                time_range: TimeRange::LastWeek,
            })
            .await
            .unwrap();

        assert_eq!(data.status, FetchStatus::Fresh);
        assert_eq!(data.title, "New");
        assert_eq!(api.details_calls(), 1);
        assert!(store.get(&other_window).await.unwrap().is_none());
        assert!(store.get(&other_survey).await.unwrap().is_some());
    }
}
