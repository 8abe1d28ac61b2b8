//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod cache_manager;
pub mod handlers;
pub mod survey_details_view;

pub use cache_manager::{CacheManager, DEFAULT_TTL_MINUTES};
pub use handlers::survey_data::{
    AggregatedSurveyData, GetAggregatedSurveyDataHandler, GetAggregatedSurveyDataQuery,
    RefreshSurveyDataCommand, RefreshSurveyDataHandler, SurveyDataError,
};
pub use handlers::survey_list::{ListSurveysError, ListSurveysHandler, ListSurveysQuery};
pub use survey_details_view::{Completion, RequestTag, SurveyDetailsView};
