//! Survey data query and command handlers.

mod get_aggregated_survey_data;
mod refresh_survey_data;

pub use get_aggregated_survey_data::{
    AggregatedSurveyData, GetAggregatedSurveyDataHandler, GetAggregatedSurveyDataQuery,
    SurveyDataError,
};
pub use refresh_survey_data::{RefreshSurveyDataCommand, RefreshSurveyDataHandler};
