//! Survey module - Survey structure, raw responses and answer labels.
//!
//! Types here mirror the survey provider's payloads closely but tolerate
//! missing collections, so malformed structure never fails a fetch.

mod answer;
mod listing;
mod response;
mod structure;

pub use answer::{
    normalize_label, resolve_fallback_label, resolve_label, AnswerShape, ChoiceTexts, NO_ANSWER,
};
pub use listing::{filter_by_title, SurveyList};
pub use response::{
    BulkResponses, RawAnswer, ResponseDate, ResponsePage, ResponseQuestion, SurveyResponse,
};
pub use structure::{
    Choice, Heading, Page, Question, QuestionAnswers, QuestionFamily, SurveyDetails, SurveySummary,
};
