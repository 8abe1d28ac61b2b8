//! Response Aggregator - per-question answer frequency tables.
//!
//! Aggregation walks every (page, question, answer) triple of every response,
//! counts resolved answer labels per question, turns counts into one-decimal
//! percentages and drops questions below the response threshold.
//!
//! How questions are named and answers labelled is delegated to a
//! [`LabelStrategy`]: [`StructuredLabels`] uses the survey structure,
//! [`FirstSeenLabels`] is the reduced strategy used when the structure could
//! not be fetched.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::counter::LabelCounter;
use super::labels::LabelMaps;
use crate::domain::foundation::Percentage;
use crate::domain::survey::{
    resolve_fallback_label, resolve_label, AnswerShape, QuestionFamily, ResponseQuestion,
    SurveyResponse,
};

/// One answer row of an aggregated question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedAnswer {
    pub label: String,
    pub count: u64,
    pub percent: Percentage,
}

/// Frequency table for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedQuestion {
    pub question: String,
    pub question_type: QuestionFamily,
    pub total_responses: u64,
    /// Sorted by count descending, ties in first-seen order.
    pub answers: Vec<AggregatedAnswer>,
}

/// Naming and labelling rules used while aggregating.
pub trait LabelStrategy {
    /// Display text for a question seen for the first time, after
    /// `seen_before` distinct questions.
    fn question_text(&self, question: &ResponseQuestion, seen_before: usize) -> String;

    fn question_family(&self, question: &ResponseQuestion) -> QuestionFamily;

    fn answer_label(&self, shape: &AnswerShape) -> String;
}

/// Labels from survey structure, with the full answer priority order.
#[derive(Debug, Clone, Copy)]
pub struct StructuredLabels<'a> {
    maps: &'a LabelMaps,
}

impl<'a> StructuredLabels<'a> {
    pub fn new(maps: &'a LabelMaps) -> Self {
        Self { maps }
    }
}

impl LabelStrategy for StructuredLabels<'_> {
    fn question_text(&self, question: &ResponseQuestion, seen_before: usize) -> String {
        self.maps
            .question(&question.id)
            .map(|label| label.text.clone())
            .unwrap_or_else(|| format!("Question {}", seen_before + 1))
    }

    fn question_family(&self, question: &ResponseQuestion) -> QuestionFamily {
        self.maps
            .question(&question.id)
            .map(|label| label.family)
            .unwrap_or_else(|| QuestionFamily::from_tag(question.family.as_deref()))
    }

    fn answer_label(&self, shape: &AnswerShape) -> String {
        resolve_label(shape, self.maps)
    }
}

/// Numbers questions in first-seen order and uses the narrow answer priority.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstSeenLabels;

impl LabelStrategy for FirstSeenLabels {
    fn question_text(&self, _question: &ResponseQuestion, seen_before: usize) -> String {
        format!("Question {}", seen_before + 1)
    }

    fn question_family(&self, question: &ResponseQuestion) -> QuestionFamily {
        QuestionFamily::from_tag(question.family.as_deref())
    }

    fn answer_label(&self, shape: &AnswerShape) -> String {
        resolve_fallback_label(shape)
    }
}

struct QuestionTally {
    text: String,
    family: QuestionFamily,
    counter: LabelCounter,
}

impl QuestionTally {
    fn finish(self) -> AggregatedQuestion {
        let total = self.counter.total();
        let answers = self
            .counter
            .ranked()
            .into_iter()
            .map(|(label, count)| AggregatedAnswer {
                label: label.to_string(),
                count,
                percent: Percentage::from_ratio(count, total),
            })
            .collect();

        AggregatedQuestion {
            question: self.text,
            question_type: self.family,
            total_responses: total,
            answers,
        }
    }
}

/// Aggregates responses with an arbitrary label strategy.
///
/// Questions are keyed by id and returned in first-seen order. Questions
/// whose total is below `threshold` are removed from the result.
pub fn aggregate_with<S>(
    responses: &[SurveyResponse],
    strategy: &S,
    threshold: u32,
) -> Vec<AggregatedQuestion>
where
    S: LabelStrategy + ?Sized,
{
    let mut tallies: IndexMap<String, QuestionTally> = IndexMap::new();

    for question in responses.iter().flat_map(SurveyResponse::questions) {
        let seen_before = tallies.len();
        let tally = tallies
            .entry(question.id.clone())
            .or_insert_with(|| QuestionTally {
                text: strategy.question_text(question, seen_before),
                family: strategy.question_family(question),
                counter: LabelCounter::new(),
            });

        for answer in &question.answers {
            tally.counter.increment(strategy.answer_label(&answer.shape()));
        }
    }

    tallies
        .into_values()
        .map(QuestionTally::finish)
        .filter(|question| question.total_responses >= u64::from(threshold))
        .collect()
}

/// Primary aggregation using labels resolved from the survey structure.
pub fn aggregate_responses(
    responses: &[SurveyResponse],
    maps: &LabelMaps,
    threshold: u32,
) -> Vec<AggregatedQuestion> {
    aggregate_with(responses, &StructuredLabels::new(maps), threshold)
}

/// Reduced-fidelity aggregation used when the survey structure is unavailable.
pub fn aggregate_fallback(responses: &[SurveyResponse], threshold: u32) -> Vec<AggregatedQuestion> {
    aggregate_with(responses, &FirstSeenLabels, threshold)
}
