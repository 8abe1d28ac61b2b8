//! Headline statistics over one aggregated result.

use serde::{Deserialize, Serialize};

use super::aggregator::AggregatedQuestion;
use crate::domain::foundation::Percentage;
use crate::domain::survey::SurveyResponse;

/// The single answer with the highest count across all questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularAnswer {
    pub question: String,
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Mean total responses per returned question, one decimal.
    pub average_responses: f64,
    pub most_popular_answer: Option<PopularAnswer>,
    /// Completed raw responses over all raw responses.
    pub completion_rate: Percentage,
}

impl SummaryStats {
    pub fn compute(questions: &[AggregatedQuestion], raw_responses: &[SurveyResponse]) -> Self {
        let average_responses = if questions.is_empty() {
            0.0
        } else {
            let total: u64 = questions.iter().map(|q| q.total_responses).sum();
            (total as f64 / questions.len() as f64 * 10.0).round() / 10.0
        };

        let mut most_popular_answer: Option<PopularAnswer> = None;
        for question in questions {
            for answer in &question.answers {
                let beats = most_popular_answer
                    .as_ref()
                    .map_or(true, |best| answer.count > best.count);
                if beats {
                    most_popular_answer = Some(PopularAnswer {
                        question: question.question.clone(),
                        label: answer.label.clone(),
                        count: answer.count,
                    });
                }
            }
        }

        let completed = raw_responses.iter().filter(|r| r.is_completed()).count();
        let completion_rate = Percentage::from_ratio(completed as u64, raw_responses.len() as u64);

        Self {
            average_responses,
            most_popular_answer,
            completion_rate,
        }
    }
}
