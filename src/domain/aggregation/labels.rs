//! Label Resolver - question and choice display texts from survey structure.

use std::collections::HashMap;

use crate::domain::survey::{ChoiceTexts, QuestionFamily, SurveyDetails};

/// Display information for one structured question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionLabel {
    pub text: String,
    pub family: QuestionFamily,
}

/// Question and choice texts derived from a survey's structure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelMaps {
    questions: HashMap<String, QuestionLabel>,
    choices: HashMap<String, String>,
    rows: HashMap<String, String>,
}

impl LabelMaps {
    /// Walks pages then questions in order.
    ///
    /// Questions without a heading are labelled `"Question N"`, where N is the
    /// question's 1-based position in the whole walk (not per page). Choice
    /// texts are keyed by choice id with the last write winning on collision;
    /// matrix rows go to their own map.
    pub fn resolve(survey: &SurveyDetails) -> Self {
        let mut maps = Self::default();
        let questions = survey.pages.iter().flat_map(|page| page.questions.iter());

        for (position, question) in questions.enumerate() {
            let text = match question.heading() {
                Some(heading) => heading.to_string(),
                None => format!("Question {}", position + 1),
            };
            maps.questions.insert(
                question.id.clone(),
                QuestionLabel {
                    text,
                    family: question.family(),
                },
            );

            for choice in question.choices() {
                maps.choices.insert(choice.id.clone(), choice.text.clone());
            }
            for row in question.rows() {
                maps.rows.insert(row.id.clone(), row.text.clone());
            }
        }

        maps
    }

    pub fn question(&self, question_id: &str) -> Option<&QuestionLabel> {
        self.questions.get(question_id)
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn choice_count(&self) -> usize {
        self.choices.len()
    }
}

impl ChoiceTexts for LabelMaps {
    fn choice_text(&self, choice_id: &str) -> Option<&str> {
        self.choices.get(choice_id).map(String::as_str)
    }

    fn row_text(&self, row_id: &str) -> Option<&str> {
        self.rows.get(row_id).map(String::as_str)
    }
}
