//! Survey structure as returned by the provider's detail and basic endpoints.
//!
//! Every collection defaults to empty so that partially populated payloads
//! deserialize instead of failing the whole fetch.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Full survey structure: pages, questions, headings and choices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveyDetails {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub pages: Vec<Page>,
}

/// Basic survey record returned by the lightweight endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveySummary {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(default)]
    pub headings: Vec<Heading>,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub answers: Option<QuestionAnswers>,
}

impl Question {
    /// First non-blank heading, trimmed.
    pub fn heading(&self) -> Option<&str> {
        self.headings
            .first()
            .map(|h| h.heading.trim())
            .filter(|h| !h.is_empty())
    }

    /// Choices offered by this question, empty when the payload omits them.
    pub fn choices(&self) -> &[Choice] {
        self.answers.as_ref().map(|a| a.choices.as_slice()).unwrap_or(&[])
    }

    /// Matrix rows offered by this question.
    pub fn rows(&self) -> &[Choice] {
        self.answers.as_ref().map(|a| a.rows.as_slice()).unwrap_or(&[])
    }

    /// Answer family, defaulting to single choice.
    pub fn family(&self) -> QuestionFamily {
        QuestionFamily::from_tag(self.family.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    #[serde(default)]
    pub heading: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionAnswers {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub rows: Vec<Choice>,
}

/// A selectable option (or matrix row) with its display text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub id: String,
    #[serde(default)]
    pub text: String,
}

/// Answer family of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionFamily {
    #[default]
    SingleChoice,
    MultipleChoice,
    Matrix,
    OpenEnded,
    Demographic,
    Datetime,
    Presentation,
}

impl QuestionFamily {
    /// Maps a provider family tag; missing or unknown tags become `SingleChoice`.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag.map(str::trim) {
            Some("multiple_choice") => Self::MultipleChoice,
            Some("matrix") => Self::Matrix,
            Some("open_ended") => Self::OpenEnded,
            Some("demographic") => Self::Demographic,
            Some("datetime") => Self::Datetime,
            Some("presentation") => Self::Presentation,
            _ => Self::SingleChoice,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleChoice => "single_choice",
            Self::MultipleChoice => "multiple_choice",
            Self::Matrix => "matrix",
            Self::OpenEnded => "open_ended",
            Self::Demographic => "demographic",
            Self::Datetime => "datetime",
            Self::Presentation => "presentation",
        }
    }
}

impl fmt::Display for QuestionFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
