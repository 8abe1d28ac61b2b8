//! Raw survey responses as returned by the bulk responses endpoint.

use serde::{Deserialize, Serialize};

use super::answer::AnswerShape;
use crate::domain::foundation::Timestamp;

/// One page of the bulk responses endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkResponses {
    #[serde(default)]
    pub data: Vec<SurveyResponse>,
    #[serde(default)]
    pub total: u64,
}

/// A single submission, mirroring the survey's page/question structure.
///
/// Timestamps are kept as the provider's strings and parsed on demand so a
/// single malformed date does not reject the whole batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveyResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(default)]
    pub date_modified: Option<String>,
    #[serde(default)]
    pub response_status: Option<String>,
    #[serde(default)]
    pub pages: Vec<ResponsePage>,
}

/// What a response says about when it was last touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseDate {
    /// Neither date field carries a value.
    Missing,
    /// The chosen date field is present but not a recognizable date.
    Invalid(String),
    At(Timestamp),
}

impl SurveyResponse {
    /// Reads `date_modified`, or `date_created` when the former is absent
    /// or blank.
    ///
    /// An unreadable `date_modified` does not fall through to
    /// `date_created`.
    pub fn response_date(&self) -> ResponseDate {
        let raw = [&self.date_modified, &self.date_created]
            .into_iter()
            .flatten()
            .find(|value| !value.trim().is_empty());

        match raw {
            None => ResponseDate::Missing,
            Some(raw) => match Timestamp::parse_iso8601(raw) {
                Some(at) => ResponseDate::At(at),
                None => ResponseDate::Invalid(raw.clone()),
            },
        }
    }

    /// The response date when it is present and readable.
    pub fn effective_timestamp(&self) -> Option<Timestamp> {
        match self.response_date() {
            ResponseDate::At(at) => Some(at),
            ResponseDate::Missing | ResponseDate::Invalid(_) => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.response_status.as_deref() == Some("completed")
    }

    /// Every answered question in page order.
    pub fn questions(&self) -> impl Iterator<Item = &ResponseQuestion> {
        self.pages.iter().flat_map(|page| page.questions.iter())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponsePage {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub questions: Vec<ResponseQuestion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseQuestion {
    pub id: String,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub answers: Vec<RawAnswer>,
}

/// Answer record exactly as the provider sends it; any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAnswer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choice_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choice_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_id: Option<String>,
}

impl RawAnswer {
    pub fn shape(&self) -> AnswerShape {
        AnswerShape::from(self)
    }
}
