//! Answer shapes and display-label resolution.
//!
//! A raw answer can carry any combination of free text, "other" text, a
//! choice reference, a literal choice text and a matrix row reference.
//! [`AnswerShape`] collapses that record into the single variant that wins
//! the priority order, and the `resolve_*` functions turn a shape into the
//! label counted by the aggregator.
//!
//! Primary priority (highest first):
//!
//! 1. non-empty free text
//! 2. non-empty "other" text
//! 3. choice reference resolved through the choice map
//! 4. literal choice text
//! 5. row + choice reference, as `"<row>: <choice>"`
//! 6. bare choice reference, as `"Option <id>"`
//! 7. `"No answer provided"`
//!
//! The fallback path skips the map lookups (3 and 5).

use super::response::RawAnswer;

/// Label used whenever an answer carries nothing displayable.
pub const NO_ANSWER: &str = "No answer provided";

/// Lookup of display texts for choice and matrix row ids.
pub trait ChoiceTexts {
    fn choice_text(&self, choice_id: &str) -> Option<&str>;

    fn row_text(&self, row_id: &str) -> Option<&str>;
}

/// The variant of an answer that decides its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerShape {
    FreeText(String),
    OtherText(String),
    Choice {
        choice_id: String,
        choice_text: Option<String>,
        row_id: Option<String>,
    },
    ChoiceText(String),
    Empty,
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl From<&RawAnswer> for AnswerShape {
    fn from(raw: &RawAnswer) -> Self {
        if let Some(text) = non_blank(raw.text.as_ref()) {
            return Self::FreeText(text);
        }
        if let Some(other) = non_blank(raw.other_text.as_ref()) {
            return Self::OtherText(other);
        }
        let choice_text = non_blank(raw.choice_text.as_ref());
        match non_blank(raw.choice_id.as_ref()) {
            Some(choice_id) => Self::Choice {
                choice_id,
                choice_text,
                row_id: non_blank(raw.row_id.as_ref()),
            },
            None => choice_text.map(Self::ChoiceText).unwrap_or(Self::Empty),
        }
    }
}

/// Resolves a label with the full priority order, using structure texts.
pub fn resolve_label(shape: &AnswerShape, texts: &dyn ChoiceTexts) -> String {
    let raw = match shape {
        AnswerShape::FreeText(text) | AnswerShape::OtherText(text) => text.clone(),
        AnswerShape::Choice {
            choice_id,
            choice_text,
            row_id,
        } => match (texts.choice_text(choice_id).filter(|t| !t.is_empty()), choice_text, row_id) {
            (Some(mapped), _, _) => mapped.to_string(),
            (None, Some(literal), _) => literal.clone(),
            (None, None, Some(row_id)) => {
                let row = texts
                    .row_text(row_id)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Row {}", row_id));
                format!("{}: Option {}", row, choice_id)
            }
            (None, None, None) => format!("Option {}", choice_id),
        },
        AnswerShape::ChoiceText(text) => text.clone(),
        AnswerShape::Empty => String::new(),
    };
    normalize_label(&raw)
}

/// Resolves a label without structure texts: free text, other text,
/// literal choice text, then `"Option <id>"`.
pub fn resolve_fallback_label(shape: &AnswerShape) -> String {
    let raw = match shape {
        AnswerShape::FreeText(text)
        | AnswerShape::OtherText(text)
        | AnswerShape::ChoiceText(text) => text.clone(),
        AnswerShape::Choice {
            choice_text: Some(literal),
            ..
        } => literal.clone(),
        AnswerShape::Choice { choice_id, .. } => format!("Option {}", choice_id),
        AnswerShape::Empty => String::new(),
    };
    normalize_label(&raw)
}

/// Trims, strips a leading `"Choice "` (any case, any whitespace run) and
/// collapses empty, `"undefined"` and `"null"` to [`NO_ANSWER`].
pub fn normalize_label(raw: &str) -> String {
    let trimmed = raw.trim();
    let label = strip_choice_prefix(trimmed).trim();
    if label.is_empty() || label == "undefined" || label == "null" {
        NO_ANSWER.to_string()
    } else {
        label.to_string()
    }
}

fn strip_choice_prefix(label: &str) -> &str {
    const PREFIX: &str = "choice";
    match (label.get(..PREFIX.len()), label.get(PREFIX.len()..)) {
        (Some(head), Some(rest)) if head.eq_ignore_ascii_case(PREFIX) => {
            let stripped = rest.trim_start();
            if stripped.len() < rest.len() {
                stripped
            } else {
                label
            }
        }
        _ => label,
    }
}
