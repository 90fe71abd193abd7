use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question needs at least 2 options, got {len}")]
    TooFewOptions { len: usize },

    #[error("correct index {index} is out of range for {len} options")]
    CorrectIndexOutOfRange { index: usize, len: usize },
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Difficulty level attached to a question.
///
/// Parsed case-insensitively. Values outside the known levels are kept verbatim
/// so they can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Difficulty {
    Leicht,
    Mittel,
    Schwer,
    Other(String),
}

impl Difficulty {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "leicht" => Self::Leicht,
            "mittel" => Self::Mittel,
            "schwer" => Self::Schwer,
            _ => Self::Other(raw.to_string()),
        }
    }

    /// Human readable label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Leicht => "Leicht",
            Self::Mittel => "Mittel",
            Self::Schwer => "Schwer",
            Self::Other(raw) => raw,
        }
    }

    /// Wire value as written in `quiz.json`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Leicht => "leicht",
            Self::Mittel => "mittel",
            Self::Schwer => "schwer",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for Difficulty {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Difficulty> for String {
    fn from(value: Difficulty) -> Self {
        value.as_str().to_string()
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Bibliographic reference for a question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_or_section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,
}

impl QuestionSource {
    /// True when no field carries text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [
            &self.citation,
            &self.chapter,
            &self.article_or_section,
            &self.pages,
        ]
        .iter()
        .all(|field| field.as_deref().is_none_or(|v| v.trim().is_empty()))
    }
}

/// A multiple choice question as stored in `quiz.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    #[serde(default)]
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<QuestionSource>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

impl Question {
    /// Check the structural invariants of a question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text is blank, fewer than two options exist,
    /// or `correct_index` does not point at an option.
    pub fn validate(&self) -> Result<(), QuestionError> {
        if self.text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        let len = self.options.len();
        if len < 2 {
            return Err(QuestionError::TooFewOptions { len });
        }
        if self.correct_index >= len {
            return Err(QuestionError::CorrectIndexOutOfRange {
                index: self.correct_index,
                len,
            });
        }
        Ok(())
    }

    /// Text of the correct option.
    #[must_use]
    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_index).map(String::as_str)
    }
}
