use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::question::{Question, QuestionError};

/// Placeholder in a quiz description that is replaced by the pool size.
pub const QUESTION_COUNT_PLACEHOLDER: &str = "{questionCount}";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DocumentError {
    #[error("malformed quiz document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("question {index} is invalid: {source}")]
    InvalidQuestion {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

/// Per-quiz behavior flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSettings {
    #[serde(default)]
    pub shuffle_questions: bool,
    #[serde(default)]
    pub shuffle_options: bool,
}

/// The document a quiz was written from, offered as a PDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDocument {
    pub pdf_filename: String,
}

/// One quiz as loaded from `quiz.json`. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDocument {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub settings: QuizSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_document: Option<SourceDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub questions: Vec<Question>,
}

/// Top-level shape of `quiz.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizFile {
    pub quiz: QuizDocument,
}

impl QuizDocument {
    /// Parse and validate a `quiz.json` payload (`{ "quiz": { ... } }`).
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::Json` if the payload does not match the schema and
    /// `DocumentError::InvalidQuestion` for the first question breaking its invariants.
    pub fn from_json(raw: &str) -> Result<Self, DocumentError> {
        let file: QuizFile = serde_json::from_str(raw)?;
        file.quiz.validate()?;
        Ok(file.quiz)
    }

    /// Validate every question.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::InvalidQuestion` for the first invalid question.
    pub fn validate(&self) -> Result<(), DocumentError> {
        for (index, question) in self.questions.iter().enumerate() {
            question
                .validate()
                .map_err(|source| DocumentError::InvalidQuestion { index, source })?;
        }
        Ok(())
    }

    /// Number of questions in the pool.
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Description with `{questionCount}` replaced by the pool size.
    #[must_use]
    pub fn display_description(&self) -> String {
        self.description
            .replace(QUESTION_COUNT_PLACEHOLDER, &self.question_count().to_string())
    }

    #[must_use]
    pub fn pdf_filename(&self) -> Option<&str> {
        self.source_document
            .as_ref()
            .map(|doc| doc.pdf_filename.as_str())
            .filter(|name| !name.trim().is_empty())
    }
}
