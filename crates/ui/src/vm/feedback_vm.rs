use quiz_core::model::{AnswerRecord, Question};

use crate::vm::text_fmt::{difficulty_label, format_source, format_tags};

pub const CORRECT_STATUS: &str = "✅ Richtig!";
pub const INCORRECT_STATUS: &str = "❌ Leider falsch!";
pub const NEXT_QUESTION_LABEL: &str = "Nächste Frage";
pub const SHOW_RESULTS_LABEL: &str = "Ergebnis anzeigen";

/// Feedback panel shown after an answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackVm {
    pub is_correct: bool,
    pub status: &'static str,
    pub correct_text: String,
    pub explanation: String,
    pub source: Option<String>,
    pub tags: Vec<String>,
    pub tags_line: Option<String>,
    pub difficulty: Option<String>,
    pub next_label: &'static str,
}

impl FeedbackVm {
    #[must_use]
    pub fn new(record: &AnswerRecord, is_last: bool) -> Self {
        let question: &Question = &record.question;
        Self {
            is_correct: record.is_correct,
            status: if record.is_correct {
                CORRECT_STATUS
            } else {
                INCORRECT_STATUS
            },
            correct_text: if record.correct_text.is_empty() {
                "-".to_string()
            } else {
                record.correct_text.clone()
            },
            explanation: question.explanation.clone(),
            source: format_source(question.source.as_ref()),
            tags: question.tags.clone(),
            tags_line: format_tags(&question.tags),
            difficulty: difficulty_label(question.difficulty.as_ref()),
            next_label: if is_last {
                SHOW_RESULTS_LABEL
            } else {
                NEXT_QUESTION_LABEL
            },
        }
    }
}
