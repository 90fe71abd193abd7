use std::sync::Arc;

use crate::model::question::Question;

/// Outcome of answering one question in a session. Append-only.
///
/// Indices refer to the display order the question was presented in; the texts are
/// resolved at submission time so the record stays readable whatever that order was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub question: Arc<Question>,
    pub selected_index: usize,
    pub selected_text: String,
    pub correct_index: usize,
    pub correct_text: String,
    pub is_correct: bool,
}
