use chrono::{DateTime, Utc};

use quiz_core::model::{AnswerRecord, QuizResults, SessionId};
use quiz_core::time::elapsed_secs;

/// Presentation-agnostic report of a completed session.
///
/// Carries the raw results and the answer list; formatting (tier message
/// styling, per-answer layout) is left to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub session_id: SessionId,
    pub title: String,
    pub results: QuizResults,
    pub answers: Vec<AnswerRecord>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl SessionReport {
    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|answer| answer.is_correct).count()
    }

    #[must_use]
    pub fn incorrect_count(&self) -> usize {
        self.answers.len() - self.correct_count()
    }

    /// Whole seconds between start and completion.
    #[must_use]
    pub fn duration_secs(&self) -> u64 {
        elapsed_secs(self.started_at, self.completed_at)
    }
}
