use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use quiz_core::model::{QuizDocument, QuizRef};
use storage::{DocumentSource, StorageError};

use super::service::QuizSession;
use crate::Clock;
use crate::error::SessionError;

/// A quiz document loaded for play, kept so sessions can be restarted without refetching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedQuiz {
    pub reference: QuizRef,
    pub document: Arc<QuizDocument>,
}

impl LoadedQuiz {
    #[must_use]
    pub fn title(&self) -> &str {
        &self.document.title
    }

    /// Description with `{questionCount}` filled in.
    #[must_use]
    pub fn description(&self) -> String {
        self.document.display_description()
    }
}

/// Orchestrates quiz loading and session start.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    documents: Arc<dyn DocumentSource>,
    question_count: usize,
    fetch_timeout: Duration,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        documents: Arc<dyn DocumentSource>,
        question_count: usize,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            clock,
            documents,
            question_count,
            fetch_timeout,
        }
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.question_count
    }

    /// Fetch and validate the quiz document.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the fetch fails, times out, or the
    /// document is malformed.
    pub async fn load_quiz(&self, reference: &QuizRef) -> Result<LoadedQuiz, SessionError> {
        let fetch = self.documents.load_quiz(reference);
        let document = tokio::time::timeout(self.fetch_timeout, fetch)
            .await
            .map_err(|_| StorageError::Timeout {
                location: self.documents.locate(&reference.document_path()),
                after: self.fetch_timeout,
            })??;

        info!(
            category = %reference.category,
            quiz = %reference.quiz_name,
            questions = document.question_count(),
            "quiz loaded"
        );

        Ok(LoadedQuiz {
            reference: reference.clone(),
            document: Arc::new(document),
        })
    }

    /// Start a fresh session; calling again restarts with a new selection.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the quiz has no questions.
    pub fn start_session(&self, quiz: &LoadedQuiz) -> Result<QuizSession, SessionError> {
        QuizSession::start(&quiz.document, self.question_count, self.clock)
    }

    /// Start a fresh session with a caller-provided random source.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the quiz has no questions.
    pub fn start_session_with_rng(
        &self,
        quiz: &LoadedQuiz,
        rng: StdRng,
    ) -> Result<QuizSession, SessionError> {
        QuizSession::start_with_rng(&quiz.document, self.question_count, self.clock, rng)
    }
}
