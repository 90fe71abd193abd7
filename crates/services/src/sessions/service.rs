use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use quiz_core::Clock;
use quiz_core::model::{
    AnswerRecord, Question, QuizDocument, QuizResults, QuizSettings, SessionId,
};

use super::plan::{SelectionBuilder, option_order};
use super::progress::SessionProgress;
use super::view::SessionReport;
use crate::error::SessionError;

//
// ─── PRESENTATION ──────────────────────────────────────────────────────────────
//

/// Where the session stands with respect to the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    AnswerPending,
    Answered,
    Completed,
}

/// One option as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentedOption {
    pub display_index: usize,
    pub original_index: usize,
    pub text: String,
}

/// The current question in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentedQuestion {
    /// 0-based index within the session.
    pub index: usize,
    pub total: usize,
    pub question: Arc<Question>,
    pub options: Vec<PresentedOption>,
    /// Set once the question has been answered.
    pub answer: Option<AnswerRecord>,
}

impl PresentedQuestion {
    #[must_use]
    pub fn number(&self) -> usize {
        self.index + 1
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.total
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.answer.is_some()
    }

    /// Display index of the correct option.
    #[must_use]
    pub fn correct_display_index(&self) -> Option<usize> {
        self.options
            .iter()
            .find(|option| option.original_index == self.question.correct_index)
            .map(|option| option.display_index)
    }
}

/// Result of `QuizSession::advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Next { index: usize },
    Completed,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One attempt at a quiz.
///
/// Steps through the selected questions sequentially: each question is answered
/// exactly once, then the session advances until it completes. Rejected calls
/// never change state.
pub struct QuizSession {
    id: SessionId,
    title: String,
    settings: QuizSettings,
    questions: Vec<Arc<Question>>,
    pool_size: usize,
    option_order: Vec<usize>,
    current: usize,
    score: u32,
    answers: Vec<AnswerRecord>,
    phase: SessionPhase,
    rng: StdRng,
    clock: Clock,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Start a session over up to `requested` questions of `document`.
    ///
    /// # Errors
    ///
    /// See [`QuizSession::start_with_rng`].
    pub fn start(
        document: &QuizDocument,
        requested: usize,
        clock: Clock,
    ) -> Result<Self, SessionError> {
        Self::start_with_rng(document, requested, clock, StdRng::from_os_rng())
    }

    /// Start a session drawing every shuffle from `rng`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the document has no questions and
    /// `SessionError::InvalidDocument` if a question breaks its invariants.
    pub fn start_with_rng(
        document: &QuizDocument,
        requested: usize,
        clock: Clock,
        mut rng: StdRng,
    ) -> Result<Self, SessionError> {
        if document.questions.is_empty() {
            return Err(SessionError::Empty);
        }
        document.validate()?;

        let plan = SelectionBuilder::new(document, requested).build(&mut rng);
        if plan.is_empty() {
            return Err(SessionError::Empty);
        }

        let settings = document.settings;
        let option_order = option_order(&plan.questions[0], settings.shuffle_options, &mut rng);
        let id = SessionId::new();
        let started_at = clock.now();

        debug!(
            session_id = %id,
            quiz = %document.title,
            selected = plan.total(),
            pool = plan.pool_size,
            "session started"
        );

        Ok(Self {
            id,
            title: document.title.clone(),
            settings,
            questions: plan.questions,
            pool_size: plan.pool_size,
            option_order,
            current: 0,
            score: 0,
            answers: Vec::new(),
            phase: SessionPhase::AnswerPending,
            rng,
            clock,
            started_at,
            completed_at: None,
        })
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == SessionPhase::Completed
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Size of the question pool the selection was drawn from.
    #[must_use]
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    #[must_use]
    pub fn questions(&self) -> &[Arc<Question>] {
        &self.questions
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            position: self.current + 1,
            total: self.total(),
            answered: self.answers.len(),
            score: self.score,
            is_complete: self.is_complete(),
        }
    }

    /// The current question with its options in display order.
    ///
    /// The order is fixed when the question becomes current, so repeated calls
    /// return the same layout.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SessionInactive` once the session is complete.
    pub fn present_question(&self) -> Result<PresentedQuestion, SessionError> {
        if self.is_complete() {
            return Err(SessionError::SessionInactive);
        }
        let question = self.current_question()?;
        let options = self
            .option_order
            .iter()
            .enumerate()
            .map(|(display_index, &original_index)| PresentedOption {
                display_index,
                original_index,
                text: question.options[original_index].clone(),
            })
            .collect();

        let answer = match self.phase {
            SessionPhase::Answered => self.answers.last().cloned(),
            _ => None,
        };

        Ok(PresentedQuestion {
            index: self.current,
            total: self.total(),
            question: Arc::clone(question),
            options,
            answer,
        })
    }

    /// Record the answer at `display_index` for the current question.
    ///
    /// # Errors
    ///
    /// - `SessionError::SessionInactive` once the session is complete
    /// - `SessionError::AlreadyAnswered` if the current question has a record
    /// - `SessionError::InvalidOption` if `display_index` is out of range
    pub fn submit_answer(&mut self, display_index: usize) -> Result<&AnswerRecord, SessionError> {
        match self.phase {
            SessionPhase::Completed => return Err(SessionError::SessionInactive),
            SessionPhase::Answered => return Err(SessionError::AlreadyAnswered),
            SessionPhase::AnswerPending => {}
        }

        let question = Arc::clone(self.current_question()?);
        let len = self.option_order.len();
        let Some(&selected_original) = self.option_order.get(display_index) else {
            return Err(SessionError::InvalidOption {
                index: display_index,
                len,
            });
        };
        let correct_display = self
            .option_order
            .iter()
            .position(|&original| original == question.correct_index)
            .unwrap_or(question.correct_index);

        let is_correct = selected_original == question.correct_index;
        let record = AnswerRecord {
            selected_index: display_index,
            selected_text: question.options[selected_original].clone(),
            correct_index: correct_display,
            correct_text: question.options[question.correct_index].clone(),
            is_correct,
            question,
        };

        if is_correct {
            self.score += 1;
        }
        self.answers.push(record);
        self.phase = SessionPhase::Answered;

        debug!(
            session_id = %self.id,
            question = self.current,
            selected = display_index,
            is_correct,
            score = self.score,
            "answer recorded"
        );

        self.answers.last().ok_or(SessionError::SessionInactive)
    }

    /// Move past the answered question, completing the session after the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SessionInactive` before the current question is
    /// answered or after completion.
    pub fn advance(&mut self) -> Result<AdvanceOutcome, SessionError> {
        if self.phase != SessionPhase::Answered {
            return Err(SessionError::SessionInactive);
        }

        if self.current + 1 < self.questions.len() {
            self.current += 1;
            let question = Arc::clone(&self.questions[self.current]);
            self.option_order = option_order(&question, self.settings.shuffle_options, &mut self.rng);
            self.phase = SessionPhase::AnswerPending;
            return Ok(AdvanceOutcome::Next {
                index: self.current,
            });
        }

        let completed_at = self.clock.now();
        self.completed_at = Some(completed_at);
        self.phase = SessionPhase::Completed;

        info!(
            session_id = %self.id,
            quiz = %self.title,
            score = self.score,
            total = self.total(),
            "session completed"
        );

        Ok(AdvanceOutcome::Completed)
    }

    /// Final score, tier and answer list.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotCompleted` until the last question was answered
    /// and advanced past.
    pub fn results(&self) -> Result<SessionReport, SessionError> {
        let Some(completed_at) = self.completed_at else {
            return Err(SessionError::NotCompleted);
        };
        let total = u32::try_from(self.total()).unwrap_or(u32::MAX);
        Ok(SessionReport {
            session_id: self.id,
            title: self.title.clone(),
            results: QuizResults::compute(self.score, total),
            answers: self.answers.clone(),
            started_at: self.started_at,
            completed_at,
        })
    }

    fn current_question(&self) -> Result<&Arc<Question>, SessionError> {
        self.questions
            .get(self.current)
            .ok_or(SessionError::SessionInactive)
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("phase", &self.phase)
            .field("score", &self.score)
            .field("answers_len", &self.answers.len())
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{DocumentError, ScoreTier};
    use quiz_core::time::fixed_now;

    fn question(text: &str, correct_index: usize) -> Question {
        Question {
            text: text.into(),
            options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct_index,
            explanation: format!("{text} explained"),
            source: None,
            tags: Vec::new(),
            difficulty: None,
        }
    }

    fn document(count: usize, shuffle_questions: bool, shuffle_options: bool) -> QuizDocument {
        QuizDocument {
            title: "Test".into(),
            description: String::new(),
            settings: QuizSettings {
                shuffle_questions,
                shuffle_options,
            },
            source_document: None,
            language: None,
            version: None,
            questions: (0..count).map(|i| question(&format!("Q{i}"), i % 4)).collect(),
        }
    }

    fn start(doc: &QuizDocument, requested: usize, seed: u64) -> QuizSession {
        QuizSession::start_with_rng(
            doc,
            requested,
            Clock::fixed(fixed_now()),
            StdRng::seed_from_u64(seed),
        )
        .unwrap()
    }

    fn answer_correctly(session: &mut QuizSession) {
        let presented = session.present_question().unwrap();
        let correct = presented.correct_display_index().unwrap();
        session.submit_answer(correct).unwrap();
    }

    fn answer_wrong(session: &mut QuizSession) {
        let presented = session.present_question().unwrap();
        let correct = presented.correct_display_index().unwrap();
        session.submit_answer((correct + 1) % presented.options.len()).unwrap();
    }

    #[test]
    fn empty_document_cannot_start() {
        let doc = document(0, false, false);
        let err = QuizSession::start(&doc, 10, Clock::fixed(fixed_now())).unwrap_err();
        assert!(matches!(err, SessionError::Empty));
    }

    #[test]
    fn out_of_range_correct_index_is_rejected_at_start() {
        let mut doc = document(2, false, false);
        doc.questions[1].correct_index = 7;
        let err = QuizSession::start(&doc, 10, Clock::fixed(fixed_now())).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidDocument(DocumentError::InvalidQuestion { index: 1, .. })
        ));
    }

    #[test]
    fn selection_is_clamped_to_pool() {
        let doc = document(3, true, true);
        let session = start(&doc, 10, 1);
        assert_eq!(session.total(), 3);
        assert_eq!(session.pool_size(), 3);
        assert_eq!(session.phase(), SessionPhase::AnswerPending);
        assert_eq!(session.progress().position, 1);
    }

    #[test]
    fn presentation_is_stable_until_advance() {
        let doc = document(4, false, true);
        let session = start(&doc, 4, 5);
        let first = session.present_question().unwrap();
        let second = session.present_question().unwrap();
        assert_eq!(first, second);

        let mut originals: Vec<_> = first.options.iter().map(|o| o.original_index).collect();
        originals.sort_unstable();
        assert_eq!(originals, [0, 1, 2, 3]);
        for option in &first.options {
            assert_eq!(option.text, first.question.options[option.original_index]);
        }
    }

    #[test]
    fn correctness_uses_the_original_index() {
        let doc = document(1, false, true);
        for seed in 0..8 {
            let mut session = start(&doc, 1, seed);
            let presented = session.present_question().unwrap();
            let correct = presented.correct_display_index().unwrap();
            let record = session.submit_answer(correct).unwrap().clone();
            assert!(record.is_correct);
            assert_eq!(record.correct_index, correct);
            assert_eq!(record.selected_text, record.correct_text);
            assert_eq!(record.correct_text, "A");
        }
    }

    #[test]
    fn double_submit_is_rejected_without_state_change() {
        let doc = document(2, false, false);
        let mut session = start(&doc, 2, 0);
        answer_correctly(&mut session);

        let err = session.submit_answer(1).unwrap_err();
        assert!(matches!(err, SessionError::AlreadyAnswered));
        assert_eq!(session.score(), 1);
        assert_eq!(session.answers().len(), 1);
    }

    #[test]
    fn out_of_range_option_is_rejected() {
        let doc = document(1, false, false);
        let mut session = start(&doc, 1, 0);
        let err = session.submit_answer(4).unwrap_err();
        assert!(matches!(err, SessionError::InvalidOption { index: 4, len: 4 }));
        assert!(session.answers().is_empty());
        assert_eq!(session.phase(), SessionPhase::AnswerPending);
    }

    #[test]
    fn advance_requires_an_answer() {
        let doc = document(2, false, false);
        let mut session = start(&doc, 2, 0);
        let err = session.advance().unwrap_err();
        assert!(matches!(err, SessionError::SessionInactive));
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn session_advances_and_completes_once() {
        let doc = document(2, false, false);
        let mut session = start(&doc, 2, 0);

        answer_correctly(&mut session);
        assert!(session.present_question().unwrap().is_answered());
        assert_eq!(session.advance().unwrap(), AdvanceOutcome::Next { index: 1 });
        assert!(matches!(session.results(), Err(SessionError::NotCompleted)));

        answer_wrong(&mut session);
        assert!(session.present_question().unwrap().is_last());
        assert_eq!(session.advance().unwrap(), AdvanceOutcome::Completed);
        assert!(session.is_complete());
        assert_eq!(session.completed_at(), Some(fixed_now()));

        assert!(matches!(session.advance(), Err(SessionError::SessionInactive)));
        assert!(matches!(session.submit_answer(0), Err(SessionError::SessionInactive)));
        assert!(matches!(session.present_question(), Err(SessionError::SessionInactive)));

        let report = session.results().unwrap();
        assert_eq!(report.results.score(), 1);
        assert_eq!(report.results.total(), 2);
        assert_eq!(report.results.percentage(), 50);
        assert_eq!(report.results.tier(), ScoreTier::Fair);
        assert_eq!(report.answers.len(), 2);
        assert_eq!(report.correct_count(), 1);
    }

    #[test]
    fn score_matches_correct_records() {
        let doc = document(10, true, true);
        let mut session = start(&doc, 10, 42);
        for i in 0..10 {
            if i < 7 {
                answer_correctly(&mut session);
            } else {
                answer_wrong(&mut session);
            }
            session.advance().unwrap();
        }
        let report = session.results().unwrap();
        assert_eq!(report.results.percentage(), 70);
        assert_eq!(report.results.tier(), ScoreTier::Good);
        assert_eq!(
            report.answers.iter().filter(|a| a.is_correct).count(),
            session.score() as usize
        );
    }

    #[test]
    fn progress_tracks_position_and_score() {
        let doc = document(3, false, false);
        let mut session = start(&doc, 3, 0);
        answer_correctly(&mut session);
        session.advance().unwrap();

        let progress = session.progress();
        assert_eq!(progress.position, 2);
        assert_eq!(progress.total, 3);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.score, 1);
        assert!(!progress.is_complete);
    }
}
