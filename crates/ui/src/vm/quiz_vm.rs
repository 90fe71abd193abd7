use std::sync::Arc;

use quiz_core::model::QuizRef;
use services::{AdvanceOutcome, LoadedQuiz, PresentedQuestion, QuizLoopService, QuizSession};

use crate::state::ViewError;
use crate::vm::feedback_vm::FeedbackVm;
use crate::vm::keys::{KeyAction, KeyContext, KeyInput, Screen, map_key};
use crate::vm::results_vm::ResultsVm;
use crate::vm::text_fmt::option_letter;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartVm {
    pub title: String,
    pub description: String,
    pub pool_count: usize,
    pub question_count: usize,
    pub pdf_filename: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionState {
    Open,
    /// Answered; neither picked nor correct.
    Disabled,
    Correct,
    Incorrect,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub letter: char,
    pub text: String,
    pub state: OptionState,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub number: usize,
    pub total: usize,
    pub text: String,
    pub options: Vec<OptionVm>,
    pub score: u32,
    pub progress_percent: usize,
}

impl QuestionVm {
    fn from_presented(presented: &PresentedQuestion, score: u32) -> Self {
        let selected = presented.answer.as_ref().map(|a| a.selected_index);
        let correct = presented.correct_display_index();
        let options = presented
            .options
            .iter()
            .map(|option| {
                let state = match selected {
                    None => OptionState::Open,
                    Some(_) if Some(option.display_index) == correct => OptionState::Correct,
                    Some(picked) if picked == option.display_index => OptionState::Incorrect,
                    Some(_) => OptionState::Disabled,
                };
                OptionVm {
                    letter: option_letter(option.display_index),
                    text: option.text.clone(),
                    state,
                }
            })
            .collect();

        Self {
            number: presented.number(),
            total: presented.total,
            text: presented.question.text.clone(),
            options,
            score,
            progress_percent: presented.index * 100 / presented.total.max(1),
        }
    }
}

/// State of the single-quiz page: start screen, question flow, results, PDF viewer.
pub struct QuizPageVm {
    quiz_loop: Arc<QuizLoopService>,
    quiz: LoadedQuiz,
    screen: Screen,
    session: Option<QuizSession>,
}

impl QuizPageVm {
    #[must_use]
    pub fn new(quiz_loop: Arc<QuizLoopService>, quiz: LoadedQuiz) -> Self {
        Self {
            quiz_loop,
            quiz,
            screen: Screen::Start,
            session: None,
        }
    }

    /// # Errors
    ///
    /// Returns `ViewError::LoadFailed` if the quiz cannot be fetched or parsed.
    pub async fn load(quiz_loop: Arc<QuizLoopService>, reference: &QuizRef) -> Result<Self, ViewError> {
        let quiz = quiz_loop
            .load_quiz(reference)
            .await
            .map_err(|err| ViewError::from(&err))?;
        Ok(Self::new(quiz_loop, quiz))
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn start_vm(&self) -> StartVm {
        let document = &self.quiz.document;
        StartVm {
            title: document.title.clone(),
            description: self.quiz.description(),
            pool_count: document.question_count(),
            question_count: self.quiz_loop.question_count().min(document.question_count()),
            pdf_filename: document.pdf_filename().map(str::to_string),
        }
    }

    #[must_use]
    pub fn question_vm(&self) -> Option<QuestionVm> {
        let session = self.session.as_ref()?;
        let presented = session.present_question().ok()?;
        Some(QuestionVm::from_presented(&presented, session.score()))
    }

    /// Feedback for the current question once it has been answered.
    #[must_use]
    pub fn feedback(&self) -> Option<FeedbackVm> {
        let presented = self.session.as_ref()?.present_question().ok()?;
        let record = presented.answer.as_ref()?;
        Some(FeedbackVm::new(record, presented.is_last()))
    }

    #[must_use]
    pub fn results(&self) -> Option<ResultsVm> {
        let report = self.session.as_ref()?.results().ok()?;
        Some(ResultsVm::from(&report))
    }

    /// Start a fresh session; any previous one is discarded.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::EmptyQuiz` if the quiz has no questions.
    pub fn start(&mut self) -> Result<(), ViewError> {
        let session = self
            .quiz_loop
            .start_session(&self.quiz)
            .map_err(|err| ViewError::from(&err))?;
        self.session = Some(session);
        self.screen = Screen::Quiz;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if there is no active question or it was already answered.
    pub fn select_option(&mut self, display_index: usize) -> Result<(), ViewError> {
        let session = self.session.as_mut().ok_or(ViewError::Unknown)?;
        session
            .submit_answer(display_index)
            .map_err(|err| ViewError::from(&err))?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the current question has not been answered.
    pub fn next(&mut self) -> Result<(), ViewError> {
        let session = self.session.as_mut().ok_or(ViewError::Unknown)?;
        match session.advance().map_err(|err| ViewError::from(&err))? {
            AdvanceOutcome::Next { .. } => {}
            AdvanceOutcome::Completed => self.screen = Screen::Results,
        }
        Ok(())
    }

    pub fn back_to_start(&mut self) {
        self.session = None;
        self.screen = Screen::Start;
    }

    /// Switch to the PDF viewer; `false` when the quiz has no PDF.
    pub fn show_pdf(&mut self) -> bool {
        if self.quiz.document.pdf_filename().is_none() {
            return false;
        }
        self.screen = Screen::Pdf;
        true
    }

    pub fn close_pdf(&mut self) {
        if self.screen == Screen::Pdf {
            self.screen = Screen::Start;
        }
    }

    #[must_use]
    pub fn key_context(&self) -> KeyContext {
        let presented = self
            .session
            .as_ref()
            .filter(|_| self.screen == Screen::Quiz)
            .and_then(|session| session.present_question().ok());
        KeyContext {
            screen: self.screen,
            option_count: presented.as_ref().map_or(0, |p| p.options.len()),
            answered: presented.as_ref().is_some_and(PresentedQuestion::is_answered),
        }
    }

    /// Apply a key press; returns the action taken, if any.
    ///
    /// # Errors
    ///
    /// Returns `ViewError` if the triggered action fails.
    pub fn handle_key(&mut self, key: KeyInput) -> Result<Option<KeyAction>, ViewError> {
        let Some(action) = map_key(self.key_context(), key) else {
            return Ok(None);
        };
        match action {
            KeyAction::Start => self.start()?,
            KeyAction::SelectOption(index) => self.select_option(index)?,
            KeyAction::Next => self.next()?,
            KeyAction::BackToStart => self.back_to_start(),
        }
        Ok(Some(action))
    }
}
