mod plan;
mod progress;
mod service;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::{SelectionBuilder, SessionPlan};
pub use progress::SessionProgress;
pub use service::{AdvanceOutcome, PresentedOption, PresentedQuestion, QuizSession, SessionPhase};
pub use view::SessionReport;
pub use workflow::{LoadedQuiz, QuizLoopService};
