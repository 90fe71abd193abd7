mod catalog_vm;
mod feedback_vm;
mod keys;
mod quiz_vm;
mod results_vm;
mod text_fmt;

pub use catalog_vm::{CatalogVm, CategoryVm, DEFAULT_TITLE, QuizCardVm, map_quiz_cards};
pub use feedback_vm::{
    CORRECT_STATUS, FeedbackVm, INCORRECT_STATUS, NEXT_QUESTION_LABEL, SHOW_RESULTS_LABEL,
};
pub use keys::{KeyAction, KeyContext, KeyInput, Screen, map_key};
pub use quiz_vm::{OptionState, OptionVm, QuestionVm, QuizPageVm, StartVm};
pub use results_vm::{ResultItemVm, ResultsVm};
pub use text_fmt::{format_datetime, format_duration, format_source, truncate_text};
