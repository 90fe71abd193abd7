mod answer;
mod app_settings;
mod catalog;
mod ids;
mod question;
mod quiz;
mod results;

pub use answer::AnswerRecord;
pub use app_settings::{
    AppSettings, AppSettingsDraft, AppSettingsError, DEFAULT_FETCH_TIMEOUT_SECS,
    DEFAULT_QUESTION_COUNT, is_http_location,
};
pub use catalog::{
    AppInfo, CONFIG_FILE_NAME, CatalogConfig, CategoryConfig, CategoryEntry, QUIZ_FILE_NAME,
    QuizRef, QuizSummary,
};
pub use ids::{ParseIdError, SessionId};
pub use question::{Difficulty, Question, QuestionError, QuestionSource};
pub use quiz::{
    DocumentError, QUESTION_COUNT_PLACEHOLDER, QuizDocument, QuizFile, QuizSettings,
    SourceDocument,
};
pub use results::{QuizResults, ScoreTier};
