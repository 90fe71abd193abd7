use thiserror::Error;

use crate::model::{AppSettingsError, DocumentError, QuestionError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Settings(#[from] AppSettingsError),
}
