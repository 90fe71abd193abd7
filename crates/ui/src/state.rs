use services::{CatalogError, SessionError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    /// The quiz document has no questions.
    EmptyQuiz,
    /// A document could not be fetched or parsed.
    LoadFailed,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::EmptyQuiz => "Dieses Quiz enthält keine Fragen.",
            Self::LoadFailed => "Fehler beim Laden des Quiz. Bitte versuchen Sie es erneut.",
            Self::Unknown => "Etwas ist schiefgelaufen. Bitte versuchen Sie es erneut.",
        }
    }
}

impl From<&SessionError> for ViewError {
    fn from(err: &SessionError) -> Self {
        match err {
            SessionError::Empty => Self::EmptyQuiz,
            SessionError::Storage(_) | SessionError::InvalidDocument(_) => Self::LoadFailed,
            _ => Self::Unknown,
        }
    }
}

impl From<&CatalogError> for ViewError {
    fn from(_: &CatalogError) -> Self {
        Self::LoadFailed
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_result<T, E>(result: Result<T, E>) -> ViewState<T>
where
    for<'a> ViewError: From<&'a E>,
{
    match result {
        Ok(value) => ViewState::Ready(value),
        Err(err) => ViewState::Error(ViewError::from(&err)),
    }
}
