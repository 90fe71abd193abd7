//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{AppSettingsError, DocumentError};
use storage::StorageError;

/// Errors emitted by quiz sessions.
///
/// Every rejected call leaves the session untouched.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("quiz has no questions")]
    Empty,
    #[error("current question was already answered")]
    AlreadyAnswered,
    #[error("session is not accepting this action")]
    SessionInactive,
    #[error("option {index} does not exist ({len} options)")]
    InvalidOption { index: usize, len: usize },
    #[error("results are only available after the last question")]
    NotCompleted,
    #[error(transparent)]
    InvalidDocument(#[from] DocumentError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalog config could not be loaded: {0}")]
    ConfigLoadFailed(#[source] StorageError),
}

/// Errors emitted by `ConfigSyncService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigSyncError {
    #[error("{count} inconsistencies remain after rewriting config.json")]
    StillInconsistent { count: usize },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Settings(#[from] AppSettingsError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A quiz the catalog had to skip. Recorded, never fatal.
#[derive(Debug, Error)]
#[error("quiz {category}/{quiz_name} could not be loaded: {error}")]
pub struct QuizLoadFailure {
    pub category: String,
    pub quiz_name: String,
    #[source]
    pub error: StorageError,
}
