#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog;
pub mod config_sync;
pub mod error;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use app_services::AppServices;
pub use catalog::{Catalog, CatalogService};
pub use config_sync::{ConfigSyncService, Inconsistency, SyncOutcome, SyncReport};
pub use error::{AppServicesError, CatalogError, ConfigSyncError, QuizLoadFailure, SessionError};

pub use sessions::{
    AdvanceOutcome, LoadedQuiz, PresentedOption, PresentedQuestion, QuizLoopService, QuizSession,
    SessionPhase, SessionProgress, SessionReport,
};
