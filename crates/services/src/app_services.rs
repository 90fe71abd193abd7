use std::sync::Arc;

use quiz_core::model::{AppSettings, AppSettingsDraft, is_http_location};
use storage::{InMemorySource, Storage};

use crate::Clock;
use crate::catalog::CatalogService;
use crate::config_sync::ConfigSyncService;
use crate::error::AppServicesError;
use crate::sessions::QuizLoopService;

/// Catalog location used when the settings name none.
pub const DEFAULT_LOCATION: &str = ".";

/// Assembles app-facing services over one document source.
#[derive(Clone)]
pub struct AppServices {
    settings: AppSettings,
    location: String,
    catalog: Arc<CatalogService>,
    quiz_loop: Arc<QuizLoopService>,
}

impl AppServices {
    /// Validate `draft` and open its source location.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the settings are invalid or the location
    /// cannot be opened.
    pub fn from_draft(draft: AppSettingsDraft, clock: Clock) -> Result<Self, AppServicesError> {
        Self::open(draft.validate()?, clock)
    }

    /// Build services over the directory or HTTP base URL named in `settings`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Storage` if an HTTP location is not a valid base URL.
    pub fn open(settings: AppSettings, clock: Clock) -> Result<Self, AppServicesError> {
        let location = settings
            .source_location()
            .unwrap_or(DEFAULT_LOCATION)
            .to_string();
        let storage = Storage::open(&location)?;
        Ok(Self::with_storage(storage, location, settings, clock))
    }

    /// Services over a fresh in-memory source; the source handle is returned for seeding.
    #[must_use]
    pub fn in_memory(settings: AppSettings, clock: Clock) -> (Self, InMemorySource) {
        let (storage, source) = Storage::in_memory();
        let services = Self::with_storage(storage, "memory:".to_string(), settings, clock);
        (services, source)
    }

    fn with_storage(storage: Storage, location: String, settings: AppSettings, clock: Clock) -> Self {
        let catalog = Arc::new(CatalogService::new(
            Arc::clone(&storage.documents),
            settings.fetch_timeout(),
        ));
        let quiz_loop = Arc::new(QuizLoopService::new(
            clock,
            Arc::clone(&storage.documents),
            settings.question_count(),
            settings.fetch_timeout(),
        ));
        Self {
            settings,
            location,
            catalog,
            quiz_loop,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    /// Config sync for local catalogs; `None` for HTTP and in-memory sources.
    #[must_use]
    pub fn config_sync(&self) -> Option<ConfigSyncService> {
        if is_http_location(&self.location) || self.location.starts_with("memory:") {
            return None;
        }
        Some(ConfigSyncService::new(&self.location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    #[test]
    fn invalid_draft_is_rejected() {
        let draft = AppSettingsDraft {
            question_count: Some(0),
            ..AppSettingsDraft::default()
        };
        let err = AppServices::from_draft(draft, Clock::fixed(fixed_now())).err();
        assert!(matches!(err, Some(AppServicesError::Settings(_))));
    }

    #[test]
    fn config_sync_only_for_directories() {
        let clock = Clock::fixed(fixed_now());
        let local = AppServices::open(AppSettings::default(), clock).unwrap();
        assert_eq!(local.location(), DEFAULT_LOCATION);
        assert!(local.config_sync().is_some());

        let draft = AppSettingsDraft {
            source_location: Some("https://example.org/quiz/".into()),
            ..AppSettingsDraft::default()
        };
        let remote = AppServices::from_draft(draft, clock).unwrap();
        assert!(remote.config_sync().is_none());

        let (memory, _source) = AppServices::in_memory(AppSettings::default(), clock);
        assert!(memory.config_sync().is_none());
        assert_eq!(memory.quiz_loop().question_count(), 10);
    }
}
