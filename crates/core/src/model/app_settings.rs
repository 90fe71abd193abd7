use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Questions per session when nothing else is configured.
pub const DEFAULT_QUESTION_COUNT: usize = 10;
/// Upper bound for a single document fetch.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
const MAX_FETCH_TIMEOUT_SECS: u64 = 300;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppSettings {
    question_count: usize,
    fetch_timeout: Duration,
    source_location: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct AppSettingsDraft {
    pub question_count: Option<usize>,
    pub fetch_timeout_secs: Option<u64>,
    pub source_location: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AppSettingsError {
    #[error("question count must be > 0")]
    InvalidQuestionCount,
    #[error("fetch timeout must be between 1 and {MAX_FETCH_TIMEOUT_SECS} seconds")]
    InvalidFetchTimeout,
    #[error("invalid source URL: {0}")]
    InvalidSourceUrl(String),
}

impl AppSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and normalize the draft into usable settings.
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsError` if a value is out of range or an HTTP source
    /// location does not parse as a URL.
    pub fn validate(self) -> Result<AppSettings, AppSettingsError> {
        let question_count = self.question_count.unwrap_or(DEFAULT_QUESTION_COUNT);
        if question_count == 0 {
            return Err(AppSettingsError::InvalidQuestionCount);
        }

        let timeout_secs = self
            .fetch_timeout_secs
            .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS);
        if timeout_secs == 0 || timeout_secs > MAX_FETCH_TIMEOUT_SECS {
            return Err(AppSettingsError::InvalidFetchTimeout);
        }

        let source_location = normalize_optional(self.source_location);
        if let Some(location) = source_location.as_deref() {
            if is_http_location(location) && Url::parse(location).is_err() {
                return Err(AppSettingsError::InvalidSourceUrl(location.to_string()));
            }
        }

        Ok(AppSettings {
            question_count,
            fetch_timeout: Duration::from_secs(timeout_secs),
            source_location,
        })
    }
}

impl AppSettings {
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.question_count
    }

    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    /// Directory or base URL documents are read from; `None` means the working directory.
    #[must_use]
    pub fn source_location(&self) -> Option<&str> {
        self.source_location.as_deref()
    }

    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            question_count: DEFAULT_QUESTION_COUNT,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            source_location: None,
        }
    }
}

/// True for `http://` and `https://` locations.
#[must_use]
pub fn is_http_location(location: &str) -> bool {
    let lower = location.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_draft_uses_defaults() {
        let settings = AppSettingsDraft::new().validate().unwrap();
        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.question_count(), 10);
    }

    #[test]
    fn zero_question_count_is_rejected() {
        let draft = AppSettingsDraft {
            question_count: Some(0),
            ..AppSettingsDraft::default()
        };
        assert_eq!(draft.validate(), Err(AppSettingsError::InvalidQuestionCount));
    }

    #[test]
    fn timeout_bounds_are_enforced() {
        for secs in [0, 301] {
            let draft = AppSettingsDraft {
                fetch_timeout_secs: Some(secs),
                ..AppSettingsDraft::default()
            };
            assert_eq!(draft.validate(), Err(AppSettingsError::InvalidFetchTimeout));
        }
    }

    #[test]
    fn blank_location_is_normalized_away() {
        let draft = AppSettingsDraft {
            source_location: Some("   ".into()),
            ..AppSettingsDraft::default()
        };
        assert_eq!(draft.validate().unwrap().source_location(), None);
    }

    #[test]
    fn broken_http_location_is_rejected() {
        let draft = AppSettingsDraft {
            source_location: Some("http://".into()),
            ..AppSettingsDraft::default()
        };
        assert!(matches!(
            draft.validate(),
            Err(AppSettingsError::InvalidSourceUrl(_))
        ));
    }

    #[test]
    fn directory_location_is_kept() {
        let draft = AppSettingsDraft {
            source_location: Some(" ./quizzes ".into()),
            ..AppSettingsDraft::default()
        };
        assert_eq!(draft.validate().unwrap().source_location(), Some("./quizzes"));
    }
}
