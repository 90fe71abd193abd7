use async_trait::async_trait;
use quiz_core::model::{
    CONFIG_FILE_NAME, CatalogConfig, QuizDocument, QuizFile, QuizRef, is_http_location,
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

use crate::fs::FsSource;
use crate::http::HttpSource;

/// Errors surfaced by document sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    /// Non-success HTTP status, network failure, or missing file.
    #[error("fetch failed for {location}: {reason}")]
    FetchFailed { location: String, reason: String },

    /// The document was read but does not match the expected schema.
    #[error("malformed document {location}: {reason}")]
    Malformed { location: String, reason: String },

    #[error("timed out after {}ms fetching {location}", .after.as_millis())]
    Timeout { location: String, after: Duration },

    #[error("io error at {location}: {reason}")]
    Io { location: String, reason: String },

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StorageError {
    #[must_use]
    pub fn fetch_failed(location: impl Into<String>, reason: impl ToString) -> Self {
        Self::FetchFailed {
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    #[must_use]
    pub fn malformed(location: impl Into<String>, reason: impl ToString) -> Self {
        Self::Malformed {
            location: location.into(),
            reason: reason.to_string(),
        }
    }
}

/// Read-only access to the static documents of a catalog.
///
/// Paths are relative to the catalog root and use `/` as separator,
/// e.g. `config.json` or `sport/basketball/quiz.json`.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch the raw text of a document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::FetchFailed` if the document cannot be retrieved.
    async fn read(&self, path: &str) -> Result<String, StorageError>;

    /// Human readable location of `path`, used in errors and logs.
    fn locate(&self, path: &str) -> String;

    /// Fetch and parse `config.json`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::FetchFailed` or `StorageError::Malformed`.
    async fn load_config(&self) -> Result<CatalogConfig, StorageError> {
        let raw = self.read(CONFIG_FILE_NAME).await?;
        CatalogConfig::from_json(&raw)
            .map_err(|err| StorageError::malformed(self.locate(CONFIG_FILE_NAME), err))
    }

    /// Fetch, parse and validate `{category}/{quiz}/quiz.json`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::FetchFailed` or `StorageError::Malformed`.
    async fn load_quiz(&self, quiz: &QuizRef) -> Result<QuizDocument, StorageError> {
        let path = quiz.document_path();
        let raw = self.read(&path).await?;
        QuizDocument::from_json(&raw).map_err(|err| StorageError::malformed(self.locate(&path), err))
    }
}

#[derive(Clone, Debug)]
enum Entry {
    Document { body: String, delay: Option<Duration> },
    Failure { reason: String },
}

/// In-memory document source for tests and prototyping.
///
/// Entries can be delayed to simulate slow fetches or marked as failing.
#[derive(Clone, Default)]
pub struct InMemorySource {
    documents: Arc<Mutex<HashMap<String, Entry>>>,
    reads: Arc<AtomicUsize>,
}

impl InMemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the internal lock is poisoned.
    pub fn insert(&self, path: impl Into<String>, body: impl Into<String>) -> Result<(), StorageError> {
        self.put(
            path.into(),
            Entry::Document {
                body: body.into(),
                delay: None,
            },
        )
    }

    /// Store a raw document that is only returned after `delay`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the internal lock is poisoned.
    pub fn insert_delayed(
        &self,
        path: impl Into<String>,
        body: impl Into<String>,
        delay: Duration,
    ) -> Result<(), StorageError> {
        self.put(
            path.into(),
            Entry::Document {
                body: body.into(),
                delay: Some(delay),
            },
        )
    }

    /// Make every read of `path` fail with `reason`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the internal lock is poisoned.
    pub fn insert_failure(
        &self,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Result<(), StorageError> {
        self.put(
            path.into(),
            Entry::Failure {
                reason: reason.into(),
            },
        )
    }

    /// Store `config` as `config.json`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the config cannot be encoded.
    pub fn insert_config(&self, config: &CatalogConfig) -> Result<(), StorageError> {
        let body = config
            .to_pretty_json()
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.insert(CONFIG_FILE_NAME, body)
    }

    /// Store `document` under the quiz's `quiz.json` path.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the document cannot be encoded.
    pub fn insert_quiz(&self, quiz: &QuizRef, document: &QuizDocument) -> Result<(), StorageError> {
        let file = QuizFile {
            quiz: document.clone(),
        };
        let body = serde_json::to_string(&file)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.insert(quiz.document_path(), body)
    }

    /// Number of `read` calls served so far.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn put(&self, path: String, entry: Entry) -> Result<(), StorageError> {
        let mut guard = self.documents.lock().map_err(|e| StorageError::Io {
            location: path.clone(),
            reason: e.to_string(),
        })?;
        guard.insert(path, entry);
        Ok(())
    }
}

#[async_trait]
impl DocumentSource for InMemorySource {
    async fn read(&self, path: &str) -> Result<String, StorageError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let entry = {
            let guard = self.documents.lock().map_err(|e| StorageError::Io {
                location: self.locate(path),
                reason: e.to_string(),
            })?;
            guard.get(path).cloned()
        };

        match entry {
            Some(Entry::Document { body, delay }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                Ok(body)
            }
            Some(Entry::Failure { reason }) => Err(StorageError::fetch_failed(self.locate(path), reason)),
            None => Err(StorageError::fetch_failed(self.locate(path), "not found")),
        }
    }

    fn locate(&self, path: &str) -> String {
        format!("memory:{path}")
    }
}

/// Bundles the document source behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub documents: Arc<dyn DocumentSource>,
}

impl Storage {
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentSource>) -> Self {
        Self { documents }
    }

    /// Storage backed by a fresh in-memory source; the source handle is returned for seeding.
    #[must_use]
    pub fn in_memory() -> (Self, InMemorySource) {
        let source = InMemorySource::new();
        let documents: Arc<dyn DocumentSource> = Arc::new(source.clone());
        (Self { documents }, source)
    }

    /// Open a directory (`./quizzes`) or an HTTP base URL (`https://host/quiz/`).
    ///
    /// # Errors
    ///
    /// Returns `StorageError::FetchFailed` if an HTTP location is not a valid base URL.
    pub fn open(location: &str) -> Result<Self, StorageError> {
        let documents: Arc<dyn DocumentSource> = if is_http_location(location) {
            Arc::new(HttpSource::new(location)?)
        } else {
            Arc::new(FsSource::new(PathBuf::from(location)))
        };
        Ok(Self { documents })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Question, QuizSettings};

    fn document(title: &str) -> QuizDocument {
        QuizDocument {
            title: title.into(),
            description: String::new(),
            settings: QuizSettings::default(),
            source_document: None,
            language: None,
            version: None,
            questions: vec![Question {
                text: "Q".into(),
                options: vec!["A".into(), "B".into()],
                correct_index: 0,
                explanation: String::new(),
                source: None,
                tags: Vec::new(),
                difficulty: None,
            }],
        }
    }

    #[tokio::test]
    async fn round_trips_quiz_document() {
        let source = InMemorySource::new();
        let quiz = QuizRef::new("sport", "basketball");
        source.insert_quiz(&quiz, &document("Basketball")).unwrap();

        let loaded = source.load_quiz(&quiz).await.unwrap();
        assert_eq!(loaded.title, "Basketball");
        assert_eq!(source.reads(), 1);
    }

    #[tokio::test]
    async fn missing_document_is_fetch_failure() {
        let source = InMemorySource::new();
        let err = source.load_config().await.unwrap_err();
        assert!(matches!(err, StorageError::FetchFailed { .. }));
    }

    #[tokio::test]
    async fn schema_mismatch_is_malformed() {
        let source = InMemorySource::new();
        source
            .insert("sport/x/quiz.json", r#"{ "quiz": { "title": "no questions" } }"#)
            .unwrap();
        let err = source.load_quiz(&QuizRef::new("sport", "x")).await.unwrap_err();
        assert!(matches!(err, StorageError::Malformed { .. }));
    }

    #[tokio::test]
    async fn configured_failure_is_reported() {
        let source = InMemorySource::new();
        source.insert_failure(CONFIG_FILE_NAME, "HTTP 500").unwrap();
        let err = source.load_config().await.unwrap_err();
        assert!(err.to_string().contains("HTTP 500"));
    }

    #[test]
    fn open_picks_backend_from_location() {
        assert!(Storage::open("https://example.org/quiz/").is_ok());
        assert!(Storage::open("./quizzes").is_ok());
        assert!(Storage::open("http://").is_err());
    }
}
