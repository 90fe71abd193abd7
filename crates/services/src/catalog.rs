use indexmap::IndexMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{info, warn};

use quiz_core::model::{CatalogConfig, CategoryEntry, QuizDocument, QuizRef, QuizSummary};
use storage::{DocumentSource, StorageError};

use crate::error::{CatalogError, QuizLoadFailure};

/// Icon used when neither the category nor `categoryIcons` names one.
pub const FALLBACK_ICON: &str = "fa-question-circle";

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Category-grouped view of every quiz that loaded.
#[derive(Debug)]
pub struct Catalog {
    title: Option<String>,
    description: Option<String>,
    categories: Vec<CategoryEntry>,
    failures: Vec<QuizLoadFailure>,
}

impl Catalog {
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Non-empty categories in declared config order.
    #[must_use]
    pub fn categories(&self) -> &[CategoryEntry] {
        &self.categories
    }

    #[must_use]
    pub fn category(&self, key: &str) -> Option<&CategoryEntry> {
        self.categories.iter().find(|entry| entry.key == key)
    }

    #[must_use]
    pub fn find(&self, reference: &QuizRef) -> Option<&QuizSummary> {
        self.category(&reference.category)
            .and_then(|entry| entry.quizzes.get(&reference.quiz_name))
    }

    /// Quizzes that were listed but skipped.
    #[must_use]
    pub fn failures(&self) -> &[QuizLoadFailure] {
        &self.failures
    }

    #[must_use]
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn quiz_count(&self) -> usize {
        self.categories.iter().map(CategoryEntry::quiz_count).sum()
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.categories.iter().map(CategoryEntry::question_count).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Builds the catalog from `config.json` and the quiz documents it lists.
#[derive(Clone)]
pub struct CatalogService {
    documents: Arc<dyn DocumentSource>,
    fetch_timeout: Duration,
}

impl CatalogService {
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentSource>, fetch_timeout: Duration) -> Self {
        Self {
            documents,
            fetch_timeout,
        }
    }

    /// Load the config, then fetch every listed quiz concurrently.
    ///
    /// A quiz that fails to load, is malformed, or times out is skipped and
    /// recorded in `Catalog::failures`. Grouping follows the declared config
    /// order regardless of which fetch finishes first.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ConfigLoadFailed` if `config.json` cannot be loaded.
    pub async fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        let config = self
            .documents
            .load_config()
            .await
            .map_err(CatalogError::ConfigLoadFailed)?;

        let refs = config.quiz_refs();
        let mut slots = self.fetch_all(&refs).await;

        let mut loaded: IndexMap<QuizRef, QuizDocument> = IndexMap::new();
        let mut failures = Vec::new();
        for (reference, slot) in refs.into_iter().zip(slots.iter_mut()) {
            let result = slot.take().unwrap_or_else(|| {
                Err(StorageError::fetch_failed(
                    self.documents.locate(&reference.document_path()),
                    "fetch task aborted",
                ))
            });
            match result {
                Ok(document) => {
                    info!(
                        category = %reference.category,
                        quiz = %reference.quiz_name,
                        questions = document.question_count(),
                        "quiz loaded"
                    );
                    loaded.insert(reference, document);
                }
                Err(error) => {
                    warn!(
                        category = %reference.category,
                        quiz = %reference.quiz_name,
                        %error,
                        "quiz skipped"
                    );
                    failures.push(QuizLoadFailure {
                        category: reference.category,
                        quiz_name: reference.quiz_name,
                        error,
                    });
                }
            }
        }

        let categories = group_by_category(&config, loaded);
        let catalog = Catalog {
            title: config.title().map(str::to_string),
            description: config.description().map(str::to_string),
            categories,
            failures,
        };

        info!(
            categories = catalog.category_count(),
            quizzes = catalog.quiz_count(),
            questions = catalog.question_count(),
            skipped = catalog.failures.len(),
            "catalog loaded"
        );

        Ok(catalog)
    }

    /// One result slot per reference, filled in whatever order the fetches complete.
    async fn fetch_all(
        &self,
        refs: &[QuizRef],
    ) -> Vec<Option<Result<QuizDocument, StorageError>>> {
        let mut tasks = JoinSet::new();
        for (slot, reference) in refs.iter().cloned().enumerate() {
            let documents = Arc::clone(&self.documents);
            let timeout = self.fetch_timeout;
            tasks.spawn(async move {
                let result = fetch_quiz(documents.as_ref(), &reference, timeout).await;
                (slot, result)
            });
        }

        let mut slots: Vec<Option<Result<QuizDocument, StorageError>>> =
            refs.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((slot, result)) => slots[slot] = Some(result),
                Err(err) => warn!(error = %err, "quiz fetch task failed"),
            }
        }
        slots
    }
}

async fn fetch_quiz(
    documents: &dyn DocumentSource,
    reference: &QuizRef,
    timeout: Duration,
) -> Result<QuizDocument, StorageError> {
    tokio::time::timeout(timeout, documents.load_quiz(reference))
        .await
        .map_err(|_| StorageError::Timeout {
            location: documents.locate(&reference.document_path()),
            after: timeout,
        })?
}

fn group_by_category(
    config: &CatalogConfig,
    mut loaded: IndexMap<QuizRef, QuizDocument>,
) -> Vec<CategoryEntry> {
    let mut entries = Vec::new();
    for (key, category) in &config.categories {
        let mut quizzes = IndexMap::new();
        for quiz_name in &category.quiz {
            let reference = QuizRef::new(key.clone(), quiz_name.clone());
            if let Some(document) = loaded.shift_remove(&reference) {
                quizzes.insert(quiz_name.clone(), QuizSummary::new(&reference, document));
            }
        }
        if quizzes.is_empty() {
            continue;
        }

        entries.push(CategoryEntry {
            key: key.clone(),
            name: config.display_name(key),
            icon: category_icon(config, key),
            description: category.description.clone(),
            quizzes,
        });
    }
    entries
}

fn category_icon(config: &CatalogConfig, key: &str) -> String {
    config
        .categories
        .get(key)
        .map(|category| category.icon.as_str())
        .filter(|icon| !icon.is_empty())
        .or_else(|| config.category_icons.get(key).map(String::as_str))
        .unwrap_or(FALLBACK_ICON)
        .to_string()
}
