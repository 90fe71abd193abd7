use quiz_core::model::{CategoryEntry, QuizSummary};
use services::Catalog;

use crate::vm::text_fmt::{DESCRIPTION_MAX_CHARS, truncate_text};

pub const DEFAULT_TITLE: &str = "Quiz Center";
const DEFAULT_LANGUAGE: &str = "DE";
const DEFAULT_VERSION: &str = "1.0";

/// UI-ready quiz card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizCardVm {
    pub title_with_count: String,
    pub description: String,
    pub language: String,
    pub version_label: String,
    pub banner_url: String,
    pub path: String,
}

impl From<&QuizSummary> for QuizCardVm {
    fn from(summary: &QuizSummary) -> Self {
        let document = &summary.document;
        let language = document
            .language
            .as_deref()
            .filter(|l| !l.is_empty())
            .map_or_else(|| DEFAULT_LANGUAGE.to_string(), str::to_uppercase);
        let version = document
            .version
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_VERSION);

        Self {
            title_with_count: format!("{} ({} Fragen)", document.title, summary.question_count),
            description: truncate_text(&document.description, DESCRIPTION_MAX_CHARS),
            language,
            version_label: format!("v{version}"),
            banner_url: summary.banner_url.clone(),
            path: summary.path.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryVm {
    pub key: String,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub count_label: String,
    pub expanded: bool,
    pub cards: Vec<QuizCardVm>,
}

impl CategoryVm {
    fn new(entry: &CategoryEntry, expanded: bool) -> Self {
        Self {
            key: entry.key.clone(),
            name: entry.name.clone(),
            icon: entry.icon.clone(),
            description: entry.description.clone(),
            count_label: format!("{} Quiz verfügbar", entry.quiz_count()),
            expanded,
            cards: map_quiz_cards(entry),
        }
    }
}

/// Convert a category's quizzes into cards, in declared order.
#[must_use]
pub fn map_quiz_cards(entry: &CategoryEntry) -> Vec<QuizCardVm> {
    entry.quizzes.values().map(QuizCardVm::from).collect()
}

/// Catalog page with accordion state. Every category starts collapsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogVm {
    pub title: String,
    pub description: Option<String>,
    pub category_count: usize,
    pub quiz_count: usize,
    pub question_count: usize,
    pub categories: Vec<CategoryVm>,
}

impl CatalogVm {
    #[must_use]
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            title: catalog.title().unwrap_or(DEFAULT_TITLE).to_string(),
            description: catalog.description().map(str::to_string),
            category_count: catalog.category_count(),
            quiz_count: catalog.quiz_count(),
            question_count: catalog.question_count(),
            categories: catalog
                .categories()
                .iter()
                .map(|entry| CategoryVm::new(entry, false))
                .collect(),
        }
    }

    /// Open or close one category; returns the new state, `None` for unknown keys.
    pub fn toggle(&mut self, key: &str) -> Option<bool> {
        let category = self.categories.iter_mut().find(|c| c.key == key)?;
        category.expanded = !category.expanded;
        Some(category.expanded)
    }

    #[must_use]
    pub fn is_expanded(&self, key: &str) -> bool {
        self.categories.iter().any(|c| c.key == key && c.expanded)
    }

    /// Card at a 1-based position across all categories, in display order.
    #[must_use]
    pub fn card_at(&self, position: usize) -> Option<&QuizCardVm> {
        position
            .checked_sub(1)
            .and_then(|index| self.categories.iter().flat_map(|c| &c.cards).nth(index))
    }
}
