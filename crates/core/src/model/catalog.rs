use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::quiz::QuizDocument;

/// File name of a quiz document inside its folder.
pub const QUIZ_FILE_NAME: &str = "quiz.json";
/// File name of the catalog config at the catalog root.
pub const CONFIG_FILE_NAME: &str = "config.json";
const BANNER_FILE_NAME: &str = "banner.png";

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

/// Application-level texts of the catalog page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A category as declared in `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quiz: Vec<String>,
}

/// The catalog config (`config.json`).
///
/// Category order is the declared order of the JSON object. Unknown top-level
/// fields are kept so the file can be rewritten without losing them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<AppInfo>,
    #[serde(default)]
    pub categories: IndexMap<String, CategoryConfig>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub category_icons: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub category_names: IndexMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogConfig {
    /// Parse `config.json`.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the payload does not match the schema.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Serialize as pretty JSON with a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if serialization fails.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.app.as_ref().and_then(|app| app.title.as_deref())
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.app.as_ref().and_then(|app| app.description.as_deref())
    }

    /// Every (category, quiz) pair in declared order, duplicates within a category removed.
    #[must_use]
    pub fn quiz_refs(&self) -> Vec<QuizRef> {
        let mut refs = Vec::new();
        for (key, category) in &self.categories {
            let mut seen = std::collections::HashSet::new();
            for quiz_name in &category.quiz {
                if seen.insert(quiz_name.as_str()) {
                    refs.push(QuizRef::new(key.clone(), quiz_name.clone()));
                }
            }
        }
        refs
    }

    /// Display name of a category: `categoryNames`, then the category's own name,
    /// then the key with its first letter capitalized.
    #[must_use]
    pub fn display_name(&self, key: &str) -> String {
        if let Some(name) = self.category_names.get(key).filter(|n| !n.is_empty()) {
            return name.clone();
        }
        if let Some(category) = self.categories.get(key).filter(|c| !c.name.is_empty()) {
            return category.name.clone();
        }
        capitalize(key)
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

//
// ─── QUIZ REFERENCES ───────────────────────────────────────────────────────────
//

/// Location of a quiz inside the catalog tree: `{category}/{quiz_name}/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuizRef {
    pub category: String,
    pub quiz_name: String,
}

impl QuizRef {
    #[must_use]
    pub fn new(category: impl Into<String>, quiz_name: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            quiz_name: quiz_name.into(),
        }
    }

    /// Parse `category/quiz` (a trailing slash is accepted).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim().trim_matches('/');
        let (category, quiz_name) = trimmed.split_once('/')?;
        if category.is_empty() || quiz_name.is_empty() || quiz_name.contains('/') {
            return None;
        }
        Some(Self::new(category, quiz_name))
    }

    /// Navigation target of the quiz page.
    #[must_use]
    pub fn path(&self) -> String {
        format!("{}/{}/", self.category, self.quiz_name)
    }

    #[must_use]
    pub fn document_path(&self) -> String {
        format!("{}{QUIZ_FILE_NAME}", self.path())
    }

    #[must_use]
    pub fn banner_path(&self) -> String {
        format!("{}{BANNER_FILE_NAME}", self.path())
    }
}

impl fmt::Display for QuizRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.quiz_name)
    }
}

//
// ─── AGGREGATED ENTRIES ────────────────────────────────────────────────────────
//

/// A loaded quiz plus the fields derived for the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSummary {
    pub document: QuizDocument,
    pub category: String,
    pub quiz_name: String,
    pub banner_url: String,
    pub path: String,
    pub question_count: usize,
}

impl QuizSummary {
    #[must_use]
    pub fn new(reference: &QuizRef, document: QuizDocument) -> Self {
        Self {
            question_count: document.question_count(),
            banner_url: reference.banner_path(),
            path: reference.path(),
            category: reference.category.clone(),
            quiz_name: reference.quiz_name.clone(),
            document,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.document.title
    }
}

/// A category with the quizzes that loaded successfully, in declared order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEntry {
    pub key: String,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub quizzes: IndexMap<String, QuizSummary>,
}

impl CategoryEntry {
    #[must_use]
    pub fn quiz_count(&self) -> usize {
        self.quizzes.len()
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.quizzes.values().map(|quiz| quiz.question_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        "app": { "title": "Quiz Center", "description": "Alles", "version": "1.0.0" },
        "settings": { "autoDiscovery": true },
        "categories": {
            "sport": { "name": "Sport", "icon": "fa-football", "quiz": ["basketball", "fussball", "basketball"] },
            "ai": { "name": "", "icon": "fa-robot", "description": "KI", "quiz": ["llm"] }
        },
        "categoryNames": { "ai": "Künstliche Intelligenz" }
    }"#;

    #[test]
    fn keeps_declared_category_order() {
        let config = CatalogConfig::from_json(CONFIG).unwrap();
        let keys: Vec<_> = config.categories.keys().cloned().collect();
        assert_eq!(keys, ["sport", "ai"]);
    }

    #[test]
    fn quiz_refs_follow_config_order_without_duplicates() {
        let config = CatalogConfig::from_json(CONFIG).unwrap();
        let refs: Vec<String> = config.quiz_refs().iter().map(ToString::to_string).collect();
        assert_eq!(refs, ["sport/basketball", "sport/fussball", "ai/llm"]);
    }

    #[test]
    fn display_name_falls_back_in_order() {
        let config = CatalogConfig::from_json(CONFIG).unwrap();
        assert_eq!(config.display_name("ai"), "Künstliche Intelligenz");
        assert_eq!(config.display_name("sport"), "Sport");
        assert_eq!(config.display_name("music"), "Music");
    }

    #[test]
    fn unknown_fields_survive_a_rewrite() {
        let config = CatalogConfig::from_json(CONFIG).unwrap();
        let rewritten = CatalogConfig::from_json(&config.to_pretty_json().unwrap()).unwrap();
        assert_eq!(rewritten, config);
        assert!(rewritten.extra.contains_key("settings"));
        assert_eq!(
            rewritten.app.unwrap().extra.get("version"),
            Some(&Value::String("1.0.0".into()))
        );
    }

    #[test]
    fn quiz_ref_paths() {
        let reference = QuizRef::new("sport", "basketball");
        assert_eq!(reference.path(), "sport/basketball/");
        assert_eq!(reference.document_path(), "sport/basketball/quiz.json");
        assert_eq!(reference.banner_path(), "sport/basketball/banner.png");
    }

    #[test]
    fn quiz_ref_parse() {
        assert_eq!(
            QuizRef::parse("sport/basketball/"),
            Some(QuizRef::new("sport", "basketball"))
        );
        assert_eq!(QuizRef::parse("sport"), None);
        assert_eq!(QuizRef::parse("a/b/c"), None);
    }
}
