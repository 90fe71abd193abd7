//! Keeps `config.json` consistent with the quiz folders on disk.

use indexmap::IndexMap;
use serde_json::{Map, Value, json};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use quiz_core::model::{AppInfo, CatalogConfig, CategoryConfig};
use storage::fs::{QuizTree, read_config_file, scan_quiz_tree, write_config_file};

use crate::catalog::FALLBACK_ICON;
use crate::error::ConfigSyncError;

const DEFAULT_ICONS: [(&str, &str); 21] = [
    ("ai", "fa-robot"),
    ("sport", "fa-football"),
    ("science", "fa-microscope"),
    ("history", "fa-landmark"),
    ("geography", "fa-globe"),
    ("math", "fa-calculator"),
    ("literature", "fa-book"),
    ("music", "fa-music"),
    ("art", "fa-palette"),
    ("technology", "fa-laptop-code"),
    ("movies", "fa-film"),
    ("games", "fa-gamepad"),
    ("food", "fa-utensils"),
    ("nature", "fa-leaf"),
    ("languages", "fa-language"),
    ("business", "fa-briefcase"),
    ("medicine", "fa-stethoscope"),
    ("chemistry", "fa-flask"),
    ("physics", "fa-atom"),
    ("biology", "fa-dna"),
    ("default", FALLBACK_ICON),
];

const DEFAULT_NAMES: [(&str, &str); 20] = [
    ("ai", "Künstliche Intelligenz"),
    ("sport", "Sport"),
    ("science", "Wissenschaft"),
    ("history", "Geschichte"),
    ("geography", "Geographie"),
    ("math", "Mathematik"),
    ("literature", "Literatur"),
    ("music", "Musik"),
    ("art", "Kunst"),
    ("technology", "Technologie"),
    ("movies", "Film & TV"),
    ("games", "Spiele"),
    ("food", "Kulinarik"),
    ("nature", "Natur"),
    ("languages", "Sprachen"),
    ("business", "Business"),
    ("medicine", "Medizin"),
    ("chemistry", "Chemie"),
    ("physics", "Physik"),
    ("biology", "Biologie"),
];

//
// ─── INCONSISTENCIES ───────────────────────────────────────────────────────────
//

/// A mismatch between `config.json` and the folder tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inconsistency {
    /// Listed in the config, no quiz folder on disk.
    QuizzesMissingOnDisk { category: String, quizzes: Vec<String> },
    /// Quiz folder on disk, not listed in the config.
    QuizzesNotListed { category: String, quizzes: Vec<String> },
    CategoriesMissingOnDisk(Vec<String>),
    NewCategories(Vec<String>),
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QuizzesMissingOnDisk { category, quizzes } => write!(
                f,
                "removed orphaned quizzes from '{category}': {}",
                quizzes.join(", ")
            ),
            Self::QuizzesNotListed { category, quizzes } => write!(
                f,
                "added missing quizzes to '{category}': {}",
                quizzes.join(", ")
            ),
            Self::CategoriesMissingOnDisk(keys) => {
                write!(f, "removed orphaned categories: {}", keys.join(", "))
            }
            Self::NewCategories(keys) => write!(f, "added new categories: {}", keys.join(", ")),
        }
    }
}

/// Compare the config against a scanned tree.
#[must_use]
pub fn validate(config: &CatalogConfig, tree: &QuizTree) -> Vec<Inconsistency> {
    let mut found = Vec::new();

    for (key, category) in &config.categories {
        let listed: BTreeSet<&str> = category.quiz.iter().map(String::as_str).collect();
        let on_disk: BTreeSet<&str> = tree
            .categories
            .get(key)
            .map(|quizzes| quizzes.iter().map(String::as_str).collect())
            .unwrap_or_default();

        let missing: Vec<String> = listed.difference(&on_disk).map(|q| (*q).to_string()).collect();
        if !missing.is_empty() {
            found.push(Inconsistency::QuizzesMissingOnDisk {
                category: key.clone(),
                quizzes: missing,
            });
        }

        let unlisted: Vec<String> = on_disk.difference(&listed).map(|q| (*q).to_string()).collect();
        if !unlisted.is_empty() {
            found.push(Inconsistency::QuizzesNotListed {
                category: key.clone(),
                quizzes: unlisted,
            });
        }
    }

    let mut gone: Vec<String> = config
        .categories
        .keys()
        .filter(|key| !tree.categories.contains_key(*key))
        .cloned()
        .collect();
    gone.sort();
    if !gone.is_empty() {
        found.push(Inconsistency::CategoriesMissingOnDisk(gone));
    }

    let new: Vec<String> = tree
        .categories
        .keys()
        .filter(|key| !config.categories.contains_key(*key))
        .cloned()
        .collect();
    if !new.is_empty() {
        found.push(Inconsistency::NewCategories(new));
    }

    found
}

//
// ─── UPDATE ────────────────────────────────────────────────────────────────────
//

/// Rewrite the category list from the scanned tree.
///
/// Existing categories keep their metadata, new ones get defaults, and
/// categories no longer on disk are dropped. Other fields are left alone.
#[must_use]
pub fn update(mut config: CatalogConfig, tree: &QuizTree) -> CatalogConfig {
    let mut categories = std::mem::take(&mut config.categories);
    categories.retain(|key, _| tree.categories.contains_key(key));

    for (key, quizzes) in &tree.categories {
        let mut sorted = quizzes.clone();
        sorted.sort();
        match categories.get_mut(key) {
            Some(existing) => existing.quiz = sorted,
            None => {
                categories.insert(key.clone(), new_category(key, sorted));
            }
        }
    }
    config.categories = categories;

    for (key, icon) in DEFAULT_ICONS {
        config.category_icons.insert(key.to_string(), icon.to_string());
    }
    for (key, name) in DEFAULT_NAMES {
        config.category_names.insert(key.to_string(), name.to_string());
    }
    config
}

fn new_category(key: &str, quiz: Vec<String>) -> CategoryConfig {
    let known_name = lookup(&DEFAULT_NAMES, key);
    CategoryConfig {
        name: known_name.map_or_else(|| title_case(key), str::to_string),
        icon: lookup(&DEFAULT_ICONS, key).unwrap_or(FALLBACK_ICON).to_string(),
        description: format!("Quiz und Wissen rund um {}", known_name.unwrap_or(key)),
        quiz,
    }
}

fn lookup<'a>(table: &[(&str, &'a str)], key: &str) -> Option<&'a str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_word = false;
    for ch in value.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

/// Config used when `config.json` is missing or unreadable.
#[must_use]
pub fn default_config() -> CatalogConfig {
    let mut app_extra = Map::new();
    app_extra.insert("version".into(), json!("1.0.0"));
    app_extra.insert("author".into(), json!("Quiz Center Team"));
    app_extra.insert("language".into(), json!("de"));

    let mut extra = Map::new();
    extra.insert(
        "settings".into(),
        json!({
            "autoDiscovery": true,
            "defaultQuizSettings": {
                "shuffleQuestions": true,
                "shuffleOptions": true,
                "showExplanations": true,
                "timePerQuestionSec": 60
            }
        }),
    );

    CatalogConfig {
        app: Some(AppInfo {
            title: Some("Quiz Center".into()),
            description: Some("Entdecke und teste dein Wissen in verschiedenen Kategorien".into()),
            extra: app_extra,
        }),
        categories: IndexMap::new(),
        category_icons: to_table(&DEFAULT_ICONS),
        category_names: to_table(&DEFAULT_NAMES),
        extra,
    }
}

fn to_table(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Per-category line of the sync statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStats {
    pub key: String,
    pub name: String,
    pub icon: String,
    pub quizzes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStats {
    pub categories: Vec<CategoryStats>,
}

impl SyncStats {
    #[must_use]
    pub fn from_config(config: &CatalogConfig) -> Self {
        let categories = config
            .categories
            .iter()
            .map(|(key, category)| CategoryStats {
                key: key.clone(),
                name: if category.name.is_empty() {
                    key.clone()
                } else {
                    category.name.clone()
                },
                icon: category.icon.clone(),
                quizzes: category.quiz.clone(),
            })
            .collect();
        Self { categories }
    }

    #[must_use]
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn quiz_count(&self) -> usize {
        self.categories.iter().map(|c| c.quizzes.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub config_path: PathBuf,
    pub fixes: Vec<Inconsistency>,
    pub stats: SyncStats,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    UpToDate,
    /// Nothing on disk to build a config from; the file is left untouched.
    NoCategories,
    Updated(SyncReport),
}

/// Validates and repairs `config.json` below a catalog directory.
#[derive(Clone, Debug)]
pub struct ConfigSyncService {
    root: PathBuf,
}

impl ConfigSyncService {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The current config, or `default_config()` if it is missing or unreadable.
    #[must_use]
    pub fn load_config(&self) -> CatalogConfig {
        match read_config_file(&self.root) {
            Ok(Some(config)) => config,
            Ok(None) => {
                info!(root = %self.root.display(), "no config.json, starting from defaults");
                default_config()
            }
            Err(error) => {
                warn!(%error, "config.json unreadable, starting from defaults");
                default_config()
            }
        }
    }

    /// Report inconsistencies without changing anything.
    ///
    /// # Errors
    ///
    /// Returns `ConfigSyncError::Storage` if the tree cannot be scanned.
    pub fn check(&self) -> Result<Vec<Inconsistency>, ConfigSyncError> {
        let tree = scan_quiz_tree(&self.root)?;
        Ok(validate(&self.load_config(), &tree))
    }

    /// Validate, repair, write, and re-validate.
    ///
    /// # Errors
    ///
    /// Returns `ConfigSyncError::Storage` on scan or write failures and
    /// `ConfigSyncError::StillInconsistent` if the rewritten file still disagrees
    /// with the tree.
    pub fn run(&self) -> Result<SyncOutcome, ConfigSyncError> {
        let tree = scan_quiz_tree(&self.root)?;
        for skipped in &tree.skipped {
            info!(path = %skipped.path.display(), reason = ?skipped.reason, "folder skipped");
        }

        let config = self.load_config();
        let fixes = validate(&config, &tree);
        if fixes.is_empty() {
            info!("config.json already consistent");
            return Ok(SyncOutcome::UpToDate);
        }
        for fix in &fixes {
            warn!(%fix, "inconsistency");
        }

        if tree.is_empty() {
            warn!(root = %self.root.display(), "no quiz categories found");
            return Ok(SyncOutcome::NoCategories);
        }

        let updated = update(config, &tree);
        let config_path = write_config_file(&self.root, &updated)?;
        info!(path = %config_path.display(), "config.json written");

        let remaining = validate(&self.load_config(), &scan_quiz_tree(&self.root)?);
        if !remaining.is_empty() {
            return Err(ConfigSyncError::StillInconsistent {
                count: remaining.len(),
            });
        }

        Ok(SyncOutcome::Updated(SyncReport {
            config_path,
            fixes,
            stats: SyncStats::from_config(&updated),
        }))
    }
}
