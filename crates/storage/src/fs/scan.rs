use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use quiz_core::model::{CONFIG_FILE_NAME, CatalogConfig, QUIZ_FILE_NAME};

use crate::repository::StorageError;

const IGNORED_DIRS: [&str; 2] = ["__pycache__", "node_modules"];

/// Why a directory was not picked up while scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Name starts with `_` or `.`, or is a tooling directory.
    Hidden,
    /// Quiz folder without a `quiz.json`.
    MissingQuizFile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Quiz folders found on disk, grouped by category directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizTree {
    /// Category key → quiz folder names (sorted). Only non-empty categories.
    pub categories: BTreeMap<String, Vec<String>>,
    pub skipped: Vec<SkippedEntry>,
}

impl QuizTree {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    #[must_use]
    pub fn quiz_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }
}

/// Walk `root/{category}/{quiz}/quiz.json`.
///
/// # Errors
///
/// Returns `StorageError::Io` if a directory cannot be listed.
pub fn scan_quiz_tree(root: &Path) -> Result<QuizTree, StorageError> {
    let mut tree = QuizTree::default();

    for category_dir in sorted_subdirs(root)? {
        let Some(category) = dir_name(&category_dir) else {
            continue;
        };
        if is_hidden(&category) || IGNORED_DIRS.contains(&category.as_str()) {
            tree.skipped.push(SkippedEntry {
                path: category_dir,
                reason: SkipReason::Hidden,
            });
            continue;
        }

        let mut quizzes = Vec::new();
        for quiz_dir in sorted_subdirs(&category_dir)? {
            let Some(quiz_name) = dir_name(&quiz_dir) else {
                continue;
            };
            if is_hidden(&quiz_name) {
                tree.skipped.push(SkippedEntry {
                    path: quiz_dir,
                    reason: SkipReason::Hidden,
                });
                continue;
            }
            if quiz_dir.join(QUIZ_FILE_NAME).is_file() {
                quizzes.push(quiz_name);
            } else {
                tree.skipped.push(SkippedEntry {
                    path: quiz_dir,
                    reason: SkipReason::MissingQuizFile,
                });
            }
        }

        if !quizzes.is_empty() {
            tree.categories.insert(category, quizzes);
        }
    }

    Ok(tree)
}

/// Read `root/config.json`; `Ok(None)` when the file does not exist.
///
/// # Errors
///
/// Returns `StorageError::Io` if the file exists but cannot be read and
/// `StorageError::Malformed` if it is not a valid config.
pub fn read_config_file(root: &Path) -> Result<Option<CatalogConfig>, StorageError> {
    let path = root.join(CONFIG_FILE_NAME);
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(io_error(&path, &err)),
    };
    CatalogConfig::from_json(&raw)
        .map(Some)
        .map_err(|err| StorageError::malformed(path.display().to_string(), err))
}

/// Write `config` as pretty JSON to `root/config.json`.
///
/// # Errors
///
/// Returns `StorageError::Serialization` or `StorageError::Io`.
pub fn write_config_file(root: &Path, config: &CatalogConfig) -> Result<PathBuf, StorageError> {
    let path = root.join(CONFIG_FILE_NAME);
    let body = config
        .to_pretty_json()
        .map_err(|err| StorageError::Serialization(err.to_string()))?;
    fs::write(&path, body).map_err(|err| io_error(&path, &err))?;
    Ok(path)
}

fn sorted_subdirs(dir: &Path) -> Result<Vec<PathBuf>, StorageError> {
    let entries = fs::read_dir(dir).map_err(|err| io_error(dir, &err))?;
    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| io_error(dir, &err))?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn dir_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('_') || name.starts_with('.')
}

fn io_error(path: &Path, err: &std::io::Error) -> StorageError {
    StorageError::Io {
        location: path.display().to_string(),
        reason: err.to_string(),
    }
}
