use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use crate::repository::{DocumentSource, StorageError};

mod scan;

pub use scan::{
    QuizTree, SkipReason, SkippedEntry, read_config_file, scan_quiz_tree, write_config_file,
};

/// Document source backed by a local catalog directory.
#[derive(Clone, Debug)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative document path below the root.
    ///
    /// Absolute paths and `..` components are rejected so a config entry cannot
    /// read outside the catalog.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(StorageError::fetch_failed(
                self.locate(path),
                "path leaves the catalog root",
            ));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl DocumentSource for FsSource {
    async fn read(&self, path: &str) -> Result<String, StorageError> {
        let full = self.resolve(path)?;
        tokio::fs::read_to_string(&full)
            .await
            .map_err(|err| StorageError::fetch_failed(full.display().to_string(), err))
    }

    fn locate(&self, path: &str) -> String {
        self.root.join(path).display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn parent_components_are_rejected() {
        let source = FsSource::new("/tmp/catalog");
        let err = source.read("../etc/passwd").await.unwrap_err();
        assert!(matches!(err, StorageError::FetchFailed { .. }));
    }

    #[tokio::test]
    async fn missing_file_is_fetch_failure() {
        let source = FsSource::new(std::env::temp_dir().join("quiz-center-does-not-exist"));
        let err = source.read("config.json").await.unwrap_err();
        assert!(matches!(err, StorageError::FetchFailed { .. }));
    }
}
