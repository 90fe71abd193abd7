use std::fs;
use std::path::PathBuf;

use quiz_core::model::{CatalogConfig, CategoryConfig, QuizRef};
use storage::fs::{FsSource, SkipReason, read_config_file, scan_quiz_tree, write_config_file};
use storage::{DocumentSource, StorageError};

const QUIZ: &str = r#"{
    "quiz": {
        "title": "Basketball",
        "description": "Regeln",
        "settings": { "shuffleQuestions": false, "shuffleOptions": false },
        "questions": [
            { "text": "Spieler?", "options": ["4", "5"], "correctIndex": 1, "explanation": "Fünf." }
        ]
    }
}"#;

struct TempCatalog {
    root: PathBuf,
}

impl TempCatalog {
    fn new() -> Self {
        let root = std::env::temp_dir().join(format!("quiz-center-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&root).unwrap();
        Self { root }
    }

    fn add_quiz(&self, category: &str, quiz: &str, body: Option<&str>) {
        let dir = self.root.join(category).join(quiz);
        fs::create_dir_all(&dir).unwrap();
        if let Some(body) = body {
            fs::write(dir.join("quiz.json"), body).unwrap();
        }
    }
}

impl Drop for TempCatalog {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

#[test]
fn scan_finds_quizzes_and_skips_hidden_or_incomplete_folders() {
    let catalog = TempCatalog::new();
    catalog.add_quiz("sport", "basketball", Some(QUIZ));
    catalog.add_quiz("sport", "_draft", Some(QUIZ));
    catalog.add_quiz("sport", "tennis", None);
    catalog.add_quiz("_template", "copyme", Some(QUIZ));
    catalog.add_quiz("empty", "nothing", None);
    catalog.add_quiz("ai", "llm", Some(QUIZ));

    let tree = scan_quiz_tree(&catalog.root).unwrap();

    let keys: Vec<_> = tree.categories.keys().cloned().collect();
    assert_eq!(keys, ["ai", "sport"]);
    assert_eq!(tree.categories["sport"], ["basketball"]);
    assert_eq!(tree.quiz_count(), 2);
    assert!(
        tree.skipped
            .iter()
            .any(|s| s.path.ends_with("sport/tennis") && s.reason == SkipReason::MissingQuizFile)
    );
    assert!(
        tree.skipped
            .iter()
            .any(|s| s.path.ends_with("_template") && s.reason == SkipReason::Hidden)
    );
}

#[tokio::test]
async fn fs_source_loads_quiz_documents() {
    let catalog = TempCatalog::new();
    catalog.add_quiz("sport", "basketball", Some(QUIZ));

    let source = FsSource::new(&catalog.root);
    let doc = source
        .load_quiz(&QuizRef::new("sport", "basketball"))
        .await
        .unwrap();
    assert_eq!(doc.title, "Basketball");
    assert_eq!(doc.question_count(), 1);

    let err = source
        .load_quiz(&QuizRef::new("sport", "missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::FetchFailed { .. }));
}

#[test]
fn config_file_round_trips() {
    let catalog = TempCatalog::new();
    assert_eq!(read_config_file(&catalog.root).unwrap(), None);

    let mut config = CatalogConfig::default();
    config.categories.insert(
        "sport".into(),
        CategoryConfig {
            name: "Sport".into(),
            icon: "fa-football".into(),
            description: "Bälle".into(),
            quiz: vec!["basketball".into()],
        },
    );
    let path = write_config_file(&catalog.root, &config).unwrap();
    assert!(path.ends_with("config.json"));

    let loaded = read_config_file(&catalog.root).unwrap().unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn broken_config_file_is_malformed() {
    let catalog = TempCatalog::new();
    fs::write(catalog.root.join("config.json"), "{ not json").unwrap();
    let err = read_config_file(&catalog.root).unwrap_err();
    assert!(matches!(err, StorageError::Malformed { .. }));
}
