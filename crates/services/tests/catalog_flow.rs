use std::sync::Arc;
use std::time::Duration;

use quiz_core::model::{CatalogConfig, CategoryConfig, Question, QuizDocument, QuizRef, QuizSettings};
use services::{CatalogError, CatalogService};
use storage::{DocumentSource, InMemorySource, StorageError};

fn document(title: &str, questions: usize) -> QuizDocument {
    QuizDocument {
        title: title.into(),
        description: String::new(),
        settings: QuizSettings::default(),
        source_document: None,
        language: None,
        version: None,
        questions: (0..questions)
            .map(|i| Question {
                text: format!("{title} {i}"),
                options: vec!["ja".into(), "nein".into()],
                correct_index: 0,
                explanation: String::new(),
                source: None,
                tags: Vec::new(),
                difficulty: None,
            })
            .collect(),
    }
}

fn config(categories: &[(&str, &[&str])]) -> CatalogConfig {
    let mut config = CatalogConfig::default();
    for (key, quizzes) in categories {
        config.categories.insert(
            (*key).to_string(),
            CategoryConfig {
                quiz: quizzes.iter().map(|q| (*q).to_string()).collect(),
                ..CategoryConfig::default()
            },
        );
    }
    config
}

fn service(source: &InMemorySource, timeout: Duration) -> CatalogService {
    let documents: Arc<dyn DocumentSource> = Arc::new(source.clone());
    CatalogService::new(documents, timeout)
}

#[tokio::test]
async fn failed_quiz_drops_its_empty_category() {
    let source = InMemorySource::new();
    source
        .insert_config(&config(&[("a", &["broken"]), ("b", &["one", "two"])]))
        .unwrap();
    source.insert_failure("a/broken/quiz.json", "HTTP 404").unwrap();
    source.insert_quiz(&QuizRef::new("b", "one"), &document("One", 2)).unwrap();
    source.insert_quiz(&QuizRef::new("b", "two"), &document("Two", 3)).unwrap();

    let catalog = service(&source, Duration::from_secs(1)).load_catalog().await.unwrap();

    assert_eq!(catalog.category_count(), 1);
    assert_eq!(catalog.quiz_count(), 2);
    assert_eq!(catalog.question_count(), 5);
    assert_eq!(catalog.categories()[0].key, "b");
    assert_eq!(catalog.failures().len(), 1);
    assert_eq!(catalog.failures()[0].category, "a");
    assert_eq!(catalog.failures()[0].quiz_name, "broken");

    let summary = catalog.find(&QuizRef::new("b", "two")).unwrap();
    assert_eq!(summary.banner_url, "b/two/banner.png");
    assert_eq!(summary.path, "b/two/");
}

#[tokio::test]
async fn grouping_follows_config_order_not_completion_order() {
    let source = InMemorySource::new();
    source
        .insert_config(&config(&[("z", &["slow", "fast"]), ("a", &["mid"])]))
        .unwrap();
    let body = |doc: &QuizDocument| serde_json::json!({ "quiz": doc }).to_string();
    source
        .insert_delayed("z/slow/quiz.json", body(&document("Slow", 1)), Duration::from_millis(60))
        .unwrap();
    source
        .insert_delayed("z/fast/quiz.json", body(&document("Fast", 1)), Duration::from_millis(1))
        .unwrap();
    source
        .insert_delayed("a/mid/quiz.json", body(&document("Mid", 1)), Duration::from_millis(20))
        .unwrap();

    let catalog = service(&source, Duration::from_secs(2)).load_catalog().await.unwrap();

    let keys: Vec<_> = catalog.categories().iter().map(|c| c.key.as_str()).collect();
    assert_eq!(keys, ["z", "a"]);
    let z: Vec<_> = catalog.categories()[0].quizzes.keys().map(String::as_str).collect();
    assert_eq!(z, ["slow", "fast"]);
}

#[tokio::test]
async fn slow_and_malformed_quizzes_are_skipped() {
    let source = InMemorySource::new();
    source
        .insert_config(&config(&[("s", &["ok", "slow", "bad", "ok"])]))
        .unwrap();
    source.insert_quiz(&QuizRef::new("s", "ok"), &document("Ok", 1)).unwrap();
    source
        .insert_delayed(
            "s/slow/quiz.json",
            serde_json::json!({ "quiz": document("Slow", 1) }).to_string(),
            Duration::from_millis(500),
        )
        .unwrap();
    source.insert("s/bad/quiz.json", "{ \"quiz\": {} }").unwrap();

    let catalog = service(&source, Duration::from_millis(50)).load_catalog().await.unwrap();

    assert_eq!(catalog.quiz_count(), 1);
    assert_eq!(catalog.failures().len(), 2);
    assert!(catalog.failures().iter().any(|f| f.quiz_name == "slow"
        && matches!(f.error, StorageError::Timeout { .. })));
    assert!(catalog.failures().iter().any(|f| f.quiz_name == "bad"
        && matches!(f.error, StorageError::Malformed { .. })));
    // config read + one read per distinct quiz
    assert_eq!(source.reads(), 4);
}

#[tokio::test]
async fn missing_config_is_fatal() {
    let source = InMemorySource::new();
    let err = service(&source, Duration::from_secs(1)).load_catalog().await.unwrap_err();
    assert!(matches!(err, CatalogError::ConfigLoadFailed(StorageError::FetchFailed { .. })));
}
