use std::sync::Arc;
use std::time::Duration;

use quiz_core::model::{Question, QuizDocument, QuizRef, QuizSettings, ScoreTier};
use quiz_core::time::fixed_now;
use services::{AdvanceOutcome, Clock, QuizLoopService};
use storage::InMemorySource;

fn question(text: &str, correct_index: usize) -> Question {
    Question {
        text: text.into(),
        options: vec!["A".into(), "B".into(), "C".into()],
        correct_index,
        explanation: String::new(),
        source: None,
        tags: Vec::new(),
        difficulty: None,
    }
}

#[tokio::test]
async fn three_question_quiz_runs_to_excellent() {
    let source = InMemorySource::new();
    let reference = QuizRef::new("sport", "basketball");
    let document = QuizDocument {
        title: "Basketball".into(),
        description: String::new(),
        settings: QuizSettings::default(),
        source_document: None,
        language: None,
        version: None,
        questions: vec![question("Q1", 0), question("Q2", 1), question("Q3", 2)],
    };
    source.insert_quiz(&reference, &document).unwrap();

    let loop_svc = QuizLoopService::new(
        Clock::fixed(fixed_now()),
        Arc::new(source.clone()),
        10,
        Duration::from_secs(1),
    );
    let quiz = loop_svc.load_quiz(&reference).await.unwrap();
    let mut session = loop_svc.start_session(&quiz).unwrap();

    let texts: Vec<_> = session.questions().iter().map(|q| q.text.clone()).collect();
    assert_eq!(texts, ["Q1", "Q2", "Q3"]);

    loop {
        let presented = session.present_question().unwrap();
        let correct = presented.correct_display_index().unwrap();
        assert!(session.submit_answer(correct).unwrap().is_correct);
        if session.advance().unwrap() == AdvanceOutcome::Completed {
            break;
        }
    }

    let report = session.results().unwrap();
    assert_eq!(report.results.score(), 3);
    assert_eq!(report.results.percentage(), 100);
    assert_eq!(report.results.tier(), ScoreTier::Excellent);
    assert_eq!(report.results.message(), ScoreTier::Excellent.message());
    assert_eq!(report.answers.len(), 3);
}
