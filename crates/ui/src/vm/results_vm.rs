use services::SessionReport;

use crate::vm::text_fmt::{
    difficulty_label, format_datetime, format_duration, format_source, format_tags,
};

/// One line of the detailed results list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultItemVm {
    pub number: usize,
    pub question_text: String,
    pub is_correct: bool,
    pub status: &'static str,
    pub selected_text: String,
    pub details: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsVm {
    pub title: String,
    pub score: u32,
    pub total: u32,
    pub percentage_str: String,
    pub tier_key: &'static str,
    pub message: &'static str,
    pub duration_str: String,
    pub completed_at_str: String,
    pub items: Vec<ResultItemVm>,
}

impl From<&SessionReport> for ResultsVm {
    fn from(report: &SessionReport) -> Self {
        let items = report
            .answers
            .iter()
            .enumerate()
            .map(|(index, answer)| {
                let question = &answer.question;
                let mut details = vec![
                    format!("Richtige Antwort: {}", answer.correct_text),
                    format!("Erklärung: {}", question.explanation),
                ];
                if let Some(source) = format_source(question.source.as_ref()) {
                    details.push(format!("Quelle: {source}"));
                }
                if let Some(tags) = format_tags(&question.tags) {
                    details.push(format!("Tags: {tags}"));
                }
                if let Some(level) = difficulty_label(question.difficulty.as_ref()) {
                    details.push(format!("Level: {level}"));
                }
                ResultItemVm {
                    number: index + 1,
                    question_text: question.text.clone(),
                    is_correct: answer.is_correct,
                    status: if answer.is_correct {
                        "✅ Richtig"
                    } else {
                        "❌ Falsch"
                    },
                    selected_text: answer.selected_text.clone(),
                    details,
                }
            })
            .collect();

        Self {
            title: report.title.clone(),
            score: report.results.score(),
            total: report.results.total(),
            percentage_str: format!("{}%", report.results.percentage()),
            tier_key: report.results.tier().key(),
            message: report.results.message(),
            duration_str: format_duration(report.duration_secs()),
            completed_at_str: format_datetime(report.completed_at),
            items,
        }
    }
}
