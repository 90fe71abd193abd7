//! Plain-text rendering of the view models for the terminal front end.

use crate::vm::{
    CatalogVm, FeedbackVm, OptionState, QuestionVm, QuizPageVm, ResultsVm, Screen, StartVm,
};

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

#[must_use]
pub fn render_catalog(vm: &CatalogVm) -> String {
    let mut out = String::new();
    push_line(&mut out, &vm.title);
    if let Some(description) = &vm.description {
        push_line(&mut out, description);
    }
    push_line(
        &mut out,
        &format!(
            "{} Kategorien · {} Quiz · {} Fragen",
            vm.category_count, vm.quiz_count, vm.question_count
        ),
    );

    let mut position = 0;
    for category in &vm.categories {
        let marker = if category.expanded { '▾' } else { '▸' };
        out.push('\n');
        push_line(&mut out, &format!("{marker} {} [{}]", category.name, category.icon));
        if !category.description.is_empty() {
            push_line(&mut out, &format!("  {}", category.description));
        }
        push_line(&mut out, &format!("  {}", category.count_label));
        for card in &category.cards {
            position += 1;
            if !category.expanded {
                continue;
            }
            push_line(&mut out, &format!("  {position:>2}. {}", card.title_with_count));
            if !card.description.is_empty() {
                push_line(&mut out, &format!("      {}", card.description));
            }
            push_line(
                &mut out,
                &format!("      {} {} · {}", card.language, card.version_label, card.path),
            );
        }
    }
    out
}

#[must_use]
pub fn render_start(vm: &StartVm) -> String {
    let mut out = String::new();
    push_line(&mut out, &vm.title);
    if !vm.description.is_empty() {
        push_line(&mut out, &vm.description);
    }
    push_line(
        &mut out,
        &format!(
            "{} von {} Fragen im Pool",
            vm.question_count, vm.pool_count
        ),
    );
    if let Some(pdf) = &vm.pdf_filename {
        push_line(&mut out, &format!("PDF: {pdf}"));
    }
    push_line(&mut out, "[Enter] Quiz starten");
    out
}

#[must_use]
pub fn render_question(vm: &QuestionVm) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        &format!(
            "Frage {} von {} · Punkte: {} · {}%",
            vm.number, vm.total, vm.score, vm.progress_percent
        ),
    );
    push_line(&mut out, &vm.text);
    for option in &vm.options {
        let mark = match option.state {
            OptionState::Open | OptionState::Disabled => ' ',
            OptionState::Correct => '✓',
            OptionState::Incorrect => '✗',
        };
        push_line(&mut out, &format!(" {mark} {}) {}", option.letter, option.text));
    }
    out
}

#[must_use]
pub fn render_feedback(vm: &FeedbackVm) -> String {
    let mut out = String::new();
    push_line(&mut out, vm.status);
    push_line(&mut out, &format!("Richtige Antwort: {}", vm.correct_text));
    push_line(&mut out, &format!("Erklärung: {}", vm.explanation));
    if let Some(source) = &vm.source {
        push_line(&mut out, &format!("Quelle: {source}"));
    }
    if let Some(tags) = &vm.tags_line {
        push_line(&mut out, &format!("Tags: {tags}"));
    }
    if let Some(level) = &vm.difficulty {
        push_line(&mut out, &format!("Level: {level}"));
    }
    push_line(&mut out, &format!("[Enter] {}", vm.next_label));
    out
}

#[must_use]
pub fn render_results(vm: &ResultsVm) -> String {
    let mut out = String::new();
    push_line(&mut out, &vm.title);
    push_line(
        &mut out,
        &format!(
            "{} / {} · {} · {}",
            vm.score, vm.total, vm.percentage_str, vm.duration_str
        ),
    );
    push_line(&mut out, vm.message);
    for item in &vm.items {
        out.push('\n');
        push_line(&mut out, &format!("Frage {}: {}", item.number, item.question_text));
        push_line(
        &mut out,
        &format!(
            "{} - Deine Antwort: {}",
            item.status, item.selected_text
        ),
    );
        for line in &item.details {
            push_line(&mut out, &format!("  {line}"));
        }
    }
    out.push('\n');
    push_line(&mut out, "[Enter] Zurück zum Start");
    out
}

/// Render whatever the page currently shows.
#[must_use]
pub fn render_page(vm: &QuizPageVm) -> String {
    match vm.screen() {
        Screen::Start => render_start(&vm.start_vm()),
        Screen::Quiz => {
            let mut out = vm
                .question_vm()
                .map(|question| render_question(&question))
                .unwrap_or_default();
            if let Some(feedback) = vm.feedback() {
                out.push('\n');
                out.push_str(&render_feedback(&feedback));
            }
            out
        }
        Screen::Results => vm
            .results()
            .map(|results| render_results(&results))
            .unwrap_or_default(),
        Screen::Pdf => {
            let pdf = vm.start_vm().pdf_filename.unwrap_or_default();
            format!("PDF: {pdf}\n")
        }
    }
}
