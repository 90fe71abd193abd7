use chrono::{DateTime, Utc};

use quiz_core::model::{Difficulty, QuestionSource};

pub const DESCRIPTION_MAX_CHARS: usize = 100;

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.to_rfc3339()
}

/// `m:ss`, as shown next to the results.
#[must_use]
pub fn format_duration(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Cut `text` to `max_chars` characters and append `...` when it was longer.
#[must_use]
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim())
}

/// `citation | Kapitel: c | Abschnitt: s | pages`, skipping empty parts.
#[must_use]
pub fn format_source(source: Option<&QuestionSource>) -> Option<String> {
    let source = source?;
    let present = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let parts: Vec<String> = [
        present(&source.citation),
        present(&source.chapter).map(|c| format!("Kapitel: {c}")),
        present(&source.article_or_section).map(|s| format!("Abschnitt: {s}")),
        present(&source.pages),
    ]
    .into_iter()
    .flatten()
    .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" | "))
    }
}

#[must_use]
pub fn format_tags(tags: &[String]) -> Option<String> {
    if tags.is_empty() {
        None
    } else {
        Some(tags.join(", "))
    }
}

#[must_use]
pub fn difficulty_label(difficulty: Option<&Difficulty>) -> Option<String> {
    difficulty
        .map(Difficulty::label)
        .filter(|label| !label.trim().is_empty())
        .map(str::to_string)
}

/// Option letter for a display index (`A`, `B`, ...).
#[must_use]
pub fn option_letter(display_index: usize) -> char {
    u8::try_from(display_index)
        .ok()
        .and_then(|i| b'A'.checked_add(i))
        .filter(u8::is_ascii_uppercase)
        .map_or('?', char::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate_text("kurz", 100), "kurz");
        let long = "ä".repeat(120);
        let cut = truncate_text(&long, 100);
        assert_eq!(cut.chars().count(), 103);
        assert!(cut.ends_with("..."));
        assert_eq!(truncate_text("abc def ghi", 4), "abc...");
    }

    #[test]
    fn source_line_joins_present_parts() {
        let source = QuestionSource {
            citation: Some("Regelbuch".into()),
            chapter: Some("3".into()),
            article_or_section: None,
            pages: Some("S. 12".into()),
        };
        assert_eq!(
            format_source(Some(&source)).as_deref(),
            Some("Regelbuch | Kapitel: 3 | S. 12")
        );
        assert_eq!(format_source(Some(&QuestionSource::default())), None);
        assert_eq!(format_source(None), None);
    }

    #[test]
    fn labels_and_letters() {
        assert_eq!(difficulty_label(Some(&Difficulty::parse("SCHWER"))).as_deref(), Some("Schwer"));
        assert_eq!(difficulty_label(Some(&Difficulty::parse("expert"))).as_deref(), Some("expert"));
        assert_eq!(difficulty_label(None), None);
        assert_eq!(option_letter(0), 'A');
        assert_eq!(option_letter(3), 'D');
        assert_eq!(format_tags(&["a".into(), "b".into()]).as_deref(), Some("a, b"));
        assert_eq!(format_duration(125), "2:05");
    }
}
