/// Keys the quiz page reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyInput {
    Enter,
    Char(char),
}

impl KeyInput {
    /// Parse one line of terminal input: empty means Enter, otherwise the first character.
    #[must_use]
    pub fn from_line(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Some(Self::Enter),
            (Some(ch), None) => Some(Self::Char(ch)),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Start,
    Quiz,
    Results,
    Pdf,
}

/// What a key press asks the page to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Start,
    SelectOption(usize),
    Next,
    BackToStart,
}

/// The part of the quiz state the key mapping depends on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyContext {
    pub screen: Screen,
    pub option_count: usize,
    pub answered: bool,
}

/// Map a key to an action, `None` when the key does nothing in this context.
///
/// - start screen: Enter starts
/// - results screen: Enter returns to the start screen
/// - quiz screen: `1`-`4` and `a`-`d` pick an existing option of an unanswered
///   question; Enter, `n` and `N` move on after an answer
#[must_use]
pub fn map_key(context: KeyContext, key: KeyInput) -> Option<KeyAction> {
    match (context.screen, key) {
        (Screen::Start, KeyInput::Enter) => Some(KeyAction::Start),
        (Screen::Results, KeyInput::Enter) => Some(KeyAction::BackToStart),
        (Screen::Quiz, KeyInput::Enter | KeyInput::Char('n' | 'N')) if context.answered => {
            Some(KeyAction::Next)
        }
        (Screen::Quiz, KeyInput::Char(ch)) if !context.answered => option_index(ch)
            .filter(|&index| index < context.option_count)
            .map(KeyAction::SelectOption),
        _ => None,
    }
}

fn option_index(ch: char) -> Option<usize> {
    match ch {
        '1'..='4' => Some(ch as usize - '1' as usize),
        'a'..='d' => Some(ch as usize - 'a' as usize),
        'A'..='D' => Some(ch as usize - 'A' as usize),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiz(option_count: usize, answered: bool) -> KeyContext {
        KeyContext {
            screen: Screen::Quiz,
            option_count,
            answered,
        }
    }

    #[test]
    fn digits_and_letters_select_existing_options() {
        let ctx = quiz(3, false);
        assert_eq!(map_key(ctx, KeyInput::Char('1')), Some(KeyAction::SelectOption(0)));
        assert_eq!(map_key(ctx, KeyInput::Char('c')), Some(KeyAction::SelectOption(2)));
        assert_eq!(map_key(ctx, KeyInput::Char('B')), Some(KeyAction::SelectOption(1)));
        assert_eq!(map_key(ctx, KeyInput::Char('4')), None);
        assert_eq!(map_key(ctx, KeyInput::Char('d')), None);
        assert_eq!(map_key(ctx, KeyInput::Char('5')), None);
        assert_eq!(map_key(ctx, KeyInput::Enter), None);
    }

    #[test]
    fn answered_question_only_advances() {
        let ctx = quiz(4, true);
        assert_eq!(map_key(ctx, KeyInput::Char('a')), None);
        assert_eq!(map_key(ctx, KeyInput::Enter), Some(KeyAction::Next));
        assert_eq!(map_key(ctx, KeyInput::Char('n')), Some(KeyAction::Next));
        assert_eq!(map_key(ctx, KeyInput::Char('N')), Some(KeyAction::Next));
    }

    #[test]
    fn enter_on_start_and_results_screens() {
        let start = KeyContext {
            screen: Screen::Start,
            option_count: 0,
            answered: false,
        };
        assert_eq!(map_key(start, KeyInput::Enter), Some(KeyAction::Start));
        assert_eq!(map_key(start, KeyInput::Char('1')), None);

        let results = KeyContext {
            screen: Screen::Results,
            ..start
        };
        assert_eq!(map_key(results, KeyInput::Enter), Some(KeyAction::BackToStart));

        let pdf = KeyContext {
            screen: Screen::Pdf,
            ..start
        };
        assert_eq!(map_key(pdf, KeyInput::Enter), None);
    }

    #[test]
    fn terminal_lines() {
        assert_eq!(KeyInput::from_line("\n"), Some(KeyInput::Enter));
        assert_eq!(KeyInput::from_line(" b \n"), Some(KeyInput::Char('b')));
        assert_eq!(KeyInput::from_line("quit"), None);
    }
}
