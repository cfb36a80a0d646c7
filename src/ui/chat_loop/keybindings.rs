//! Key and paste translation for the chat loop.
//!
//! Mapping is pure: every event becomes a list of [`AppAction`]s that the
//! loop dispatches, so bindings can be tested without a terminal.

use crate::core::app::AppAction;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const SCROLL_STEP: u16 = 1;

pub fn map_key_event(key: &KeyEvent) -> Vec<AppAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    let action = match key.code {
        KeyCode::Char('c') if ctrl => AppAction::Quit,
        KeyCode::Char('t') if ctrl => AppAction::ToggleTheme,
        KeyCode::Char('n') if ctrl => AppAction::NextModel,
        KeyCode::Char('p') if ctrl => AppAction::PreviousModel,
        KeyCode::Char(_) if ctrl || alt => return Vec::new(),
        KeyCode::Char(ch) => AppAction::InsertChar { ch },
        KeyCode::Enter if alt || shift => AppAction::InsertNewline,
        KeyCode::Enter => AppAction::SubmitInput,
        KeyCode::Backspace => AppAction::Backspace,
        KeyCode::Esc => AppAction::ClearStatus,
        KeyCode::Up => AppAction::ScrollUp { lines: SCROLL_STEP },
        KeyCode::Down => AppAction::ScrollDown { lines: SCROLL_STEP },
        KeyCode::PageUp => AppAction::PageUp,
        KeyCode::PageDown => AppAction::PageDown,
        KeyCode::Home => AppAction::ScrollToTop,
        KeyCode::End => AppAction::ScrollToBottom,
        _ => return Vec::new(),
    };
    vec![action]
}

/// Pasted text is typed into the input; carriage returns and other control
/// characters are dropped and tabs become spaces.
pub fn map_paste(text: &str) -> Vec<AppAction> {
    text.chars()
        .filter_map(|ch| match ch {
            '\n' => Some(AppAction::InsertNewline),
            '\t' => Some(AppAction::InsertChar { ch: ' ' }),
            ch if ch.is_control() => None,
            ch => Some(AppAction::InsertChar { ch }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn single(code: KeyCode, modifiers: KeyModifiers) -> AppAction {
        let mut actions = map_key_event(&key(code, modifiers));
        assert_eq!(actions.len(), 1);
        actions.remove(0)
    }

    #[test]
    fn enter_submits_and_modified_enter_inserts_newline() {
        assert!(matches!(
            single(KeyCode::Enter, KeyModifiers::NONE),
            AppAction::SubmitInput
        ));
        assert!(matches!(
            single(KeyCode::Enter, KeyModifiers::ALT),
            AppAction::InsertNewline
        ));
        assert!(matches!(
            single(KeyCode::Enter, KeyModifiers::SHIFT),
            AppAction::InsertNewline
        ));
    }

    #[test]
    fn control_shortcuts() {
        assert!(matches!(
            single(KeyCode::Char('c'), KeyModifiers::CONTROL),
            AppAction::Quit
        ));
        assert!(matches!(
            single(KeyCode::Char('t'), KeyModifiers::CONTROL),
            AppAction::ToggleTheme
        ));
        assert!(matches!(
            single(KeyCode::Char('n'), KeyModifiers::CONTROL),
            AppAction::NextModel
        ));
        assert!(matches!(
            single(KeyCode::Char('p'), KeyModifiers::CONTROL),
            AppAction::PreviousModel
        ));
        assert!(map_key_event(&key(KeyCode::Char('x'), KeyModifiers::CONTROL)).is_empty());
    }

    #[test]
    fn typed_characters_keep_shifted_form() {
        assert!(matches!(
            single(KeyCode::Char('A'), KeyModifiers::SHIFT),
            AppAction::InsertChar { ch: 'A' }
        ));
    }

    #[test]
    fn navigation_keys_scroll() {
        assert!(matches!(
            single(KeyCode::Up, KeyModifiers::NONE),
            AppAction::ScrollUp { lines: 1 }
        ));
        assert!(matches!(
            single(KeyCode::PageDown, KeyModifiers::NONE),
            AppAction::PageDown
        ));
        assert!(matches!(
            single(KeyCode::Home, KeyModifiers::NONE),
            AppAction::ScrollToTop
        ));
        assert!(map_key_event(&key(KeyCode::F(5), KeyModifiers::NONE)).is_empty());
    }

    #[test]
    fn paste_sanitizes_text() {
        let actions = map_paste("a\r\nb\tc\u{7}");
        let rendered: String = actions
            .iter()
            .map(|action| match action {
                AppAction::InsertChar { ch } => *ch,
                AppAction::InsertNewline => '\n',
                _ => '?',
            })
            .collect();
        assert_eq!(rendered, "a\nb c");
    }
}
