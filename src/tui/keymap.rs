use crate::controller::{Field, Intent, Section};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press does in the current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Intent(Intent),
    Quit,
    ToggleHelp,
    Insert(char),
    Newline,
    Backspace,
    FocusNext,
    FocusPrev,
    StyleNext,
    StylePrev,
    ScrollUp,
    ScrollDown,
    Save,
    CopyPath,
}

/// Ctrl+Enter, or Ctrl+J for terminals that cannot report modified Enter.
fn is_submit(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Enter | KeyCode::Char('j'))
}

pub fn map_key(section: Section, focus: Field, key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => return Some(Action::Quit),
        KeyCode::Char('c') if ctrl => return Some(Action::Quit),
        KeyCode::F(1) => return Some(Action::ToggleHelp),
        _ => {}
    }

    let action = match section {
        Section::Generator => match (focus, key.code) {
            (_, KeyCode::Char('g')) if ctrl => Action::Intent(Intent::Generate),
            (Field::CompanyName, KeyCode::Enter) => Action::Intent(Intent::Generate),
            (Field::CustomPrompt, _) if is_submit(&key) => Action::Intent(Intent::Generate),
            (Field::CustomPrompt, KeyCode::Enter) => Action::Newline,
            (Field::Style, KeyCode::Left) => Action::StylePrev,
            (Field::Style, KeyCode::Right | KeyCode::Char(' ') | KeyCode::Enter) => {
                Action::StyleNext
            }
            (_, KeyCode::Tab | KeyCode::Down) => Action::FocusNext,
            (_, KeyCode::BackTab | KeyCode::Up) => Action::FocusPrev,
            (_, KeyCode::Backspace) => Action::Backspace,
            (_, KeyCode::Char(c)) if !ctrl => Action::Insert(c),
            _ => return None,
        },
        Section::Result => match key.code {
            KeyCode::Char('r') if ctrl => Action::Intent(Intent::Refine),
            KeyCode::Char('n') if ctrl => Action::Intent(Intent::NewLogo),
            KeyCode::Char('s') if ctrl => Action::Save,
            KeyCode::Char('y') if ctrl => Action::CopyPath,
            _ if is_submit(&key) => Action::Intent(Intent::Refine),
            KeyCode::Enter => Action::Newline,
            KeyCode::PageUp | KeyCode::Up => Action::ScrollUp,
            KeyCode::PageDown | KeyCode::Down => Action::ScrollDown,
            KeyCode::Backspace => Action::Backspace,
            KeyCode::Char(c) if !ctrl => Action::Insert(c),
            _ => return None,
        },
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::CONTROL)
    }

    #[test]
    fn enter_in_name_field_generates() {
        assert_eq!(
            map_key(Section::Generator, Field::CompanyName, key(KeyCode::Enter)),
            Some(Action::Intent(Intent::Generate))
        );
    }

    #[test]
    fn custom_prompt_needs_ctrl_enter() {
        let f = Field::CustomPrompt;
        assert_eq!(
            map_key(Section::Generator, f, key(KeyCode::Enter)),
            Some(Action::Newline)
        );
        assert_eq!(
            map_key(Section::Generator, f, ctrl(KeyCode::Enter)),
            Some(Action::Intent(Intent::Generate))
        );
        assert_eq!(
            map_key(Section::Generator, f, ctrl(KeyCode::Char('j'))),
            Some(Action::Intent(Intent::Generate))
        );
    }

    #[test]
    fn refinement_field_submits_refine() {
        let f = Field::Refinement;
        assert_eq!(
            map_key(Section::Result, f, ctrl(KeyCode::Enter)),
            Some(Action::Intent(Intent::Refine))
        );
        assert_eq!(
            map_key(Section::Result, f, ctrl(KeyCode::Char('r'))),
            Some(Action::Intent(Intent::Refine))
        );
        assert_eq!(
            map_key(Section::Result, f, ctrl(KeyCode::Char('n'))),
            Some(Action::Intent(Intent::NewLogo))
        );
        assert_eq!(
            map_key(Section::Result, f, ctrl(KeyCode::Char('j'))),
            Some(Action::Intent(Intent::Refine))
        );
        assert_eq!(
            map_key(Section::Result, f, key(KeyCode::Enter)),
            Some(Action::Newline)
        );
    }

    #[test]
    fn typing_inserts_and_style_cycles() {
        assert_eq!(
            map_key(Section::Generator, Field::CompanyName, key(KeyCode::Char('A'))),
            Some(Action::Insert('A'))
        );
        assert_eq!(
            map_key(Section::Generator, Field::Style, key(KeyCode::Left)),
            Some(Action::StylePrev)
        );
        assert_eq!(
            map_key(Section::Generator, Field::CompanyName, ctrl(KeyCode::Char('x'))),
            None
        );
    }

    #[test]
    fn quit_works_everywhere() {
        for (section, field) in [
            (Section::Generator, Field::CompanyName),
            (Section::Result, Field::Refinement),
        ] {
            assert_eq!(map_key(section, field, key(KeyCode::Esc)), Some(Action::Quit));
            assert_eq!(
                map_key(section, field, ctrl(KeyCode::Char('c'))),
                Some(Action::Quit)
            );
        }
    }
}
