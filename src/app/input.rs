// Turns raw key events into abstract commands for the current input mode.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::model::ActionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing into the filter prompt.
    Filter,
    /// Typing an action name for the selected unit.
    Action,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveUp,
    MoveDown,
    PageNext,
    PagePrev,
    FilterStart,
    FilterChar(char),
    FilterBackspace,
    FilterCommit,
    FilterCancel,
    ActionConfirm,
    ActionKeyInput(char),
    ActionBackspace,
    ActionCancel,
    /// Dispatch straight away on the selection, skipping the prompt.
    QuickAction(ActionKind),
    Refresh,
    Quit,
}

pub fn map_key(mode: InputMode, key: KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }

    match mode {
        InputMode::Normal => map_normal(key.code),
        InputMode::Filter => match key.code {
            KeyCode::Enter => Some(Command::FilterCommit),
            KeyCode::Esc => Some(Command::FilterCancel),
            KeyCode::Backspace => Some(Command::FilterBackspace),
            KeyCode::Up => Some(Command::MoveUp),
            KeyCode::Down => Some(Command::MoveDown),
            KeyCode::Char(c) => Some(Command::FilterChar(c)),
            _ => None,
        },
        InputMode::Action => match key.code {
            KeyCode::Enter => Some(Command::ActionConfirm),
            KeyCode::Esc => Some(Command::ActionCancel),
            KeyCode::Backspace => Some(Command::ActionBackspace),
            KeyCode::Char(c) => Some(Command::ActionKeyInput(c)),
            _ => None,
        },
    }
}

fn map_normal(code: KeyCode) -> Option<Command> {
    let command = match code {
        KeyCode::Char('q') => Command::Quit,
        KeyCode::Char('j') | KeyCode::Down => Command::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Command::MoveUp,
        KeyCode::Char('l') | KeyCode::Right | KeyCode::PageDown => Command::PageNext,
        KeyCode::Char('h') | KeyCode::Left | KeyCode::PageUp => Command::PagePrev,
        KeyCode::Char('/') => Command::FilterStart,
        KeyCode::Esc => Command::FilterCancel,
        KeyCode::Enter => Command::ActionConfirm,
        KeyCode::Char('R') | KeyCode::F(5) => Command::Refresh,

        KeyCode::Char('s') => Command::QuickAction(ActionKind::Start),
        KeyCode::Char('x') => Command::QuickAction(ActionKind::Stop),
        KeyCode::Char('r') => Command::QuickAction(ActionKind::Restart),
        KeyCode::Char('e') => Command::QuickAction(ActionKind::Enable),
        KeyCode::Char('d') => Command::QuickAction(ActionKind::Disable),
        _ => return None,
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_normal_mode_bindings() {
        assert_eq!(map_key(InputMode::Normal, key(KeyCode::Char('j'))), Some(Command::MoveDown));
        assert_eq!(map_key(InputMode::Normal, key(KeyCode::Right)), Some(Command::PageNext));
        assert_eq!(map_key(InputMode::Normal, key(KeyCode::Char('/'))), Some(Command::FilterStart));
        assert_eq!(
            map_key(InputMode::Normal, key(KeyCode::Char('x'))),
            Some(Command::QuickAction(ActionKind::Stop))
        );
        assert_eq!(map_key(InputMode::Normal, key(KeyCode::Char('z'))), None);
    }

    #[test]
    fn test_letters_are_text_while_typing() {
        assert_eq!(map_key(InputMode::Filter, key(KeyCode::Char('q'))), Some(Command::FilterChar('q')));
        assert_eq!(map_key(InputMode::Action, key(KeyCode::Char('s'))), Some(Command::ActionKeyInput('s')));
        assert_eq!(map_key(InputMode::Filter, key(KeyCode::Enter)), Some(Command::FilterCommit));
        assert_eq!(map_key(InputMode::Action, key(KeyCode::Esc)), Some(Command::ActionCancel));
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        for mode in [InputMode::Normal, InputMode::Filter, InputMode::Action] {
            assert_eq!(map_key(mode, ctrl_c), Some(Command::Quit));
        }
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut release = key(KeyCode::Char('j'));
        release.kind = KeyEventKind::Release;
        assert_eq!(map_key(InputMode::Normal, release), None);
    }
}
