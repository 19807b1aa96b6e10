use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::KeyModifiers;

/// Keyboard commands understood by a dropdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropdownCommand {
    Open,
    Close,
    Next,
    Previous,
    First,
    Last,
    Confirm,
    SelectAll,
    ClearAll,
}

/// Key bindings for dropdown interaction.
///
/// `open` only applies while the panel is closed; everything else only while it is open.
/// Bindings are matched with exact modifiers, so `Ctrl+A` never collides with typing `a`
/// into the search field.
#[derive(Clone, Debug)]
pub struct DropdownBindings {
    pub open: Vec<KeyEvent>,
    pub close: Vec<KeyEvent>,
    pub next: Vec<KeyEvent>,
    pub previous: Vec<KeyEvent>,
    pub first: Vec<KeyEvent>,
    pub last: Vec<KeyEvent>,
    pub confirm: Vec<KeyEvent>,
    pub select_all: Vec<KeyEvent>,
    pub clear_all: Vec<KeyEvent>,
}

impl Default for DropdownBindings {
    fn default() -> Self {
        Self {
            open: vec![
                KeyEvent::new(KeyCode::Enter),
                KeyEvent::new(KeyCode::Down),
                key_char(' '),
            ],
            close: vec![KeyEvent::new(KeyCode::Esc)],
            next: vec![KeyEvent::new(KeyCode::Down)],
            previous: vec![KeyEvent::new(KeyCode::Up)],
            first: vec![KeyEvent::new(KeyCode::Home)],
            last: vec![KeyEvent::new(KeyCode::End)],
            confirm: vec![KeyEvent::new(KeyCode::Enter)],
            select_all: vec![key_ctrl('a')],
            clear_all: vec![key_ctrl('d')],
        }
    }
}

impl DropdownBindings {
    /// Resolves `key` against the bindings that apply in the given open state.
    pub fn command_for(&self, key: &KeyEvent, open: bool) -> Option<DropdownCommand> {
        if !open {
            return any_matches(&self.open, key).then_some(DropdownCommand::Open);
        }
        let table: [(&[KeyEvent], DropdownCommand); 8] = [
            (&self.close, DropdownCommand::Close),
            (&self.next, DropdownCommand::Next),
            (&self.previous, DropdownCommand::Previous),
            (&self.first, DropdownCommand::First),
            (&self.last, DropdownCommand::Last),
            (&self.confirm, DropdownCommand::Confirm),
            (&self.select_all, DropdownCommand::SelectAll),
            (&self.clear_all, DropdownCommand::ClearAll),
        ];
        table
            .into_iter()
            .find(|(keys, _)| any_matches(keys, key))
            .map(|(_, cmd)| cmd)
    }
}

fn any_matches(patterns: &[KeyEvent], key: &KeyEvent) -> bool {
    patterns.iter().any(|p| key_event_matches(p, key))
}

pub fn key_event_matches(pattern: &KeyEvent, event: &KeyEvent) -> bool {
    pattern.code == event.code && pattern.modifiers == event.modifiers
}

pub fn key_char(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c))
}

pub fn key_ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c)).with_modifiers(KeyModifiers::ctrl())
}
