//! Framework-neutral input events consumed by [`crate::controller::DropdownController`].
//!
//! Apps translate their backend's events into these types (see the `crossterm` feature for a
//! ready-made adapter) and route them to every dropdown they own.

use ratatui::layout::Position;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl KeyModifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::default()
        }
    }

    /// `true` when the key produces plain text (no ctrl/alt chord).
    pub fn is_text(&self) -> bool {
        !self.ctrl && !self.alt
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Enter,
    Backspace,
    Tab,
    Esc,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::none(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: KeyModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// The character this key inserts into a search field, if any.
    pub fn text_char(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if self.modifiers.is_text() && !c.is_control() => Some(c),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseEventKind {
    Down(MouseButton),
    Up(MouseButton),
    Drag(MouseButton),
    Moved,
    ScrollUp,
    ScrollDown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MouseEvent {
    pub x: u16,
    pub y: u16,
    pub kind: MouseEventKind,
}

impl MouseEvent {
    pub fn down(x: u16, y: u16) -> Self {
        Self {
            x,
            y,
            kind: MouseEventKind::Down(MouseButton::Left),
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Any button press counts as a pointer-down for dismissal purposes.
    pub fn is_pointer_down(&self) -> bool {
        matches!(self.kind, MouseEventKind::Down(_))
    }

    pub fn is_primary_down(&self) -> bool {
        self.kind == MouseEventKind::Down(MouseButton::Left)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Paste(String),
    Mouse(MouseEvent),
}

impl From<KeyEvent> for InputEvent {
    fn from(key: KeyEvent) -> Self {
        InputEvent::Key(key)
    }
}

impl From<MouseEvent> for InputEvent {
    fn from(mouse: MouseEvent) -> Self {
        InputEvent::Mouse(mouse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_chords_are_not_text() {
        let plain = KeyEvent::new(KeyCode::Char('a'));
        let chord = KeyEvent::new(KeyCode::Char('a')).with_modifiers(KeyModifiers::ctrl());
        assert_eq!(plain.text_char(), Some('a'));
        assert_eq!(chord.text_char(), None);
        assert_eq!(KeyEvent::new(KeyCode::Enter).text_char(), None);
    }

    #[test]
    fn every_button_press_is_a_pointer_down() {
        let right = MouseEvent {
            x: 1,
            y: 2,
            kind: MouseEventKind::Down(MouseButton::Right),
        };
        assert!(right.is_pointer_down());
        assert!(!right.is_primary_down());
        assert!(MouseEvent::down(0, 0).is_primary_down());
    }
}
