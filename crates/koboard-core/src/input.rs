//! Pointer and keyboard events fed into the editor.

use crate::shapes::Anchor;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Move {
        position: Point,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    DoubleClick {
        position: Point,
    },
    Scroll {
        position: Point,
        delta: Vec2,
        modifiers: Modifiers,
    },
}

/// Logical key of a key press.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Character(char),
    Delete,
    Backspace,
    Enter,
    Escape,
}

/// Keyboard event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Command-modified character press, case-insensitive.
    pub fn is_command(&self, c: char) -> bool {
        self.modifiers.command()
            && matches!(self.key, Key::Character(k) if k.eq_ignore_ascii_case(&c))
    }
}

/// Cursor the surface should show for the current hover position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorIcon {
    Default,
    Move,
    Crosshair,
    Grabbing,
    Resize(Anchor),
}

impl CursorIcon {
    /// CSS cursor name.
    pub fn css_name(self) -> &'static str {
        match self {
            CursorIcon::Default => "default",
            CursorIcon::Move => "move",
            CursorIcon::Crosshair => "crosshair",
            CursorIcon::Grabbing => "grabbing",
            CursorIcon::Resize(Anchor::Nw | Anchor::Se) => "nwse-resize",
            CursorIcon::Resize(Anchor::Ne | Anchor::Sw) => "nesw-resize",
            CursorIcon::Resize(Anchor::N | Anchor::S) => "ns-resize",
            CursorIcon::Resize(Anchor::E | Anchor::W) => "ew-resize",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_modifier() {
        assert!(Modifiers::ctrl().command());
        assert!(Modifiers { meta: true, ..Modifiers::NONE }.command());
        assert!(!Modifiers::shift().command());
    }

    #[test]
    fn test_is_command_ignores_case() {
        let event = KeyEvent::new(Key::Character('Z'), Modifiers { ctrl: true, shift: true, ..Modifiers::NONE });
        assert!(event.is_command('z'));
        assert!(!KeyEvent::new(Key::Character('z'), Modifiers::NONE).is_command('z'));
    }

    #[test]
    fn test_cursor_names() {
        assert_eq!(CursorIcon::Resize(Anchor::Se).css_name(), "nwse-resize");
        assert_eq!(CursorIcon::Resize(Anchor::W).css_name(), "ew-resize");
    }
}
