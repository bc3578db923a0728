//! Keyboard input
//!
//! Held keys drive the paddles; presses drive the menus. The most recent
//! key-down/up wins, there is no queue.

use serde::{Deserialize, Serialize};

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    W,
    S,
    P,
    Enter,
    Space,
    Escape,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(name: &str) -> Option<Self> {
        match name {
            "ArrowUp" => Some(Key::ArrowUp),
            "ArrowDown" => Some(Key::ArrowDown),
            "w" | "W" => Some(Key::W),
            "s" | "S" => Some(Key::S),
            "p" | "P" => Some(Key::P),
            "Enter" => Some(Key::Enter),
            " " | "Spacebar" => Some(Key::Space),
            "Escape" | "Esc" => Some(Key::Escape),
            _ => None,
        }
    }

    pub fn is_confirm(self) -> bool {
        matches!(self, Key::Enter | Key::Space)
    }

    pub fn is_cancel(self) -> bool {
        self == Key::Escape
    }

    pub fn is_nav_up(self) -> bool {
        matches!(self, Key::ArrowUp | Key::W)
    }

    pub fn is_nav_down(self) -> bool {
        matches!(self, Key::ArrowDown | Key::S)
    }

    pub fn is_pause(self) -> bool {
        matches!(self, Key::Escape | Key::P)
    }

    /// Keys the browser would otherwise use to scroll the page
    pub fn suppresses_default(name: &str) -> bool {
        matches!(
            name,
            "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight" | " "
        )
    }
}

/// Currently held paddle keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub up: bool,
    pub down: bool,
    pub w: bool,
    pub s: bool,
}

impl HeldKeys {
    pub fn set(&mut self, key: Key, pressed: bool) {
        match key {
            Key::ArrowUp => self.up = pressed,
            Key::ArrowDown => self.down = pressed,
            Key::W => self.w = pressed,
            Key::S => self.s = pressed,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dom() {
        assert_eq!(Key::from_dom("w"), Some(Key::W));
        assert_eq!(Key::from_dom("W"), Some(Key::W));
        assert_eq!(Key::from_dom(" "), Some(Key::Space));
        assert_eq!(Key::from_dom("Shift"), None);
    }

    #[test]
    fn test_key_roles() {
        assert!(Key::Enter.is_confirm() && Key::Space.is_confirm());
        assert!(Key::Escape.is_cancel() && Key::Escape.is_pause());
        assert!(Key::P.is_pause() && !Key::P.is_cancel());
        assert!(Key::W.is_nav_up() && Key::S.is_nav_down());
    }

    #[test]
    fn test_held_keys_last_event_wins() {
        let mut keys = HeldKeys::default();
        keys.set(Key::ArrowUp, true);
        keys.set(Key::Enter, true);
        assert!(keys.up);
        keys.set(Key::ArrowUp, false);
        assert_eq!(keys, HeldKeys::default());
    }
}
