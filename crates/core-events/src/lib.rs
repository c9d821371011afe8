//! Input event vocabulary shared by the keymap and the frontend.
//!
//! The terminal layer decodes whatever its backend produces into a [`Key`]
//! token; everything above that point is backend-agnostic. Control chords are
//! normalized at the edge (e.g. Ctrl-F arrives here as [`Key::PageDown`]), so
//! the keymap only ever deals in logical keys.

use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Modifier state reported alongside a raw key press. Only the frontend
    /// decoder inspects these; by the time a [`Key`] reaches the keymap the
    /// interesting chords have been folded into the token itself.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct KeyModifiers: u8 {
        const SHIFT = 0b001;
        const CTRL  = 0b010;
        const ALT   = 0b100;
    }
}

/// A logical key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
    Enter,
    Esc,
    Backspace,
    Delete,
    Tab,
}

impl Key {
    /// ASCII digit carried by this key, if any. The keymap uses this to build
    /// repeat counts.
    pub fn digit(self) -> Option<u32> {
        match self {
            Key::Char(c) => c.to_digit(10),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) if c.is_control() => write!(f, "^{}", (*c as u8 + b'@') as char),
            Key::Char(c) => write!(f, "{c}"),
            Key::Up => write!(f, "<Up>"),
            Key::Down => write!(f, "<Down>"),
            Key::Left => write!(f, "<Left>"),
            Key::Right => write!(f, "<Right>"),
            Key::PageUp => write!(f, "<PageUp>"),
            Key::PageDown => write!(f, "<PageDown>"),
            Key::Home => write!(f, "<Home>"),
            Key::End => write!(f, "<End>"),
            Key::Enter => write!(f, "<CR>"),
            Key::Esc => write!(f, "<Esc>"),
            Key::Backspace => write!(f, "<BS>"),
            Key::Delete => write!(f, "<Del>"),
            Key::Tab => write!(f, "<Tab>"),
        }
    }
}

/// Events delivered to the main loop by the terminal layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Key(Key),
    /// New terminal dimensions in columns and rows.
    Resize(u16, u16),
}
