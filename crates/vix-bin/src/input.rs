//! Decodes crossterm events into the editor's key model.

use core_events::{Event, Key, KeyModifiers};
use crossterm::event::{Event as CtEvent, KeyCode, KeyEventKind, KeyModifiers as CtModifiers};

/// Maps one terminal event to an editor event. Release/repeat key events and
/// event kinds the editor has no use for decode to `None`.
pub fn decode(event: CtEvent) -> Option<Event> {
    match event {
        CtEvent::Key(key) => {
            if key.kind != KeyEventKind::Press {
                return None;
            }
            decode_key(key.code, decode_modifiers(key.modifiers)).map(Event::Key)
        }
        CtEvent::Resize(cols, rows) => Some(Event::Resize(cols, rows)),
        _ => None,
    }
}

fn decode_modifiers(m: CtModifiers) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if m.contains(CtModifiers::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    if m.contains(CtModifiers::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if m.contains(CtModifiers::ALT) {
        out |= KeyModifiers::ALT;
    }
    out
}

fn decode_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Key> {
    if modifiers.contains(KeyModifiers::CTRL) {
        // classic paging chords
        return match code {
            KeyCode::Char('f') => Some(Key::PageDown),
            KeyCode::Char('b') => Some(Key::PageUp),
            _ => None,
        };
    }
    let key = match code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Tab => Key::Tab,
        _ => return None,
    };
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    #[test]
    fn printable_key_decodes_to_char() {
        let event = CtEvent::Key(KeyEvent::new(KeyCode::Char('x'), CtModifiers::NONE));
        assert_eq!(decode(event), Some(Event::Key(Key::Char('x'))));
    }

    #[test]
    fn control_paging_chords_normalize_to_page_keys() {
        let fwd = CtEvent::Key(KeyEvent::new(KeyCode::Char('f'), CtModifiers::CONTROL));
        let back = CtEvent::Key(KeyEvent::new(KeyCode::Char('b'), CtModifiers::CONTROL));
        assert_eq!(decode(fwd), Some(Event::Key(Key::PageDown)));
        assert_eq!(decode(back), Some(Event::Key(Key::PageUp)));
    }

    #[test]
    fn unmapped_keys_are_dropped() {
        let event = CtEvent::Key(KeyEvent::new(KeyCode::F(5), CtModifiers::NONE));
        assert_eq!(decode(event), None);
    }

    #[test]
    fn modifier_state_translates_bit_for_bit() {
        assert_eq!(decode_modifiers(CtModifiers::NONE), KeyModifiers::empty());
        assert_eq!(
            decode_modifiers(CtModifiers::CONTROL | CtModifiers::SHIFT),
            KeyModifiers::CTRL | KeyModifiers::SHIFT,
        );
        assert_eq!(decode_modifiers(CtModifiers::ALT), KeyModifiers::ALT);
    }
}
