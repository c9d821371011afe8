//! Modal key dispatch: maps `(mode, key)` to editor operations.
//!
//! The [`Keymap`] is an explicit step machine. Each key fed to
//! [`Keymap::resolve`] either produces an operation (with its repeat count)
//! or reports that more input is pending — a partially typed multi-key
//! sequence such as `dd`, or an accumulating count prefix. All pending state
//! lives in two fields, `pending_multikey` and `pending_count`, so the
//! machine can always be inspected and reset.

use std::collections::HashMap;

use core_events::Key;
use core_state::Mode;
use tracing::trace;

/// Everything the dispatcher knows how to do. One value per bound editing
/// operation; payload-carrying variants cover the default handlers that
/// insert the pressed character itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorOp {
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    PageForward,
    PageBackwards,
    CursorToEol,
    CursorToBol,
    CursorToFirstNonBlank,
    EnterInsert,
    AppendInsert,
    LeaveInsert,
    DeleteAtCursor,
    DeleteBeforeCursor,
    JoinLines,
    InsertNewline,
    InsertSoftTab,
    InsertChar(char),
    RepeatFindForward,
    RepeatFindBackward,
    VisualToggle,
    VisualLineToggle,
    DeleteLines,
    YankLines,
    PasteAfter,
    ShiftRight,
    ShiftLeft,
    /// Open the status prompt seeded with the trigger character.
    EnterStatus(char),
    StatusInsert(char),
    StatusLeft,
    StatusRight,
    StatusBackspace,
    StatusDelete,
    StatusEnter,
    StatusCancel,
    /// Command-mode escape: abandons pending input and the visual selection.
    Escape,
    /// Unbound key in command mode.
    Nop,
}

/// Outcome of feeding one key to the keymap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Dispatch `op`, `count` times.
    Act { op: EditorOp, count: u32 },
    /// Key absorbed into pending count or multi-key state.
    Pending,
}

/// Per-mode binding tables plus the pending-input state machine.
pub struct Keymap {
    command: HashMap<Key, EditorOp>,
    insert: HashMap<Key, EditorOp>,
    status: HashMap<Key, EditorOp>,
    /// Multi-key command sequences, command mode only.
    sequences: Vec<(&'static str, EditorOp)>,
    pending_multikey: Option<String>,
    pending_count: Option<u32>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::with_default_bindings()
    }
}

impl Keymap {
    pub fn with_default_bindings() -> Self {
        use EditorOp::*;
        use Key::*;

        let command = HashMap::from([
            (Char('k'), CursorUp),
            (Up, CursorUp),
            (Char('-'), CursorUp),
            (Char('j'), CursorDown),
            (Down, CursorDown),
            (Char('+'), CursorDown),
            (Enter, CursorDown),
            (Char('h'), CursorLeft),
            (Left, CursorLeft),
            (Char('l'), CursorRight),
            (Right, CursorRight),
            (Char(' '), CursorRight),
            (PageDown, PageForward),
            (PageUp, PageBackwards),
            (Char('$'), CursorToEol),
            (End, CursorToEol),
            (Char('0'), CursorToBol),
            (Home, CursorToBol),
            (Char('^'), CursorToFirstNonBlank),
            (Char('i'), EnterInsert),
            (Char('a'), AppendInsert),
            (Char('x'), DeleteAtCursor),
            (Delete, DeleteAtCursor),
            (Char('X'), DeleteBeforeCursor),
            (Char('J'), JoinLines),
            (Char('n'), RepeatFindForward),
            (Char('N'), RepeatFindBackward),
            (Char('v'), VisualToggle),
            (Char('V'), VisualLineToggle),
            (Char('p'), PasteAfter),
            (Char(':'), EnterStatus(':')),
            (Char('/'), EnterStatus('/')),
            (Char('?'), EnterStatus('?')),
            (Esc, Escape),
        ]);

        let insert = HashMap::from([
            (Esc, LeaveInsert),
            (Up, CursorUp),
            (Down, CursorDown),
            (Left, CursorLeft),
            (Right, CursorRight),
            (PageDown, PageForward),
            (PageUp, PageBackwards),
            (Home, CursorToBol),
            (End, CursorToEol),
            (Enter, InsertNewline),
            (Tab, InsertSoftTab),
            (Backspace, DeleteBeforeCursor),
            (Delete, DeleteAtCursor),
        ]);

        let status = HashMap::from([
            (Enter, StatusEnter),
            (Esc, StatusCancel),
            (Left, StatusLeft),
            (Right, StatusRight),
            (Backspace, StatusBackspace),
            (Delete, StatusDelete),
        ]);

        let sequences = vec![
            ("dd", DeleteLines),
            ("yy", YankLines),
            (">>", ShiftRight),
            ("<<", ShiftLeft),
        ];

        Self {
            command,
            insert,
            status,
            sequences,
            pending_multikey: None,
            pending_count: None,
        }
    }

    /// Pending repeat count, for status display.
    pub fn pending_count(&self) -> Option<u32> {
        self.pending_count
    }

    /// Drops all pending input state.
    pub fn reset(&mut self) {
        self.pending_multikey = None;
        self.pending_count = None;
    }

    fn take_count(&mut self) -> u32 {
        self.pending_count.take().unwrap_or(1).max(1)
    }

    /// Feeds one key in `mode`. Multi-key sequences and counts exist only in
    /// command mode; the other modes resolve in a single step through their
    /// table or default handler.
    pub fn resolve(&mut self, mode: Mode, key: Key) -> Resolution {
        match mode {
            Mode::Command => self.resolve_command(key),
            Mode::Insert => Self::resolve_simple(&self.insert, key, EditorOp::InsertChar),
            Mode::Status => Self::resolve_simple(&self.status, key, EditorOp::StatusInsert),
        }
    }

    fn resolve_simple(
        table: &HashMap<Key, EditorOp>,
        key: Key,
        default: fn(char) -> EditorOp,
    ) -> Resolution {
        let op = match table.get(&key) {
            Some(op) => *op,
            None => match key {
                Key::Char(c) if !c.is_control() => default(c),
                _ => EditorOp::Nop,
            },
        };
        Resolution::Act { op, count: 1 }
    }

    fn resolve_command(&mut self, key: Key) -> Resolution {
        if let Some(mut seq) = self.pending_multikey.take() {
            let Key::Char(c) = key else {
                return self.escape();
            };
            seq.push(c);
            let matched = self
                .sequences
                .iter()
                .find(|(s, _)| *s == seq)
                .map(|(_, op)| *op);
            if let Some(op) = matched {
                let count = self.take_count();
                trace!(target: "keymap", sequence = %seq, ?op, count, "sequence resolved");
                return Resolution::Act { op, count };
            }
            if self.sequences.iter().any(|(s, _)| s.starts_with(&*seq)) {
                self.pending_multikey = Some(seq);
                return Resolution::Pending;
            }
            return self.escape();
        }

        if let Some(d) = key.digit()
            && !(d == 0 && self.pending_count.is_none())
        {
            let count = self
                .pending_count
                .unwrap_or(0)
                .saturating_mul(10)
                .saturating_add(d);
            self.pending_count = Some(count);
            return Resolution::Pending;
        }

        if let Key::Char(c) = key
            && !self.command.contains_key(&key)
            && self.sequences.iter().any(|(s, _)| s.starts_with(c))
        {
            self.pending_multikey = Some(c.to_string());
            return Resolution::Pending;
        }

        match self.command.get(&key) {
            Some(&op) => {
                let count = self.take_count();
                Resolution::Act { op, count }
            }
            None => {
                self.pending_count = None;
                Resolution::Act {
                    op: EditorOp::Nop,
                    count: 1,
                }
            }
        }
    }

    fn escape(&mut self) -> Resolution {
        self.reset();
        Resolution::Act {
            op: EditorOp::Escape,
            count: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn feed(map: &mut Keymap, mode: Mode, keys: &str) -> Vec<Resolution> {
        keys.chars()
            .map(|c| map.resolve(mode, Key::Char(c)))
            .collect()
    }

    fn act(op: EditorOp, count: u32) -> Resolution {
        Resolution::Act { op, count }
    }

    #[test]
    fn single_key_command_bindings() {
        let mut map = Keymap::default();
        assert_eq!(
            feed(&mut map, Mode::Command, "j"),
            vec![act(EditorOp::CursorDown, 1)]
        );
        assert_eq!(
            map.resolve(Mode::Command, Key::Up),
            act(EditorOp::CursorUp, 1)
        );
        assert_eq!(
            map.resolve(Mode::Command, Key::Enter),
            act(EditorOp::CursorDown, 1)
        );
    }

    #[test]
    fn count_prefix_multiplies_next_command() {
        let mut map = Keymap::default();
        let out = feed(&mut map, Mode::Command, "12j");
        assert_eq!(
            out,
            vec![
                Resolution::Pending,
                Resolution::Pending,
                act(EditorOp::CursorDown, 12),
            ]
        );
        // count consumed
        assert_eq!(
            feed(&mut map, Mode::Command, "j"),
            vec![act(EditorOp::CursorDown, 1)]
        );
    }

    #[test]
    fn bare_zero_is_beginning_of_line() {
        let mut map = Keymap::default();
        assert_eq!(
            feed(&mut map, Mode::Command, "0"),
            vec![act(EditorOp::CursorToBol, 1)]
        );
        // but zero participates in counts once one is started
        let out = feed(&mut map, Mode::Command, "10j");
        assert_eq!(out[2], act(EditorOp::CursorDown, 10));
    }

    #[test]
    fn two_key_sequences_resolve() {
        let mut map = Keymap::default();
        assert_eq!(
            feed(&mut map, Mode::Command, "dd"),
            vec![Resolution::Pending, act(EditorOp::DeleteLines, 1)]
        );
        assert_eq!(
            feed(&mut map, Mode::Command, "yy"),
            vec![Resolution::Pending, act(EditorOp::YankLines, 1)]
        );
        assert_eq!(
            feed(&mut map, Mode::Command, ">>"),
            vec![Resolution::Pending, act(EditorOp::ShiftRight, 1)]
        );
    }

    #[test]
    fn count_applies_to_sequences() {
        let mut map = Keymap::default();
        let out = feed(&mut map, Mode::Command, "3dd");
        assert_eq!(out[2], act(EditorOp::DeleteLines, 3));
    }

    #[test]
    fn broken_sequence_escapes_and_resets() {
        let mut map = Keymap::default();
        let out = feed(&mut map, Mode::Command, "dx");
        assert_eq!(
            out,
            vec![Resolution::Pending, act(EditorOp::Escape, 1)]
        );
        // machine is clean again
        assert_eq!(
            feed(&mut map, Mode::Command, "x"),
            vec![act(EditorOp::DeleteAtCursor, 1)]
        );
    }

    #[test]
    fn non_char_key_breaks_a_sequence() {
        let mut map = Keymap::default();
        feed(&mut map, Mode::Command, "d");
        assert_eq!(
            map.resolve(Mode::Command, Key::Enter),
            act(EditorOp::Escape, 1)
        );
    }

    #[test]
    fn unbound_command_key_is_a_nop_and_clears_count() {
        let mut map = Keymap::default();
        let out = feed(&mut map, Mode::Command, "5e");
        assert_eq!(out[1], act(EditorOp::Nop, 1));
        assert_eq!(map.pending_count(), None);
    }

    #[test]
    fn insert_mode_defaults_to_self_insert() {
        let mut map = Keymap::default();
        assert_eq!(
            feed(&mut map, Mode::Insert, "q"),
            vec![act(EditorOp::InsertChar('q'), 1)]
        );
        assert_eq!(
            map.resolve(Mode::Insert, Key::Esc),
            act(EditorOp::LeaveInsert, 1)
        );
        // digits are literal text in insert mode
        assert_eq!(
            feed(&mut map, Mode::Insert, "3"),
            vec![act(EditorOp::InsertChar('3'), 1)]
        );
    }

    #[test]
    fn status_mode_defaults_to_prompt_insert() {
        let mut map = Keymap::default();
        assert_eq!(
            feed(&mut map, Mode::Status, "w"),
            vec![act(EditorOp::StatusInsert('w'), 1)]
        );
        assert_eq!(
            map.resolve(Mode::Status, Key::Enter),
            act(EditorOp::StatusEnter, 1)
        );
        assert_eq!(
            map.resolve(Mode::Status, Key::Esc),
            act(EditorOp::StatusCancel, 1)
        );
    }

    #[test]
    fn prompt_triggers_carry_their_character() {
        let mut map = Keymap::default();
        assert_eq!(
            feed(&mut map, Mode::Command, ":"),
            vec![act(EditorOp::EnterStatus(':'), 1)]
        );
        assert_eq!(
            feed(&mut map, Mode::Command, "/"),
            vec![act(EditorOp::EnterStatus('/'), 1)]
        );
        assert_eq!(
            feed(&mut map, Mode::Command, "?"),
            vec![act(EditorOp::EnterStatus('?'), 1)]
        );
    }
}
