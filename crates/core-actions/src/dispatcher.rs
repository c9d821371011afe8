//! Applies resolved editor operations to a buffer.
//!
//! The keymap turns raw keys into [`EditorOp`] values; this module is the
//! single place where those operations mutate buffer state. The frontend
//! loop is then just resolve-dispatch-redraw.

use core_keymap::EditorOp;
use core_state::{Mode, TextBuffer};

use crate::ex;
use crate::search;
use core_state::YankRegister;

/// Session-lifetime state shared across buffers and commands: the yank
/// register and the remembered search pattern.
#[derive(Debug, Default)]
pub struct Session {
    pub register: YankRegister,
    pub search: search::SearchState,
}

/// What the caller should do after an operation was applied.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    /// Buffer contents may have changed; a rescan/redraw is due.
    pub dirty: bool,
    /// The session should end.
    pub quit: bool,
}

/// Applies one operation `count` times (where repetition is meaningful).
pub fn dispatch(
    op: EditorOp,
    count: u32,
    buf: &mut TextBuffer,
    session: &mut Session,
) -> DispatchResult {
    let mut result = DispatchResult::default();
    tracing::trace!(target: "dispatch", ?op, count);

    match op {
        EditorOp::CursorUp => repeat(count, || buf.cursor_up()),
        EditorOp::CursorDown => repeat(count, || buf.cursor_down()),
        EditorOp::CursorLeft => repeat(count, || buf.cursor_left()),
        EditorOp::CursorRight => repeat(count, || buf.cursor_right()),
        EditorOp::PageForward => repeat(count, || buf.page_forward()),
        EditorOp::PageBackwards => repeat(count, || buf.page_backwards()),
        EditorOp::CursorToEol => buf.cursor_to_eol(),
        EditorOp::CursorToBol => buf.cursor_to_bol(),
        EditorOp::CursorToFirstNonBlank => buf.cursor_to_first_non_blank(),

        EditorOp::EnterInsert => {
            buf.set_mode(Mode::Insert);
            buf.status.set_message("-- INSERT --");
        }
        EditorOp::AppendInsert => {
            buf.set_mode(Mode::Insert);
            buf.cursor_right();
            buf.status.set_message("-- INSERT --");
        }
        EditorOp::LeaveInsert => {
            buf.set_mode(Mode::Command);
            buf.status.clear_message();
        }

        EditorOp::DeleteAtCursor => {
            repeat(count, || buf.delete_char_at_cursor());
            result.dirty = true;
        }
        EditorOp::DeleteBeforeCursor => {
            repeat(count, || buf.delete_char_before_cursor());
            result.dirty = true;
        }
        EditorOp::JoinLines => {
            repeat(count, || buf.join_lines());
            result.dirty = true;
        }
        EditorOp::InsertNewline => {
            buf.insert_newline();
            result.dirty = true;
        }
        EditorOp::InsertSoftTab => {
            buf.insert_soft_tab();
            result.dirty = true;
        }
        EditorOp::InsertChar(ch) => {
            buf.insert_char(ch);
            result.dirty = true;
        }

        EditorOp::RepeatFindForward => search::search(buf, &mut session.search, None, false),
        EditorOp::RepeatFindBackward => search::search(buf, &mut session.search, None, true),

        EditorOp::VisualToggle => {
            buf.visual.toggle(buf.cursor, false);
            visual_banner(buf);
        }
        EditorOp::VisualLineToggle => {
            buf.visual.toggle(buf.cursor, true);
            visual_banner(buf);
        }

        EditorOp::DeleteLines => {
            let range = line_block(buf, count);
            ex::delete_lines(buf, session, range);
            result.dirty = true;
        }
        EditorOp::YankLines => {
            let range = line_block(buf, count);
            ex::yank_lines(buf, session, range);
        }
        EditorOp::PasteAfter => result.dirty = ex::paste(buf, session),
        EditorOp::ShiftRight => {
            let range = line_block(buf, count);
            buf.shift_lines(range, true);
            result.dirty = true;
        }
        EditorOp::ShiftLeft => {
            let range = line_block(buf, count);
            buf.shift_lines(range, false);
            result.dirty = true;
        }

        EditorOp::EnterStatus(trigger) => {
            buf.status.begin(trigger);
            buf.set_mode(Mode::Status);
        }
        EditorOp::StatusInsert(ch) => buf.status.insert_char(ch),
        EditorOp::StatusLeft => buf.status.left(),
        EditorOp::StatusRight => buf.status.right(),
        EditorOp::StatusBackspace => {
            if !buf.status.backspace() {
                buf.status.cancel();
                buf.set_mode(Mode::Command);
            }
        }
        EditorOp::StatusDelete => {
            if !buf.status.delete() {
                buf.status.cancel();
                buf.set_mode(Mode::Command);
            }
        }
        EditorOp::StatusEnter => {
            let (trigger, text) = buf.status.take_input();
            buf.set_mode(Mode::Command);
            match trigger {
                '/' => search::search(buf, &mut session.search, Some(&text), false),
                '?' => search::search(buf, &mut session.search, Some(&text), true),
                _ => match ex::execute(&text, buf, session) {
                    Ok(outcome) => {
                        result.dirty = outcome.dirty;
                        result.quit = outcome.quit;
                    }
                    Err(error) => {
                        tracing::warn!(target: "dispatch", %error, "command failed");
                        buf.status.set_message(format!("-- {error} --"));
                    }
                },
            }
        }
        EditorOp::StatusCancel => {
            buf.status.cancel();
            buf.set_mode(Mode::Command);
        }

        EditorOp::Escape => {
            buf.visual.clear();
            buf.set_mode(Mode::Command);
            buf.status.clear_message();
        }
        EditorOp::Nop => {}
    }

    result
}

fn repeat(count: u32, mut f: impl FnMut()) {
    for _ in 0..count.max(1) {
        f();
    }
}

/// The line range a line-wise operation acts on: the visual selection if one
/// is armed (consumed here), otherwise `count` lines starting at the cursor.
fn line_block(buf: &mut TextBuffer, count: u32) -> std::ops::Range<usize> {
    if let Some((first, last)) = buf.visual.line_range(buf.cursor.y) {
        buf.visual.clear();
        return first..(last + 1).min(buf.line_count());
    }
    let y = buf.cursor.y;
    y..(y + count.max(1) as usize).min(buf.line_count())
}

fn visual_banner(buf: &mut TextBuffer) {
    if !buf.visual.is_active() {
        buf.status.clear_message();
    } else if buf.visual.is_linewise() {
        buf.status.set_message("-- VISUAL LINE --");
    } else {
        buf.status.set_message("-- VISUAL --");
    }
}
