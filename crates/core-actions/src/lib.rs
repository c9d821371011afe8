//! Editing operations: the dispatcher, the ex-command engine, search, and
//! file I/O.
//!
//! This crate sits between the keymap and the buffer. The keymap turns keys
//! into [`core_keymap::EditorOp`] values; [`dispatch`] applies them to a
//! [`core_state::TextBuffer`] together with the [`Session`] state (yank
//! register, remembered search pattern) that outlives any single buffer.

pub mod dispatcher;
pub mod ex;
pub mod io_ops;
pub mod search;

pub use dispatcher::{DispatchResult, Session, dispatch};
pub use ex::{ExError, ExOutcome};
pub use io_ops::{IoError, OpenFileResult, open_file, write_file};
pub use search::SearchState;
