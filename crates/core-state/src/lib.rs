//! Editor state: modes, cursor, viewport, and the editable buffer.
//!
//! [`TextBuffer`] is the heart of the engine. It owns the line vector plus
//! the cursor and viewport that track it, and exposes the motions and
//! mutations the key dispatcher invokes. The derived-state rule applies
//! throughout: handlers mutate what they mean to change and then call
//! [`TextBuffer::cursor_and_viewport_adjustment`] to restore every invariant,
//! instead of each handler reimplementing clamping logic.

mod buffer;
mod registers;
mod status;
mod visual;

pub use buffer::TextBuffer;
pub use registers::YankRegister;
pub use status::StatusLineState;
pub use visual::VisualSelection;

use core_text::LineMode;

/// Columns added to `cursor.max` by end-of-line motions so the cursor sticks
/// to line ends during vertical movement. Any real line is shorter than this.
pub const STICKY_EOL: usize = 0x1_0000;

/// Major editor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Command,
    Insert,
    /// Command-line entry at the bottom of the screen (`:`, `/`, `?`).
    Status,
}

impl Mode {
    /// Cursor bound policy for this mode. Status mode keeps the buffer
    /// cursor where command mode would.
    pub fn line_mode(self) -> LineMode {
        match self {
            Mode::Insert => LineMode::Insert,
            Mode::Command | Mode::Status => LineMode::Command,
        }
    }
}

/// Buffer cursor. `max` remembers the column the user is aiming for so that
/// vertical motion through short lines snaps back out on longer ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub x: usize,
    pub y: usize,
    pub max: usize,
}

impl Cursor {
    pub fn origin() -> Self {
        Self::default()
    }
}

/// Window onto the buffer, in buffer coordinates. All four bounds are
/// inclusive; the viewport translates rather than resizes when chasing the
/// cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl Viewport {
    pub fn new(x1: usize, y1: usize) -> Self {
        Self { x0: 0, y0: 0, x1, y1 }
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }
}
