//! The editable buffer: line storage plus cursor, viewport, and motions.

use std::ops::Range;
use std::path::PathBuf;

use core_text::{Highlighter, Line};

use crate::{Cursor, Mode, STICKY_EOL, StatusLineState, Viewport, VisualSelection};

/// A single editable document with its cursor, viewport, and mode.
///
/// The buffer never holds zero lines; an empty document is one line whose
/// only cell is the terminator. Mutation handlers change what they mean to
/// change and then call
/// [`cursor_and_viewport_adjustment`](TextBuffer::cursor_and_viewport_adjustment)
/// to restore the invariants, rather than each handler clamping by hand.
pub struct TextBuffer {
    lines: Vec<Line>,
    pub cursor: Cursor,
    pub viewport: Viewport,
    /// Page size used by page motions. Fixed at construction/resize; the
    /// viewport bounds translate, this does not.
    height: usize,
    pub mode: Mode,
    pub path: Option<PathBuf>,
    pub visual: VisualSelection,
    pub status: StatusLineState,
    tab_stop: usize,
    highlighter: Option<Box<dyn Highlighter>>,
}

impl TextBuffer {
    /// Creates an empty buffer viewing a text area of `cols` x `rows` cells.
    pub fn new(cols: usize, rows: usize) -> Self {
        let x1 = cols.saturating_sub(1);
        let y1 = rows.saturating_sub(1);
        Self {
            lines: vec![Line::empty()],
            cursor: Cursor::origin(),
            viewport: Viewport::new(x1, y1),
            height: y1,
            mode: Mode::Command,
            path: None,
            visual: VisualSelection::default(),
            status: StatusLineState::default(),
            tab_stop: 4,
            highlighter: None,
        }
    }

    /// Replaces the buffer contents, resetting cursor and viewport to the
    /// origin. An empty line vector becomes a single empty line.
    pub fn load(&mut self, mut lines: Vec<Line>, path: Option<PathBuf>) {
        if lines.is_empty() {
            lines.push(Line::empty());
        }
        let count = lines.len();
        self.lines = lines;
        self.path = path;
        self.cursor = Cursor::origin();
        let dx = self.viewport.x1 - self.viewport.x0;
        let dy = self.viewport.y1 - self.viewport.y0;
        self.viewport = Viewport::new(dx, dy);
        self.visual.clear();
        self.rescan(0..count);
    }

    pub fn set_tab_stop(&mut self, tab_stop: usize) {
        self.tab_stop = tab_stop.max(1);
    }

    pub fn tab_stop(&self) -> usize {
        self.tab_stop
    }

    pub fn set_highlighter(&mut self, highlighter: Box<dyn Highlighter>) {
        let count = self.lines.len();
        self.highlighter = Some(highlighter);
        self.rescan(0..count);
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, y: usize) -> &Line {
        &self.lines[y]
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn current_line(&self) -> &Line {
        &self.lines[self.cursor.y]
    }

    /// Switches mode. Leaving insert mode re-clamps the cursor, which may sit
    /// on the terminator cell while inserting.
    pub fn set_mode(&mut self, mode: Mode) {
        let was_insert = self.mode == Mode::Insert;
        self.mode = mode;
        if was_insert
            && mode != Mode::Insert
            && let Some(last) = self.current_line().last_editable_index(mode.line_mode())
            && self.cursor.x > last
        {
            self.cursor.x = last;
        }
        tracing::debug!(target: "state.mode", ?mode, "mode switch");
    }

    /// Runs the highlight hook over `dirty`, when one is installed.
    pub fn rescan(&mut self, dirty: Range<usize>) {
        if let Some(h) = self.highlighter.as_mut() {
            let end = dirty.end.min(self.lines.len());
            let start = dirty.start.min(end);
            h.rescan(&mut self.lines, start..end);
        }
    }

    // ---------------------------------------------------------------------
    // Invariant restoration
    // ---------------------------------------------------------------------

    /// Clamps the cursor line into the buffer and reconciles the column with
    /// the current line's editable bound. `cursor.max` carries the intended
    /// column across lines too short to honor it.
    fn cursor_adjustment(&mut self) {
        if self.cursor.y >= self.lines.len() {
            self.cursor.y = self.lines.len() - 1;
        }
        match self.lines[self.cursor.y].last_editable_index(self.mode.line_mode()) {
            None => self.cursor.x = 0,
            Some(last) => {
                if self.cursor.max > self.cursor.x {
                    self.cursor.x = if last >= self.cursor.max {
                        self.cursor.max
                    } else {
                        last
                    };
                } else if last < self.cursor.x {
                    self.cursor.max = self.cursor.x;
                    self.cursor.x = last;
                }
            }
        }
    }

    /// Translates the viewport the minimal distance needed to contain the
    /// cursor. Never changes the viewport's size.
    fn viewport_adjustment(&mut self) {
        let vp = &mut self.viewport;
        let c = self.cursor;
        if c.x > vp.x1 {
            let d = c.x - vp.x1;
            vp.x0 += d;
            vp.x1 += d;
        } else if c.x < vp.x0 {
            let d = vp.x0 - c.x;
            vp.x0 -= d;
            vp.x1 -= d;
        }
        if c.y > vp.y1 {
            let d = c.y - vp.y1;
            vp.y0 += d;
            vp.y1 += d;
        } else if c.y < vp.y0 {
            let d = vp.y0 - c.y;
            vp.y0 -= d;
            vp.y1 -= d;
        }
        debug_assert!(vp.contains(c.x, c.y));
    }

    /// The one entry point mutation handlers call after changing anything.
    /// Idempotent; safe to call when nothing moved.
    pub fn cursor_and_viewport_adjustment(&mut self) {
        self.cursor_adjustment();
        self.viewport_adjustment();
    }

    /// Resizes the text area, keeping the viewport origin and re-deriving
    /// the bottom-right bounds.
    pub fn resize(&mut self, cols: usize, rows: usize) {
        let w = cols.saturating_sub(1);
        let h = rows.saturating_sub(1);
        self.viewport.x1 = self.viewport.x0 + w;
        self.viewport.y1 = self.viewport.y0 + h;
        self.height = h;
        self.cursor_and_viewport_adjustment();
    }

    // ---------------------------------------------------------------------
    // Motions
    // ---------------------------------------------------------------------

    pub fn cursor_up(&mut self) {
        if self.cursor.y > 0 {
            self.cursor.y -= 1;
            self.cursor_and_viewport_adjustment();
        }
    }

    pub fn cursor_down(&mut self) {
        if self.cursor.y + 1 < self.lines.len() {
            self.cursor.y += 1;
            self.cursor_and_viewport_adjustment();
        }
    }

    /// Moves one column left. Crossing a `tab_stop`-aligned boundary whose
    /// preceding run is all spaces hops the whole soft tab. Deliberate
    /// horizontal motion resets `cursor.max`.
    pub fn cursor_left(&mut self) {
        let ts = self.tab_stop;
        let x = self.cursor.x;
        if x == 0 {
            return;
        }
        if x >= ts
            && x % ts == 0
            && self.lines[self.cursor.y].all_spaces(x - ts..x - 1)
        {
            self.cursor.x -= ts - 1;
        }
        self.cursor.x -= 1;
        self.cursor.max = self.cursor.x;
        self.cursor_and_viewport_adjustment();
    }

    /// Moves one column right, refusing to pass the mode's editable bound.
    /// Soft-tab runs are hopped as a unit, mirroring [`cursor_left`].
    pub fn cursor_right(&mut self) {
        let ts = self.tab_stop;
        let line = &self.lines[self.cursor.y];
        let Some(last) = line.last_editable_index(self.mode.line_mode()) else {
            return;
        };
        let x = self.cursor.x;
        if last <= x {
            return;
        }
        if x % ts == 0 && line.len() > x + ts && line.all_spaces(x..x + ts) {
            self.cursor.x += ts - 1;
        }
        self.cursor.x += 1;
        self.cursor.max = self.cursor.x;
        self.cursor_and_viewport_adjustment();
    }

    pub fn cursor_to_bol(&mut self) {
        self.cursor.x = 0;
        self.cursor.max = 0;
        self.cursor_and_viewport_adjustment();
    }

    /// Jumps to end of line and arms the sticky-EOL bias so subsequent
    /// vertical motion hugs line ends.
    pub fn cursor_to_eol(&mut self) {
        let bound = self.lines[self.cursor.y].last_editable_index(self.mode.line_mode());
        self.cursor.x = bound.unwrap_or(0);
        self.cursor.max = self.cursor.x + STICKY_EOL;
        self.cursor_and_viewport_adjustment();
    }

    pub fn cursor_to_first_non_blank(&mut self) {
        let x = self.lines[self.cursor.y].first_non_blank();
        self.cursor.x = x;
        self.cursor.max = x;
        self.cursor_and_viewport_adjustment();
    }

    /// Scrolls forward one page minus a line of overlap, parking the cursor
    /// on the new top row.
    pub fn page_forward(&mut self) {
        let mut delta = self.height.saturating_sub(1);
        if self.viewport.y0 + delta > self.lines.len() {
            delta = self.lines.len() - self.viewport.y0 - 1;
        }
        self.viewport.y0 += delta;
        self.viewport.y1 += delta;
        self.cursor.y = self.viewport.y0;
        tracing::trace!(target: "state.motion", delta, "page forward");
        self.cursor_and_viewport_adjustment();
    }

    /// Scrolls back one page minus a line of overlap, parking the cursor on
    /// the new bottom row.
    pub fn page_backwards(&mut self) {
        let mut delta = self.height.saturating_sub(1);
        if delta > self.viewport.y0 {
            delta = self.viewport.y0;
        }
        self.viewport.y0 -= delta;
        self.viewport.y1 -= delta;
        self.cursor.y = self.viewport.y1.min(self.lines.len() - 1);
        tracing::trace!(target: "state.motion", delta, "page backwards");
        self.cursor_and_viewport_adjustment();
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Inserts one character at the cursor and advances a column.
    pub fn insert_char(&mut self, ch: char) {
        let y = self.cursor.y;
        self.lines[y].insert_char(self.cursor.x, ch);
        self.cursor.x += 1;
        self.cursor.max = self.cursor.x;
        self.cursor_and_viewport_adjustment();
        self.rescan(y..y + 1);
    }

    /// Inserts spaces up to the next `tab_stop` boundary.
    pub fn insert_soft_tab(&mut self) {
        let n = self.tab_stop - self.cursor.x % self.tab_stop;
        for _ in 0..n {
            self.insert_char(' ');
        }
    }

    /// Splits the current line at the cursor, moving to the start of the new
    /// successor line.
    pub fn insert_newline(&mut self) {
        let y = self.cursor.y;
        let tail = self.lines[y].split_off(self.cursor.x);
        self.lines.insert(y + 1, tail);
        self.cursor.x = 0;
        self.cursor.max = 0;
        self.cursor.y += 1;
        self.cursor_and_viewport_adjustment();
        self.rescan(y..self.lines.len());
    }

    /// Deletes the character under the cursor. A contentless line is removed
    /// outright; a cursor parked on the terminator delegates to
    /// [`delete_char_before_cursor`](TextBuffer::delete_char_before_cursor);
    /// an aligned all-space soft tab run is removed as a unit.
    pub fn delete_char_at_cursor(&mut self) {
        let y = self.cursor.y;
        let x = self.cursor.x;
        let len = self.lines[y].len();
        if len == 1 {
            if self.lines.len() > 1 {
                self.lines.remove(y);
            }
            self.cursor_and_viewport_adjustment();
            self.rescan(y..self.lines.len());
            return;
        }
        if x == len - 1 {
            self.delete_char_before_cursor();
            return;
        }
        let ts = self.tab_stop;
        let line = &mut self.lines[y];
        if x % ts == 0 && len > x + ts && line.all_spaces(x..x + ts) {
            for _ in 0..ts {
                line.delete_char(x);
            }
        } else {
            line.delete_char(x);
        }
        self.cursor_and_viewport_adjustment();
        self.rescan(y..y + 1);
    }

    /// Deletes the character before the cursor. At column 0 of a non-first
    /// line the current line is joined, untrimmed, onto its predecessor with
    /// the cursor landing on the seam; otherwise this moves left and deletes
    /// at the cursor, which folds in the soft-tab unit handling.
    pub fn delete_char_before_cursor(&mut self) {
        if self.cursor.x == 0 {
            let y = self.cursor.y;
            if y == 0 {
                return;
            }
            self.cursor_up();
            self.cursor_to_eol();
            let removed = self.lines.remove(y);
            self.lines[y - 1].join(&removed, false);
            self.rescan(y - 1..self.lines.len());
            return;
        }
        self.cursor_left();
        self.delete_char_at_cursor();
    }

    /// Joins the successor line onto the current one with blank trimming,
    /// leaving the cursor at the old end of line. No-op on the last line.
    pub fn join_lines(&mut self) {
        let y = self.cursor.y;
        if y + 1 >= self.lines.len() {
            return;
        }
        self.cursor_to_eol();
        let next = self.lines.remove(y + 1);
        self.lines[y].join(&next, true);
        self.rescan(y..self.lines.len());
    }

    /// Indents or outdents every line in `range` by one tab stop. Indent
    /// skips contentless lines; outdent removes a single leading tab if one
    /// is present, else a full soft tab when at least `tab_stop` leading
    /// spaces exist. The cursor then homes to its line's first non-blank.
    pub fn shift_lines(&mut self, range: Range<usize>, right: bool) {
        let ts = self.tab_stop;
        let end = range.end.min(self.lines.len());
        for y in range.start..end {
            let line = &mut self.lines[y];
            if line.is_empty() {
                continue;
            }
            if right {
                for _ in 0..ts {
                    line.insert_char(0, ' ');
                }
            } else if line.char_at(0) == Some('\t') {
                line.delete_char(0);
            } else if line.all_spaces(0..ts.min(line.len() - 1)) && line.len() > ts {
                for _ in 0..ts {
                    line.delete_char(0);
                }
            }
        }
        self.cursor_to_first_non_blank();
        self.rescan(range.start..end);
    }

    /// Removes `range` from the line vector, leaving a single empty line if
    /// the buffer would otherwise be empty. Callers fix the cursor afterward.
    pub fn remove_lines(&mut self, range: Range<usize>) -> Vec<Line> {
        let end = range.end.min(self.lines.len());
        let start = range.start.min(end);
        let removed: Vec<Line> = self.lines.drain(start..end).collect();
        if self.lines.is_empty() {
            self.lines.push(Line::empty());
        }
        removed
    }

    /// Inserts `lines` starting at index `at` (clamped to the end).
    pub fn insert_lines(&mut self, at: usize, lines: Vec<Line>) {
        let at = at.min(self.lines.len());
        self.lines.splice(at..at, lines);
    }

    /// Mutable access to one line, for range edits such as substitution.
    pub fn line_mut(&mut self, y: usize) -> &mut Line {
        &mut self.lines[y]
    }

    /// True when the cell at buffer position (x, y) falls inside the active
    /// visual selection.
    pub fn in_visual_range(&self, x: usize, y: usize) -> bool {
        self.visual.contains(self.cursor, x, y)
    }
}
