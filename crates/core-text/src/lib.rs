//! Attributed line storage.
//!
//! A document is a sequence of [`Line`]s, and a line is a vector of [`Char`]
//! cells. Every line carries an explicit `'\n'` terminator cell so that the
//! cursor has a landing spot one past the last visible character in insert
//! mode; lines loaded from a file without a trailing newline remember that
//! fact through the `noeol` flag and serialize back without one.

use std::fmt;
use std::ops::Range;

/// Opaque display attribute attached to each character cell.
///
/// The editing engine never interprets attribute values; they are produced by
/// a [`Highlighter`] and consumed by whatever paints the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Attr(pub u64);

impl Attr {
    pub const NORMAL: Attr = Attr(0);
}

/// A single character cell: the character plus its display attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Char {
    pub ch: char,
    pub attr: Attr,
}

impl Char {
    pub fn new(ch: char) -> Self {
        Self {
            ch,
            attr: Attr::NORMAL,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.ch == ' ' || self.ch == '\t'
    }
}

/// Cursor bound policy for [`Line::last_editable_index`].
///
/// Command-like modes park the cursor on characters and therefore exclude the
/// terminator cell; insert mode may sit on the terminator so that appending at
/// end of line works.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMode {
    Command,
    Insert,
}

/// One line of text, always terminated by a `'\n'` cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    chars: Vec<Char>,
    noeol: bool,
}

impl Line {
    /// Builds a line from raw text. A missing trailing newline is supplied
    /// and remembered via `noeol`.
    pub fn new(text: &str) -> Self {
        let mut chars: Vec<Char> = text.chars().map(Char::new).collect();
        let noeol = !matches!(chars.last(), Some(c) if c.ch == '\n');
        if noeol {
            chars.push(Char::new('\n'));
        }
        Self { chars, noeol }
    }

    /// An empty line: just the terminator.
    pub fn empty() -> Self {
        Self {
            chars: vec![Char::new('\n')],
            noeol: false,
        }
    }

    /// Total cell count, terminator included. Always at least 1.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// True when the line holds no content besides the terminator.
    pub fn is_empty(&self) -> bool {
        self.chars.len() <= 1
    }

    pub fn noeol(&self) -> bool {
        self.noeol
    }

    pub fn set_noeol(&mut self, noeol: bool) {
        self.noeol = noeol;
    }

    /// Index of the last cell the cursor may occupy, or `None` for a line
    /// whose only cell is the terminator in command mode.
    pub fn last_editable_index(&self, mode: LineMode) -> Option<usize> {
        match mode {
            LineMode::Command => self.chars.len().checked_sub(2),
            LineMode::Insert => Some(self.chars.len() - 1),
        }
    }

    pub fn get(&self, index: usize) -> Option<&Char> {
        self.chars.get(index)
    }

    pub fn char_at(&self, index: usize) -> Option<char> {
        self.chars.get(index).map(|c| c.ch)
    }

    pub fn set_attr(&mut self, index: usize, attr: Attr) {
        if let Some(cell) = self.chars.get_mut(index) {
            cell.attr = attr;
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = &Char> {
        self.chars.iter()
    }

    /// Line content as a `String`, terminator excluded.
    pub fn text(&self) -> String {
        self.chars[..self.chars.len() - 1]
            .iter()
            .map(|c| c.ch)
            .collect()
    }

    /// Inserts a character cell at `index`. `index` may equal the terminator
    /// position, which appends just before the `'\n'`.
    pub fn insert_char(&mut self, index: usize, ch: char) {
        debug_assert!(index < self.chars.len(), "insert past terminator");
        self.chars.insert(index.min(self.chars.len() - 1), Char::new(ch));
    }

    /// Removes the cell at `index`. Returns `false` without modifying the
    /// line when `index` addresses the terminator or the line is empty;
    /// callers treat that as a request to join with a neighbor instead.
    pub fn delete_char(&mut self, index: usize) -> bool {
        if self.chars.len() <= 1 || index >= self.chars.len() - 1 {
            return false;
        }
        self.chars.remove(index);
        true
    }

    /// True when every cell in `range` is a space. Used for soft-tab motion
    /// and deletion over 4-column indent runs.
    pub fn all_spaces(&self, range: Range<usize>) -> bool {
        range.end <= self.chars.len()
            && self.chars[range].iter().all(|c| c.ch == ' ')
    }

    /// Splits the line at `index`. `self` keeps the head and gains a fresh
    /// terminator; the returned tail keeps the original terminator and
    /// inherits the `noeol` flag.
    pub fn split_off(&mut self, index: usize) -> Line {
        debug_assert!(index < self.chars.len(), "split past terminator");
        let tail = self.chars.split_off(index.min(self.chars.len() - 1));
        self.chars.push(Char::new('\n'));
        let noeol = self.noeol;
        self.noeol = false;
        Line { chars: tail, noeol }
    }

    /// Joins `other` onto the end of this line. Lines with no content are
    /// skipped entirely. With `trim`, leading blanks of `other` are dropped
    /// and exactly one space is spliced in at the seam. The terminator and
    /// `noeol` flag of `other` become ours.
    pub fn join(&mut self, other: &Line, trim: bool) {
        if other.is_empty() {
            return;
        }
        self.chars.pop(); // own terminator
        if trim {
            // no seam space when joining onto a contentless line
            let seam_needed = !self.chars.is_empty();
            let mut seam_done = false;
            for cell in &other.chars {
                if !seam_done {
                    if cell.is_blank() {
                        continue;
                    }
                    if seam_needed && cell.ch != '\n' {
                        self.chars.push(Char::new(' '));
                    }
                    seam_done = true;
                }
                self.chars.push(*cell);
            }
        } else {
            self.chars.extend_from_slice(&other.chars);
        }
        self.noeol = other.noeol;
    }

    /// Replaces the cells in `start..end` with the characters of `text`.
    pub fn replace_range(&mut self, start: usize, end: usize, text: &str) {
        debug_assert!(start <= end, "inverted replace range");
        let last = self.chars.len() - 1;
        let start = start.min(last);
        let end = end.min(last);
        self.chars.splice(start..end, text.chars().map(Char::new));
    }

    /// Index of the first cell that is not a space or tab. All-blank lines
    /// report their total length; callers clamp through cursor adjustment.
    pub fn first_non_blank(&self) -> usize {
        self.chars
            .iter()
            .position(|c| !c.is_blank() && c.ch != '\n')
            .unwrap_or(self.chars.len())
    }
}

impl fmt::Display for Line {
    /// Serialized form: content plus terminator, unless the line came from a
    /// file without one.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let end = if self.noeol {
            self.chars.len() - 1
        } else {
            self.chars.len()
        };
        for cell in &self.chars[..end] {
            write!(f, "{}", cell.ch)?;
        }
        Ok(())
    }
}

/// Hook invoked after every buffer mutation so a display layer can recompute
/// attributes over the touched lines. The engine ships no implementation.
pub trait Highlighter {
    fn rescan(&mut self, lines: &mut [Line], dirty: Range<usize>);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_line_supplies_terminator_and_tracks_noeol() {
        let terminated = Line::new("abc\n");
        assert_eq!(terminated.len(), 4);
        assert!(!terminated.noeol());

        let bare = Line::new("abc");
        assert_eq!(bare.len(), 4);
        assert!(bare.noeol());
        assert_eq!(bare.char_at(3), Some('\n'));
    }

    #[test]
    fn last_editable_index_per_mode() {
        let line = Line::new("ab\n");
        assert_eq!(line.last_editable_index(LineMode::Command), Some(1));
        assert_eq!(line.last_editable_index(LineMode::Insert), Some(2));

        let empty = Line::empty();
        assert_eq!(empty.last_editable_index(LineMode::Command), None);
        assert_eq!(empty.last_editable_index(LineMode::Insert), Some(0));
    }

    #[test]
    fn insert_then_delete_restores_line() {
        let mut line = Line::new("hello\n");
        line.insert_char(2, 'X');
        assert_eq!(line.text(), "heXllo");
        assert!(line.delete_char(2));
        assert_eq!(line.text(), "hello");
    }

    #[test]
    fn delete_refuses_terminator_and_empty_line() {
        let mut line = Line::new("a\n");
        assert!(!line.delete_char(1));
        assert_eq!(line.len(), 2);

        let mut empty = Line::empty();
        assert!(!empty.delete_char(0));
        assert_eq!(empty.len(), 1);
    }

    #[test]
    fn split_then_join_round_trips() {
        let mut line = Line::new("alpha beta\n");
        let tail = line.split_off(5);
        assert_eq!(line.text(), "alpha");
        assert_eq!(tail.text(), " beta");

        line.join(&tail, false);
        assert_eq!(line.text(), "alpha beta");
    }

    #[test]
    fn split_moves_noeol_to_tail() {
        let mut line = Line::new("partial");
        let tail = line.split_off(3);
        assert!(!line.noeol());
        assert!(tail.noeol());
        assert_eq!(format!("{tail}"), "tial");
    }

    #[test]
    fn trimmed_join_splices_single_space() {
        let mut line = Line::new("foo\n");
        line.join(&Line::new("    bar\n"), true);
        assert_eq!(line.text(), "foo bar");
    }

    #[test]
    fn trimmed_join_onto_contentless_line_has_no_seam_space() {
        let mut line = Line::empty();
        line.join(&Line::new("  bar\n"), true);
        assert_eq!(line.text(), "bar");
    }

    #[test]
    fn trimmed_join_with_all_blank_successor_keeps_line_clean() {
        let mut line = Line::new("foo\n");
        line.join(&Line::new("   \n"), true);
        assert_eq!(line.text(), "foo");
    }

    #[test]
    fn join_skips_contentless_successor() {
        let mut line = Line::new("foo\n");
        line.join(&Line::empty(), true);
        assert_eq!(line.text(), "foo");
        assert_eq!(line.len(), 4);
    }

    #[test]
    fn replace_range_swaps_span() {
        let mut line = Line::new("one two three\n");
        line.replace_range(4, 7, "2");
        assert_eq!(line.text(), "one 2 three");
    }

    #[test]
    fn first_non_blank_skips_indent() {
        assert_eq!(Line::new("    x\n").first_non_blank(), 4);
        assert_eq!(Line::new("x\n").first_non_blank(), 0);
        // All-blank lines report their full length; cursor adjustment clamps.
        assert_eq!(Line::new("   \n").first_non_blank(), 4);
    }

    #[test]
    fn display_honors_noeol() {
        assert_eq!(format!("{}", Line::new("abc\n")), "abc\n");
        assert_eq!(format!("{}", Line::new("abc")), "abc");
    }
}
