//! Visual selection: an anchor the cursor stretches a range against.

use crate::Cursor;

/// Single-shot selection anchored where visual mode was entered. Every
/// command that consumes the selection clears it after reading its range.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisualSelection {
    anchor: Option<Cursor>,
    linewise: bool,
}

impl VisualSelection {
    /// Arms the selection at `cursor`, or disarms it when already active.
    /// The line-wise variant anchors at column 0 and covers whole lines.
    pub fn toggle(&mut self, cursor: Cursor, linewise: bool) {
        if self.anchor.is_some() {
            self.anchor = None;
        } else {
            let mut anchor = cursor;
            if linewise {
                anchor.x = 0;
            }
            self.anchor = Some(anchor);
            self.linewise = linewise;
        }
    }

    pub fn clear(&mut self) {
        self.anchor = None;
    }

    pub fn is_active(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn is_linewise(&self) -> bool {
        self.linewise
    }

    /// Inclusive line range between anchor and cursor, ordered.
    pub fn line_range(&self, cursor_y: usize) -> Option<(usize, usize)> {
        let anchor = self.anchor?;
        Some((anchor.y.min(cursor_y), anchor.y.max(cursor_y)))
    }

    /// Whether the cell at (x, y) lies between the anchor and `cursor`.
    /// Line-wise selections cover every column of their lines; character-wise
    /// selections bound the first and last line by the ordered endpoint
    /// columns.
    pub fn contains(&self, cursor: Cursor, x: usize, y: usize) -> bool {
        let Some(anchor) = self.anchor else {
            return false;
        };
        let (first, last) = if anchor.y <= cursor.y {
            (anchor, cursor)
        } else {
            (cursor, anchor)
        };
        if y < first.y || y > last.y {
            return false;
        }
        if self.linewise {
            return true;
        }
        if first.y == last.y {
            if anchor.x == cursor.x {
                return false;
            }
            let (sx, ex) = (anchor.x.min(cursor.x), anchor.x.max(cursor.x));
            return x >= sx && x <= ex;
        }
        if y == first.y {
            x >= first.x
        } else if y == last.y {
            x <= last.x
        } else {
            true
        }
    }
}
