//! Regex search over buffer lines.

use core_state::TextBuffer;
use core_text::Line;
use regex::Regex;

/// The remembered pattern and its compiled program. Session-scoped: `n` and
/// `N` repeat the last search even after the prompt text is long gone.
#[derive(Debug, Default)]
pub struct SearchState {
    pattern: Option<String>,
    program: Option<Regex>,
}

impl SearchState {
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// Compiles `pattern` if it differs from the remembered one. Returns
    /// `false` on a compile error, leaving the previous state intact.
    fn arm(&mut self, pattern: &str) -> bool {
        if self.pattern.as_deref() == Some(pattern) && self.program.is_some() {
            return true;
        }
        match Regex::new(pattern) {
            Ok(program) => {
                self.pattern = Some(pattern.to_string());
                self.program = Some(program);
                true
            }
            Err(error) => {
                tracing::debug!(target: "search", %pattern, %error, "bad pattern");
                false
            }
        }
    }
}

/// Finds the next match and relocates the cursor to its start.
///
/// Forward scans run from the cursor line to the end of the buffer, starting
/// one column past the cursor on the first line; backward scans run from the
/// line above the cursor to line 0, each from column 0. Outcomes are
/// reported through the status-line message slot.
pub fn search(
    buf: &mut TextBuffer,
    state: &mut SearchState,
    pattern: Option<&str>,
    reverse: bool,
) {
    let pattern = match pattern.filter(|p| !p.is_empty()) {
        Some(p) => p.to_string(),
        None => match state.pattern() {
            Some(p) => p.to_string(),
            None => {
                buf.status.set_message("-- No regexp --");
                return;
            }
        },
    };
    if !state.arm(&pattern) {
        buf.status.set_message(format!("-- Bad pattern {pattern} --"));
        return;
    }
    let Some(program) = state.program.as_ref() else {
        return;
    };

    let y = buf.cursor.y;
    let lines: Vec<usize> = if reverse {
        (0..y).rev().collect()
    } else {
        (y..buf.line_count()).collect()
    };
    let mut first = true;
    for i in lines {
        let from = if first && !reverse { buf.cursor.x + 1 } else { 0 };
        first = false;
        if let Some((start, _)) = find_in_line(buf.line(i), from, program) {
            buf.status.set_message(format!("/{pattern}"));
            buf.cursor.x = start;
            buf.cursor.max = start;
            buf.cursor.y = i;
            buf.cursor_and_viewport_adjustment();
            return;
        }
    }
    buf.status.set_message(format!("-- {pattern} Not found --"));
}

/// First match of `program` in `line` at or after character column `from`.
/// Returns character-index (start, end).
fn find_in_line(line: &Line, from: usize, program: &Regex) -> Option<(usize, usize)> {
    let text = line.text();
    let byte_from = text
        .char_indices()
        .nth(from)
        .map(|(b, _)| b)
        .unwrap_or(text.len());
    let m = program.find(&text[byte_from..])?;
    let start = from.min(text.chars().count())
        + text[byte_from..byte_from + m.start()].chars().count();
    let end = start + text[byte_from + m.start()..byte_from + m.end()].chars().count();
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn buf(text: &[&str]) -> TextBuffer {
        let mut b = TextBuffer::new(80, 24);
        b.load(text.iter().map(|t| Line::new(t)).collect(), None);
        b
    }

    #[test]
    fn forward_search_relocates_cursor_to_match_start() {
        let mut b = buf(&["hello world\n"]);
        let mut s = SearchState::default();
        search(&mut b, &mut s, Some("wor"), false);
        assert_eq!((b.cursor.x, b.cursor.y), (6, 0));
        assert_eq!(b.status.message(), Some("/wor"));
    }

    #[test]
    fn forward_search_skips_current_column() {
        let mut b = buf(&["aaa\n", "aaa\n"]);
        let mut s = SearchState::default();
        search(&mut b, &mut s, Some("a"), false);
        assert_eq!((b.cursor.x, b.cursor.y), (1, 0));
        search(&mut b, &mut s, None, false);
        assert_eq!((b.cursor.x, b.cursor.y), (2, 0));
        search(&mut b, &mut s, None, false);
        assert_eq!((b.cursor.x, b.cursor.y), (0, 1));
    }

    #[test]
    fn match_already_behind_cursor_is_not_found() {
        let mut b = buf(&["hello world\n"]);
        b.cursor.x = 7;
        b.cursor.max = 7;
        let mut s = SearchState::default();
        search(&mut b, &mut s, Some("wor"), false);
        assert_eq!(b.cursor.x, 7);
        assert_eq!(b.status.message(), Some("-- wor Not found --"));
    }

    #[test]
    fn reverse_search_scans_lines_above() {
        let mut b = buf(&["target here\n", "nothing\n", "cursor line\n"]);
        b.cursor.y = 2;
        let mut s = SearchState::default();
        search(&mut b, &mut s, Some("target"), true);
        assert_eq!((b.cursor.x, b.cursor.y), (0, 0));
    }

    #[test]
    fn repeat_without_history_reports_no_regexp() {
        let mut b = buf(&["text\n"]);
        let mut s = SearchState::default();
        search(&mut b, &mut s, None, false);
        assert_eq!(b.status.message(), Some("-- No regexp --"));
    }

    #[test]
    fn pattern_is_remembered_across_searches() {
        let mut b = buf(&["one two\n", "two three\n"]);
        let mut s = SearchState::default();
        search(&mut b, &mut s, Some("two"), false);
        assert_eq!((b.cursor.x, b.cursor.y), (4, 0));
        search(&mut b, &mut s, None, false);
        assert_eq!((b.cursor.x, b.cursor.y), (0, 1));
        assert_eq!(s.pattern(), Some("two"));
    }

    #[test]
    fn bad_pattern_is_reported_not_compiled() {
        let mut b = buf(&["text\n"]);
        let mut s = SearchState::default();
        search(&mut b, &mut s, Some("(["), false);
        assert_eq!(b.status.message(), Some("-- Bad pattern ([ --"));
        assert_eq!(s.pattern(), None);
    }
}
