//! Status-line editing state and the message channel.

use core_text::Line;

/// Input line shown at the bottom of the screen while in status mode, plus
/// the one-shot message slot other operations report through.
///
/// Cell 0 of the line holds the trigger character (`:`, `/` or `?`) that
/// opened the prompt; `sx` is the edit column and never moves onto the
/// trigger.
pub struct StatusLineState {
    line: Line,
    pub sx: usize,
    message: Option<String>,
}

impl Default for StatusLineState {
    fn default() -> Self {
        Self {
            line: Line::empty(),
            sx: 1,
            message: None,
        }
    }
}

impl StatusLineState {
    /// Opens the prompt with `trigger` as its first cell.
    pub fn begin(&mut self, trigger: char) {
        self.line = Line::new(&trigger.to_string());
        self.sx = 1;
        self.message = None;
    }

    /// Current prompt contents including the trigger, for rendering.
    pub fn prompt_text(&self) -> String {
        self.line.text()
    }

    pub fn insert_char(&mut self, ch: char) {
        self.line.insert_char(self.sx, ch);
        self.sx += 1;
    }

    pub fn left(&mut self) {
        if self.sx > 1 {
            self.sx -= 1;
        }
    }

    pub fn right(&mut self) {
        if self.sx + 1 < self.line.len() {
            self.sx += 1;
        }
    }

    /// Deletes the character before the edit column. Returns `false` when
    /// the column is already at the trigger, which cancels the prompt.
    pub fn backspace(&mut self) -> bool {
        if self.sx == 1 {
            return false;
        }
        self.sx -= 1;
        self.line.delete_char(self.sx);
        true
    }

    /// Deletes the character under the edit column; at end of input this
    /// behaves like backspace. Returns `false` when that cancels the prompt.
    pub fn delete(&mut self) -> bool {
        let len = self.line.len();
        if len == 1 {
            return true;
        }
        if self.sx == len - 1 {
            return self.backspace();
        }
        self.line.delete_char(self.sx);
        true
    }

    /// Closes the prompt, returning the trigger and the typed text with
    /// trailing whitespace stripped.
    pub fn take_input(&mut self) -> (char, String) {
        let trigger = self.line.char_at(0).unwrap_or(':');
        let text = self.line.text();
        let input = text.get(1..).unwrap_or("").trim_end().to_string();
        self.cancel();
        (trigger, input)
    }

    /// Abandons the prompt without consuming its contents.
    pub fn cancel(&mut self) {
        self.line = Line::empty();
        self.sx = 1;
    }

    /// Replaces the one-shot message other operations report through.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(s: &mut StatusLineState, text: &str) {
        for ch in text.chars() {
            s.insert_char(ch);
        }
    }

    #[test]
    fn prompt_collects_input_after_trigger() {
        let mut s = StatusLineState::default();
        s.begin(':');
        typed(&mut s, "w file.txt");
        assert_eq!(s.prompt_text(), ":w file.txt");
        let (trigger, input) = s.take_input();
        assert_eq!(trigger, ':');
        assert_eq!(input, "w file.txt");
        assert_eq!(s.prompt_text(), "");
    }

    #[test]
    fn trailing_whitespace_is_stripped_on_submit() {
        let mut s = StatusLineState::default();
        s.begin('/');
        typed(&mut s, "needle   ");
        assert_eq!(s.take_input(), ('/', "needle".to_string()));
    }

    #[test]
    fn edit_column_stays_off_the_trigger() {
        let mut s = StatusLineState::default();
        s.begin(':');
        typed(&mut s, "ab");
        s.left();
        s.left();
        s.left();
        assert_eq!(s.sx, 1);
        s.right();
        s.right();
        s.right();
        assert_eq!(s.sx, 3);
    }

    #[test]
    fn mid_line_editing() {
        let mut s = StatusLineState::default();
        s.begin(':');
        typed(&mut s, "qit");
        s.left();
        s.left();
        s.insert_char('u');
        assert_eq!(s.prompt_text(), ":quit");
        assert!(s.delete());
        assert_eq!(s.prompt_text(), ":qut");
    }

    #[test]
    fn backspace_at_trigger_cancels() {
        let mut s = StatusLineState::default();
        s.begin(':');
        typed(&mut s, "x");
        assert!(s.backspace());
        assert!(!s.backspace());
    }
}
