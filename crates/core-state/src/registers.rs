//! The yank register: a single-slot line clipboard.

use core_text::Line;

/// Holds the most recently deleted or yanked block of lines. Every delete or
/// yank overwrites the whole slot; paste copies out of it, so one yank can be
/// pasted any number of times.
#[derive(Debug, Default)]
pub struct YankRegister {
    lines: Vec<Line>,
}

impl YankRegister {
    /// Overwrites the register with a snapshot of `lines`.
    pub fn record(&mut self, lines: Vec<Line>) {
        self.lines = lines;
    }

    /// Deep copy of the register contents, ready for insertion.
    pub fn paste_copy(&self) -> Vec<Line> {
        self.lines.clone()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_overwrites_wholesale() {
        let mut reg = YankRegister::default();
        reg.record(vec![Line::new("one\n"), Line::new("two\n")]);
        assert_eq!(reg.len(), 2);
        reg.record(vec![Line::new("three\n")]);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.paste_copy()[0].text(), "three");
    }

    #[test]
    fn paste_copy_leaves_register_intact() {
        let mut reg = YankRegister::default();
        reg.record(vec![Line::new("keep\n")]);
        let _ = reg.paste_copy();
        let _ = reg.paste_copy();
        assert_eq!(reg.len(), 1);
    }
}
