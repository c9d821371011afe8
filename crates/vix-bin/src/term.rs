//! Raw-mode terminal session with guaranteed restoration.

use std::io::stdout;

use anyhow::Result;
use crossterm::{
    cursor::Show,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode},
};

pub struct Terminal {
    entered: bool,
}

/// RAII guard ensuring terminal state restoration even if the caller
/// early-returns or panics.
pub struct TerminalGuard<'a> {
    terminal: &'a mut Terminal,
}

impl Terminal {
    pub fn new() -> Self {
        Self { entered: false }
    }

    pub fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(stdout(), SetTitle(title))?;
        Ok(())
    }

    /// Enters raw mode and the alternate screen, returning a guard that
    /// leaves on drop.
    pub fn enter_guard(&mut self) -> Result<TerminalGuard<'_>> {
        if !self.entered {
            enable_raw_mode()?;
            execute!(stdout(), EnterAlternateScreen)?;
            self.entered = true;
        }
        Ok(TerminalGuard { terminal: self })
    }

    fn leave(&mut self) {
        if self.entered {
            let _ = execute!(stdout(), LeaveAlternateScreen, Show);
            let _ = disable_raw_mode();
            self.entered = false;
        }
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        self.leave();
    }
}

impl Drop for TerminalGuard<'_> {
    fn drop(&mut self) {
        self.terminal.leave();
    }
}
