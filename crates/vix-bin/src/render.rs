//! Paints the buffer viewport and the status line.
//!
//! Full repaint per handled key. The buffer is small-line text and the
//! writes are queued and flushed once, which is plenty fast for a terminal
//! frame; partial repaint would buy nothing here.

use std::io::Write;

use anyhow::Result;
use core_state::{Mode, TextBuffer};
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{Clear, ClearType},
};
use unicode_width::UnicodeWidthChar;

const READOUT_WIDTH: usize = 30;

pub fn draw(out: &mut impl Write, buf: &TextBuffer, last_key: &str) -> Result<()> {
    queue!(out, Clear(ClearType::All))?;
    draw_text_rows(out, buf)?;
    draw_status_line(out, buf, last_key)?;
    position_cursor(out, buf)?;
    out.flush()?;
    Ok(())
}

fn draw_text_rows(out: &mut impl Write, buf: &TextBuffer) -> Result<()> {
    let vp = buf.viewport;
    let cols = vp.x1 - vp.x0 + 1;
    for (row, y) in (vp.y0..=vp.y1.min(buf.line_count() - 1)).enumerate() {
        queue!(out, MoveTo(0, row as u16))?;
        let line = buf.line(y);
        let mut width = 0usize;
        let mut reversed = false;
        for x in vp.x0..line.len().saturating_sub(1) {
            let Some(ch) = line.char_at(x) else { break };
            width += UnicodeWidthChar::width(ch).unwrap_or(1);
            if width > cols {
                break;
            }
            let selected = buf.in_visual_range(x, y);
            if selected != reversed {
                let attr = if selected {
                    Attribute::Reverse
                } else {
                    Attribute::NoReverse
                };
                queue!(out, SetAttribute(attr))?;
                reversed = selected;
            }
            queue!(out, Print(ch))?;
        }
        if reversed {
            queue!(out, SetAttribute(Attribute::NoReverse))?;
        }
    }
    Ok(())
}

fn draw_status_line(out: &mut impl Write, buf: &TextBuffer, last_key: &str) -> Result<()> {
    let vp = buf.viewport;
    let status_row = (vp.y1 - vp.y0 + 1) as u16;
    let cols = vp.x1 - vp.x0 + 1;
    queue!(out, MoveTo(0, status_row))?;

    let left = if buf.mode == Mode::Status {
        buf.status.prompt_text()
    } else {
        buf.status.message().unwrap_or("").to_string()
    };
    queue!(out, Print(&left))?;

    // cursor telemetry, right-aligned in a fixed-width field
    print_in_statusline(
        out,
        status_row,
        cols,
        -(READOUT_WIDTH as isize),
        &status_readout(buf, last_key),
        READOUT_WIDTH,
    )?;
    Ok(())
}

/// Writes `text` at `offset` on the status row, right-padded with spaces to
/// `field_width`. A negative offset is measured from the end of the line.
fn print_in_statusline(
    out: &mut impl Write,
    status_row: u16,
    cols: usize,
    offset: isize,
    text: &str,
    field_width: usize,
) -> Result<()> {
    let col = if offset < 0 {
        cols.saturating_sub(offset.unsigned_abs())
    } else {
        offset as usize
    };
    queue!(out, MoveTo(col as u16, status_row))?;
    queue!(out, Print(format!("{text:<field_width$}")))?;
    Ok(())
}

/// `line/lines,column/columns [char under cursor] [last key]`, with `$` as
/// the stand-in for the line terminator.
fn status_readout(buf: &TextBuffer, last_key: &str) -> String {
    let line = buf.current_line();
    let ch = match line.char_at(buf.cursor.x) {
        Some('\n') | None => '$',
        Some(c) => c,
    };
    format!(
        "{}/{},{}/{} [{}] [{}]",
        buf.cursor.y,
        buf.line_count(),
        buf.cursor.x,
        line.len(),
        ch,
        last_key,
    )
}

fn position_cursor(out: &mut impl Write, buf: &TextBuffer) -> Result<()> {
    let vp = buf.viewport;
    if buf.mode == Mode::Status {
        let status_row = (vp.y1 - vp.y0 + 1) as u16;
        queue!(out, MoveTo(buf.status.sx as u16, status_row))?;
    } else {
        let col = buf.cursor.x - vp.x0;
        let row = buf.cursor.y - vp.y0;
        queue!(out, MoveTo(col as u16, row as u16))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::Line;

    fn buffer(text: &[&str]) -> TextBuffer {
        let mut buf = TextBuffer::new(80, 24);
        buf.load(text.iter().map(|t| Line::new(t)).collect(), None);
        buf
    }

    #[test]
    fn readout_shows_cursor_cell() {
        let mut buf = buffer(&["abc\n"]);
        buf.cursor.x = 1;
        assert_eq!(status_readout(&buf, "l"), "0/1,1/4 [b] [l]");
    }

    #[test]
    fn readout_marks_the_terminator() {
        let buf = buffer(&["\n"]);
        assert_eq!(status_readout(&buf, "j"), "0/1,0/1 [$] [j]");
    }

    #[test]
    fn draw_renders_without_error() {
        let buf = buffer(&["hello\n", "world\n"]);
        let mut sink = Vec::new();
        draw(&mut sink, &buf, "x").unwrap();
        let painted = String::from_utf8_lossy(&sink);
        assert!(painted.contains("hello"));
        assert!(painted.contains("world"));
    }
}
