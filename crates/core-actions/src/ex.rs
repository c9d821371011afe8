//! The ex-style command interpreter behind the `:` prompt.
//!
//! A command line is `[address] name [argument tail]`. The address is `N`,
//! `N,M`, or `%` (all 1-based, half-open once decoded); when no address is
//! written but a visual selection is active, the selection supplies the
//! range and is consumed. The name resolves by shortest unambiguous prefix
//! against the command table, in declaration order. Malformed input is
//! dropped without touching the buffer.

use std::ops::Range;
use std::path::PathBuf;

use core_state::TextBuffer;
use core_text::Line;
use regex::Regex;
use thiserror::Error;

use crate::dispatcher::Session;
use crate::io_ops;

/// Errors a command surfaces to the caller. Parse failures are not errors;
/// they are silently dropped per the interpreter's contract.
#[derive(Debug, Error)]
pub enum ExError {
    #[error("no file name")]
    NoFileName,
    #[error(transparent)]
    Io(#[from] io_ops::IoError),
}

/// What the interpreter asks of its caller after a command ran.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExOutcome {
    /// Buffer contents changed.
    pub dirty: bool,
    /// `quit` was issued; the session should end.
    pub quit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExCommand {
    Substitute,
    Write,
    Quit,
    Delete,
    Yank,
    Paste,
}

/// Declaration order is the prefix tie-break order: `s` is substitute, `q`
/// is quit, `d` is delete, `y` is yank, `p` is paste, `w` is write.
const COMMANDS: &[(&str, ExCommand)] = &[
    ("substitute", ExCommand::Substitute),
    ("write", ExCommand::Write),
    ("quit", ExCommand::Quit),
    ("delete", ExCommand::Delete),
    ("yank", ExCommand::Yank),
    ("paste", ExCommand::Paste),
];

fn resolve(name: &str) -> Option<ExCommand> {
    if name.is_empty() {
        return None;
    }
    COMMANDS
        .iter()
        .find(|(full, _)| full.starts_with(name))
        .map(|(_, cmd)| *cmd)
}

/// Runs one command line against the buffer. Only write failures surface as
/// errors; everything else reports through the status line or is dropped.
pub fn execute(
    input: &str,
    buf: &mut TextBuffer,
    session: &mut Session,
) -> Result<ExOutcome, ExError> {
    let input = input.trim();
    let mut outcome = ExOutcome::default();

    let Some((range, rest)) = parse_range(input, buf) else {
        tracing::debug!(target: "ex", %input, "malformed range");
        return Ok(outcome);
    };
    let (head, arg) = split_cmd_arg(rest);
    let Some(cmd) = head.split_whitespace().next().and_then(resolve) else {
        tracing::debug!(target: "ex", %input, "unresolved command");
        return Ok(outcome);
    };
    tracing::debug!(target: "ex", ?cmd, ?range, "dispatch");

    match cmd {
        ExCommand::Substitute => {
            let range = range.unwrap_or(buf.cursor.y..buf.cursor.y + 1);
            outcome.dirty = substitute(arg.unwrap_or(""), range, buf);
        }
        ExCommand::Write => {
            // the path may itself contain '/', so take the raw tail after
            // the command word rather than the delimiter-split argument
            let path = rest
                .split_once(char::is_whitespace)
                .map(|(_, tail)| tail.trim())
                .filter(|tail| !tail.is_empty());
            write(path, buf)?;
        }
        ExCommand::Quit => outcome.quit = true,
        ExCommand::Delete => {
            let range = range.unwrap_or(buf.cursor.y..buf.cursor.y + 1);
            delete_lines(buf, session, range);
            outcome.dirty = true;
        }
        ExCommand::Yank => {
            let range = range.unwrap_or(buf.cursor.y..buf.cursor.y + 1);
            yank_lines(buf, session, range);
        }
        ExCommand::Paste => outcome.dirty = paste(buf, session),
    }
    Ok(outcome)
}

/// Decodes a leading `%`, `N`, or `N,M` address into a half-open 0-based
/// line range, or substitutes (and consumes) the visual selection when no
/// address is present. Returns `None` for a malformed address.
fn parse_range<'a>(input: &'a str, buf: &mut TextBuffer) -> Option<(Option<Range<usize>>, &'a str)> {
    if let Some(rest) = input.strip_prefix('%') {
        return Some((Some(0..buf.line_count()), rest.trim_start()));
    }
    let digits = input.len() - input.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        if buf.visual.is_active() {
            let (first, last) = buf.visual.line_range(buf.cursor.y)?;
            buf.visual.clear();
            return Some((Some(first..last + 1), input));
        }
        return Some((None, input));
    }
    let start: usize = input[..digits].parse().ok()?;
    if start == 0 {
        return None;
    }
    let rest = &input[digits..];
    if let Some(tail) = rest.strip_prefix(',') {
        let d2 = tail.len() - tail.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if d2 == 0 {
            return None;
        }
        let end: usize = tail[..d2].parse().ok()?;
        if end < start {
            return None;
        }
        return Some((
            Some(start - 1..end.min(buf.line_count())),
            tail[d2..].trim_start(),
        ));
    }
    Some((
        Some(start - 1..start.min(buf.line_count())),
        rest.trim_start(),
    ))
}

/// Splits off the argument tail at the first `/` or `|`, keeping the
/// delimiter in the tail.
fn split_cmd_arg(rest: &str) -> (&str, Option<&str>) {
    match rest.find(['/', '|']) {
        Some(i) => (&rest[..i], Some(&rest[i..])),
        None => (rest, None),
    }
}

/// Splits `pattern/replacement/flags` on unescaped `/`; `\/` produces a
/// literal slash in the pattern or replacement.
fn split_fields(arg: &str) -> (String, String, String) {
    let mut fields = vec![String::new()];
    let mut escaped = false;
    for ch in arg.chars() {
        if escaped {
            if ch != '/' {
                if let Some(last) = fields.last_mut() {
                    last.push('\\');
                }
            }
            if let Some(last) = fields.last_mut() {
                last.push(ch);
            }
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == '/' && fields.len() < 3 {
            fields.push(String::new());
        } else if let Some(last) = fields.last_mut() {
            last.push(ch);
        }
    }
    let mut it = fields.into_iter();
    (
        it.next().unwrap_or_default(),
        it.next().unwrap_or_default(),
        it.next().unwrap_or_default(),
    )
}

/// `substitute`: replaces pattern matches with the replacement over `range`.
/// Without the `g` flag each line stops after its first match. Reports a
/// replacement tally and moves the cursor to the start of the last
/// replacement performed. Returns whether anything changed.
fn substitute(arg: &str, range: Range<usize>, buf: &mut TextBuffer) -> bool {
    let body = arg
        .strip_prefix('/')
        .or_else(|| arg.strip_prefix('|'))
        .unwrap_or(arg);
    let (pattern, replacement, flags) = split_fields(body);
    let program = match Regex::new(&pattern) {
        Ok(p) => p,
        Err(error) => {
            tracing::debug!(target: "ex", %pattern, %error, "bad substitute pattern");
            buf.status.set_message(format!("-- Bad pattern {pattern} --"));
            return false;
        }
    };
    let global = flags.contains('g');

    let end = range.end.min(buf.line_count());
    let mut replacements = 0usize;
    let mut lines_touched = 0usize;
    let mut last: Option<(usize, usize)> = None;
    for y in range.start..end {
        let mut text = buf.line(y).text();
        let mut from = 0usize;
        let mut touched = false;
        while let Some(m) = program.find(&text[from..]) {
            let sb = from + m.start();
            let eb = from + m.end();
            let sc = text[..sb].chars().count();
            let ec = sc + text[sb..eb].chars().count();
            buf.line_mut(y).replace_range(sc, ec, &replacement);
            text.replace_range(sb..eb, &replacement);
            replacements += 1;
            touched = true;
            last = Some((sc, y));
            if !global {
                break;
            }
            from = sb + replacement.len();
            if eb == sb {
                // empty match: step over one character or stop
                match text[from..].chars().next() {
                    Some(c) => from += c.len_utf8(),
                    None => break,
                }
            }
            if from > text.len() {
                break;
            }
        }
        if touched {
            lines_touched += 1;
        }
    }

    if let Some((x, y)) = last {
        buf.cursor.y = y;
        buf.cursor.x = x;
        buf.cursor.max = x;
        buf.cursor_and_viewport_adjustment();
        buf.rescan(range.start..end);
    }
    buf.status
        .set_message(format!("{replacements} replacements in {lines_touched} lines"));
    replacements > 0
}

/// `delete`: removes the addressed lines into the yank register, fixing the
/// cursor line for any lines removed above it, then re-homes the cursor.
pub fn delete_lines(buf: &mut TextBuffer, session: &mut Session, range: Range<usize>) {
    let y = buf.cursor.y;
    let start = range.start;
    let removed = buf.remove_lines(range);
    let n = removed.len();
    session.register.record(removed);
    if y >= start + n {
        buf.cursor.y = y - n;
    } else if y > start {
        buf.cursor.y = start;
    }
    buf.cursor_and_viewport_adjustment();
    buf.cursor_to_first_non_blank();
    buf.rescan(start..buf.line_count());
    buf.status.set_message(format!("{n} lines deleted"));
}

/// `yank`: copies the addressed lines into the register without removing.
pub fn yank_lines(buf: &mut TextBuffer, session: &mut Session, range: Range<usize>) {
    let end = range.end.min(buf.line_count());
    let start = range.start.min(end);
    let snapshot: Vec<Line> = buf.lines()[start..end].to_vec();
    let n = snapshot.len();
    session.register.record(snapshot);
    buf.status.set_message(format!("{n} lines yanked"));
}

/// `paste`: inserts a copy of the register after the current line and moves
/// the cursor past the inserted block. Returns whether anything was pasted.
pub fn paste(buf: &mut TextBuffer, session: &mut Session) -> bool {
    let block = session.register.paste_copy();
    if block.is_empty() {
        return false;
    }
    let n = block.len();
    let y = buf.cursor.y;
    buf.insert_lines(y + 1, block);
    buf.cursor.y = (y + n + 1).min(buf.line_count() - 1);
    buf.cursor_and_viewport_adjustment();
    buf.rescan(y..buf.line_count());
    true
}

/// `write`: serializes the buffer to the argument path or the buffer's own.
fn write(path_arg: Option<&str>, buf: &mut TextBuffer) -> Result<(), ExError> {
    let path = match path_arg {
        Some(p) => PathBuf::from(p),
        None => buf.path.clone().ok_or(ExError::NoFileName)?,
    };
    let n = io_ops::write_file(&path, buf.lines())?;
    buf.status
        .set_message(format!("\"{}\" {n} lines written", path.display()));
    buf.path = Some(path);
    Ok(())
}
