//! Reading files into line vectors and serializing them back.

use std::fs;
use std::path::{Path, PathBuf};

use core_text::Line;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("reading {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("writing {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result of opening a path for editing. A missing file is not an error;
/// editing starts on an empty buffer that will be created on write.
pub enum OpenFileResult {
    Existing(Vec<Line>),
    NewFile,
}

/// Reads `path` into one [`Line`] per input record. A final record without a
/// trailing newline is preserved through the line's `noeol` flag.
pub fn open_file(path: &Path) -> Result<OpenFileResult, IoError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(target: "io", path = %path.display(), "new file");
            return Ok(OpenFileResult::NewFile);
        }
        Err(source) => {
            return Err(IoError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let lines = content.split_inclusive('\n').map(Line::new).collect();
    Ok(OpenFileResult::Existing(lines))
}

/// Serializes `lines` to `path`, honoring each line's `noeol` flag. Returns
/// the number of lines written.
pub fn write_file(path: &Path, lines: &[Line]) -> Result<usize, IoError> {
    let mut out = String::new();
    for line in lines {
        out.push_str(&line.to_string());
    }
    fs::write(path, out).map_err(|source| IoError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(target: "io", path = %path.display(), lines = lines.len(), "wrote file");
    Ok(lines.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn open_missing_file_is_a_new_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let result = open_file(&dir.path().join("absent.txt")).unwrap();
        assert!(matches!(result, OpenFileResult::NewFile));
    }

    #[test]
    fn read_write_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.txt");
        fs::write(&path, "one\ntwo\nthree\n").unwrap();

        let OpenFileResult::Existing(lines) = open_file(&path).unwrap() else {
            panic!("expected existing file");
        };
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].text(), "two");

        let out = dir.path().join("g.txt");
        let n = write_file(&out, &lines).unwrap();
        assert_eq!(n, 3);
        assert_eq!(fs::read_to_string(&out).unwrap(), "one\ntwo\nthree\n");
    }

    #[test]
    fn missing_final_newline_survives_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noeol.txt");
        fs::write(&path, "alpha\nbeta").unwrap();

        let OpenFileResult::Existing(lines) = open_file(&path).unwrap() else {
            panic!("expected existing file");
        };
        assert_eq!(lines.len(), 2);
        assert!(lines[1].noeol());

        write_file(&path, &lines).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "alpha\nbeta");
    }

    #[test]
    fn empty_file_reads_as_no_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        fs::write(&path, "").unwrap();
        let OpenFileResult::Existing(lines) = open_file(&path).unwrap() else {
            panic!("expected existing file");
        };
        assert!(lines.is_empty());
    }
}
