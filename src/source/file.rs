//! File-based console call source with optional follow mode.
//!
//! Tracks the byte position of the last complete line so repeated reads only
//! return what was appended since. Follow mode polls on every tick instead of
//! relying on filesystem notifications.

use crate::model::error::InputError;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// JSONL file reader.
///
/// Without follow the file is read once, and a trailing line without a
/// newline is still returned. With follow the reader keeps returning newly
/// appended complete lines, and starts over if the file is truncated.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    reader: BufReader<File>,
    position: u64,
    pending: String,
    follow: bool,
    finished: bool,
}

impl FileSource {
    /// Open `path` for reading from the start.
    ///
    /// # Errors
    ///
    /// Returns `InputError::FileNotFound` if the file does not exist.
    /// Returns `InputError::Io` for other I/O errors.
    pub fn new(path: impl AsRef<Path>, follow: bool) -> Result<Self, InputError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(InputError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path)?;
        info!(path = %path.display(), follow, "Opened input file");

        Ok(Self {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
            position: 0,
            pending: String::new(),
            follow,
            finished: false,
        })
    }

    /// Path this source reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether more lines may still arrive.
    pub fn is_following(&self) -> bool {
        self.follow
    }

    /// Whether a non-follow source has returned everything.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Read the complete lines appended since the last call, newline stripped.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` if the file can no longer be read.
    pub fn read_new_lines(&mut self) -> Result<Vec<String>, InputError> {
        if self.finished {
            return Ok(Vec::new());
        }

        if self.follow {
            self.rewind_if_truncated()?;
        }

        let mut lines = Vec::new();
        loop {
            let read = self.reader.read_line(&mut self.pending)?;
            if read == 0 {
                break;
            }
            self.position += read as u64;

            if self.pending.ends_with('\n') {
                lines.push(take_line(&mut self.pending));
            }
        }

        if !self.follow {
            if !self.pending.is_empty() {
                lines.push(take_line(&mut self.pending));
            }
            self.finished = true;
        }

        Ok(lines)
    }

    fn rewind_if_truncated(&mut self) -> Result<(), InputError> {
        let len = std::fs::metadata(&self.path)?.len();
        if len < self.position {
            debug!(
                path = %self.path.display(),
                len,
                position = self.position,
                "Input file truncated, reading from start"
            );
            self.reader.seek(SeekFrom::Start(0))?;
            self.position = 0;
            self.pending.clear();
        }
        Ok(())
    }
}

fn take_line(buffer: &mut String) -> String {
    let mut line = std::mem::take(buffer);
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, OpenOptions};
    use std::io::Write;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        fs::write(&path, content).expect("write temp file");
        path
    }

    fn append(path: &Path, content: &str) {
        let mut file = OpenOptions::new().append(true).open(path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn new_returns_file_not_found_for_missing_file() {
        let missing = std::env::temp_dir().join("devconsole_missing_source.jsonl");
        let result = FileSource::new(&missing, false);
        assert!(matches!(result, Err(InputError::FileNotFound { .. })));
    }

    #[test]
    fn read_once_returns_all_lines_then_nothing() {
        let path = temp_file("devconsole_file_once.jsonl", "a\nb\nc");
        let mut source = FileSource::new(&path, false).unwrap();

        let lines = source.read_new_lines().unwrap();
        assert_eq!(lines, vec!["a", "b", "c"], "Trailing line is kept at EOF");
        assert!(source.is_finished());
        assert!(source.read_new_lines().unwrap().is_empty());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn crlf_line_endings_are_stripped() {
        let path = temp_file("devconsole_file_crlf.jsonl", "a\r\nb\r\n");
        let mut source = FileSource::new(&path, false).unwrap();

        assert_eq!(source.read_new_lines().unwrap(), vec!["a", "b"]);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn follow_returns_only_appended_lines() {
        let path = temp_file("devconsole_file_follow.jsonl", "first\n");
        let mut source = FileSource::new(&path, true).unwrap();

        assert_eq!(source.read_new_lines().unwrap(), vec!["first"]);
        assert!(source.read_new_lines().unwrap().is_empty());

        append(&path, "second\nthird\n");
        assert_eq!(source.read_new_lines().unwrap(), vec!["second", "third"]);
        assert!(!source.is_finished());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn follow_holds_partial_line_until_completed() {
        let path = temp_file("devconsole_file_partial.jsonl", "done\n{\"meth");
        let mut source = FileSource::new(&path, true).unwrap();

        assert_eq!(source.read_new_lines().unwrap(), vec!["done"]);

        append(&path, "od\":\"log\"}\n");
        assert_eq!(
            source.read_new_lines().unwrap(),
            vec!["{\"method\":\"log\"}"]
        );

        let _ = fs::remove_file(path);
    }

    #[test]
    fn follow_restarts_after_truncation() {
        let path = temp_file("devconsole_file_truncate.jsonl", "one\ntwo\n");
        let mut source = FileSource::new(&path, true).unwrap();
        assert_eq!(source.read_new_lines().unwrap().len(), 2);

        fs::write(&path, "x\n").unwrap();
        assert_eq!(source.read_new_lines().unwrap(), vec!["x"]);

        let _ = fs::remove_file(path);
    }
}
