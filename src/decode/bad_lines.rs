//! Side log for malformed rows

use crate::error::{Error, Result, ResultExt};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Append-only log of rows the reader could not use.
///
/// Each row is written as it appeared in the input, followed by a single
/// `\n`. Existing content is never truncated.
pub struct BadLineSink {
    writer: BufWriter<File>,
    path: PathBuf,
    lines_written: usize,
}

impl BadLineSink {
    /// Open (or create) the log in append mode
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create bad-line log directory")?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                Error::output(format!(
                    "Failed to open bad-line log '{}': {e}",
                    path.display()
                ))
            })?;

        Ok(Self {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
            lines_written: 0,
        })
    }

    /// Append one row. Line terminators around `raw` are normalized to one `\n`.
    pub fn record(&mut self, raw: &[u8]) -> Result<()> {
        let line = trim_terminators(raw);
        self.writer.write_all(line)?;
        self.writer.write_all(b"\n")?;
        self.lines_written += 1;
        Ok(())
    }

    /// Number of rows appended through this sink
    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush buffered rows to disk
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

impl std::fmt::Debug for BadLineSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BadLineSink")
            .field("path", &self.path)
            .field("lines_written", &self.lines_written)
            .finish()
    }
}

/// Strip CR/LF bytes from both ends
fn trim_terminators(raw: &[u8]) -> &[u8] {
    let is_term = |b: &u8| *b == b'\n' || *b == b'\r';
    let start = raw.iter().position(|b| !is_term(b)).unwrap_or(raw.len());
    let end = raw.iter().rposition(|b| !is_term(b)).map_or(start, |i| i + 1);
    &raw[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_terminators() {
        assert_eq!(trim_terminators(b"a,b\r\n"), b"a,b");
        assert_eq!(trim_terminators(b"\na,b"), b"a,b");
        assert_eq!(trim_terminators(b"\r\n"), b"");
        assert_eq!(trim_terminators(b""), b"");
        assert_eq!(trim_terminators(b"a\nb\n"), b"a\nb");
    }

    #[test]
    fn test_sink_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("bad.txt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "previous\n").unwrap();

        let mut sink = BadLineSink::open(&path).unwrap();
        sink.record(b"1,too,many,fields\r\n").unwrap();
        sink.record(b"2,short").unwrap();
        sink.flush().unwrap();

        assert_eq!(sink.lines_written(), 2);
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "previous\n1,too,many,fields\n2,short\n");
    }

    #[test]
    fn test_sink_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("dir").join("bad.txt");
        let mut sink = BadLineSink::open(&path).unwrap();
        sink.record(b"x").unwrap();
        sink.flush().unwrap();
        assert!(path.exists());
        assert_eq!(sink.path(), path.as_path());
    }

    #[test]
    fn test_sink_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("logs");
        fs::write(&blocker, "not a directory").unwrap();

        let err = BadLineSink::open(blocker.join("bad.txt")).err().unwrap();
        assert!(err
            .to_string()
            .starts_with("Failed to create bad-line log directory: IO error:"));
    }
}
