//! Row-level CSV reading with malformed-row handling
//!
//! The reader runs the csv parser in `flexible` mode so a row with the wrong
//! number of fields comes back as data instead of an error. Such rows are
//! skipped. To log them exactly as they appeared in the file, the underlying
//! byte stream passes through a [`Tap`] that keeps every byte the parser has
//! pulled but not yet released.

use super::bad_lines::BadLineSink;
use crate::config::delimiter_byte;
use crate::error::{Error, Result};
use csv::{ByteRecord, ReaderBuilder};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Counters kept while reading
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadStats {
    /// Data rows seen, well-formed or not
    pub rows: usize,
    /// Rows skipped as malformed
    pub malformed: usize,
}

// ============================================================================
// Tap
// ============================================================================

/// Reader adapter that remembers the bytes passing through it.
///
/// `offset` is the absolute stream position of `buf[0]`.
struct Tap<R> {
    inner: R,
    buf: Vec<u8>,
    offset: u64,
}

impl<R: Read> Tap<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            offset: 0,
        }
    }

    /// Bytes in `[start, end)`, or an empty slice if already released
    fn slice(&self, start: u64, end: u64) -> &[u8] {
        if start < self.offset {
            return &[];
        }
        let from = (start - self.offset) as usize;
        let to = ((end - self.offset) as usize).min(self.buf.len());
        self.buf.get(from..to).unwrap_or(&[])
    }

    /// Forget everything before `upto`
    fn release(&mut self, upto: u64) {
        if upto <= self.offset {
            return;
        }
        let n = ((upto - self.offset) as usize).min(self.buf.len());
        self.buf.drain(..n);
        self.offset += n as u64;
    }
}

impl<R: Read> Read for Tap<R> {
    fn read(&mut self, out: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(out)?;
        self.buf.extend_from_slice(&out[..n]);
        Ok(n)
    }
}

// ============================================================================
// RowReader
// ============================================================================

/// Reads well-formed rows, skipping (and optionally logging) the rest
pub struct RowReader<R: Read> {
    reader: csv::Reader<Tap<R>>,
    header: Vec<String>,
    record: ByteRecord,
    bad_lines: Option<BadLineSink>,
    stats: ReadStats,
}

impl RowReader<File> {
    /// Open a file and read its header row
    pub fn open(path: impl AsRef<Path>, delimiter: char) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::file_not_found(path)
            } else {
                Error::Io(e)
            }
        })?;
        Self::new(file, delimiter)
    }
}

impl<R: Read> RowReader<R> {
    /// Wrap a byte stream and read its header row
    pub fn new(inner: R, delimiter: char) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter_byte(delimiter)?)
            .has_headers(false)
            .flexible(true)
            .from_reader(Tap::new(inner));

        let mut record = ByteRecord::new();
        if !reader.read_byte_record(&mut record)? {
            return Err(Error::csv_parse("input has no header row"));
        }

        let header = record
            .iter()
            .map(|cell| String::from_utf8_lossy(cell).into_owned())
            .collect();

        let end = reader.position().byte();
        reader.get_mut().release(end);

        Ok(Self {
            reader,
            header,
            record,
            bad_lines: None,
            stats: ReadStats::default(),
        })
    }

    /// Send malformed rows to a side log
    #[must_use]
    pub fn with_bad_lines(mut self, sink: BadLineSink) -> Self {
        self.bad_lines = Some(sink);
        self
    }

    /// Header cells, as read
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Counters so far
    pub fn stats(&self) -> ReadStats {
        self.stats
    }

    /// Read the next well-formed row.
    ///
    /// Returns the fields and the 1-based line the row starts on.
    pub fn read_row(&mut self) -> Result<Option<(&ByteRecord, u64)>> {
        loop {
            let start = self.reader.position().byte();
            if !self.reader.read_byte_record(&mut self.record)? {
                return Ok(None);
            }
            let end = self.reader.position().byte();
            self.stats.rows += 1;

            if self.is_well_formed() {
                self.reader.get_mut().release(end);
                let line = self.record.position().map_or(0, csv::Position::line);
                return Ok(Some((&self.record, line)));
            }

            self.stats.malformed += 1;
            let line = self.record.position().map_or(0, csv::Position::line);
            tracing::debug!(
                line,
                fields = self.record.len(),
                expected = self.header.len(),
                "Skipping malformed row"
            );

            if let Some(sink) = self.bad_lines.as_mut() {
                sink.record(self.reader.get_ref().slice(start, end))?;
            }
            self.reader.get_mut().release(end);
        }
    }

    /// Flush the side log and return the final counters
    pub fn finish(mut self) -> Result<ReadStats> {
        if let Some(sink) = self.bad_lines.as_mut() {
            sink.flush()?;
        }
        Ok(self.stats)
    }

    fn is_well_formed(&self) -> bool {
        self.record.len() == self.header.len()
            && self.record.iter().all(|f| std::str::from_utf8(f).is_ok())
    }
}

/// Read a whole file and report (and optionally log) its malformed rows
pub fn scan_bad_lines(
    path: impl AsRef<Path>,
    delimiter: char,
    sink: Option<BadLineSink>,
) -> Result<ReadStats> {
    let mut reader = RowReader::open(path, delimiter)?;
    if let Some(sink) = sink {
        reader = reader.with_bad_lines(sink);
    }
    while reader.read_row()?.is_some() {}
    reader.finish()
}
