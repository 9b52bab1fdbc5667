//! Fixed-size chunking of input rows

use super::bad_lines::BadLineSink;
use super::reader::{ReadStats, RowReader};
use crate::error::Result;
use crate::schema::{SourceColumn, SourceLayout};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One well-formed input row, reduced to the source columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based line the row starts on
    pub line: u64,
    fields: [Option<String>; SourceColumn::ALL.len()],
}

impl RawRecord {
    /// Build a record from values in [`SourceColumn::ALL`] order
    pub fn new(line: u64, values: [Option<&str>; SourceColumn::ALL.len()]) -> Self {
        Self {
            line,
            fields: values.map(|v| v.filter(|s| !s.is_empty()).map(str::to_owned)),
        }
    }

    /// Value of a source column; empty fields are `None`
    pub fn get(&self, column: SourceColumn) -> Option<&str> {
        self.fields[column.slot()].as_deref()
    }
}

/// A batch of consecutive well-formed rows
#[derive(Debug, Clone, Default)]
pub struct Chunk {
    /// 0-based chunk number
    pub index: usize,
    pub records: Vec<RawRecord>,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Yields [`Chunk`]s of at most `batch_size` rows
pub struct ChunkReader<R: Read> {
    rows: RowReader<R>,
    layout: SourceLayout,
    batch_size: usize,
    next_index: usize,
    done: bool,
}

impl ChunkReader<File> {
    /// Open a file, resolving source columns from its header
    pub fn open(path: impl AsRef<Path>, delimiter: char, batch_size: usize) -> Result<Self> {
        Self::from_rows(RowReader::open(path, delimiter)?, batch_size)
    }
}

impl<R: Read> ChunkReader<R> {
    /// Wrap a byte stream, resolving source columns from its header
    pub fn new(inner: R, delimiter: char, batch_size: usize) -> Result<Self> {
        Self::from_rows(RowReader::new(inner, delimiter)?, batch_size)
    }

    fn from_rows(rows: RowReader<R>, batch_size: usize) -> Result<Self> {
        let layout = SourceLayout::from_header(rows.header().iter().map(String::as_str))?;
        Ok(Self {
            rows,
            layout,
            batch_size: batch_size.max(1),
            next_index: 0,
            done: false,
        })
    }

    /// Send malformed rows to a side log
    #[must_use]
    pub fn with_bad_lines(mut self, sink: BadLineSink) -> Self {
        self.rows = self.rows.with_bad_lines(sink);
        self
    }

    /// Resolved column positions
    pub fn layout(&self) -> &SourceLayout {
        &self.layout
    }

    /// Counters so far
    pub fn stats(&self) -> ReadStats {
        self.rows.stats()
    }

    /// Read the next chunk; `None` once the input is exhausted
    pub fn next_chunk(&mut self) -> Result<Option<Chunk>> {
        if self.done {
            return Ok(None);
        }

        let mut records = Vec::with_capacity(self.batch_size.min(64 * 1024));
        while records.len() < self.batch_size {
            let Some((row, line)) = self.rows.read_row()? else {
                self.done = true;
                break;
            };

            let values = SourceColumn::ALL.map(|column| {
                row.get(self.layout.position(column))
                    .and_then(|bytes| std::str::from_utf8(bytes).ok())
            });
            records.push(RawRecord::new(line, values));
        }

        if records.is_empty() {
            return Ok(None);
        }

        let chunk = Chunk {
            index: self.next_index,
            records,
        };
        self.next_index += 1;
        Ok(Some(chunk))
    }

    /// Flush the side log and return the final counters
    pub fn finish(self) -> Result<ReadStats> {
        self.rows.finish()
    }
}

impl<R: Read> Iterator for ChunkReader<R> {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_chunk().transpose()
    }
}
