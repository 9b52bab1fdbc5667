//! Input decoding module
//!
//! Reads the delimited taxpayer dump in fixed-size chunks.
//!
//! # Overview
//!
//! - `RowReader` - parses rows, skipping malformed ones (wrong field count,
//!   invalid UTF-8) and copying their exact bytes to a `BadLineSink`
//! - `ChunkReader` - groups well-formed rows into `Chunk`s of `RawRecord`s
//! - `scan_bad_lines` - whole-file malformed-row report

mod bad_lines;
mod chunk;
mod reader;

pub use bad_lines::BadLineSink;
pub use chunk::{Chunk, ChunkReader, RawRecord};
pub use reader::{scan_bad_lines, ReadStats, RowReader};
