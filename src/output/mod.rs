//! Output module
//!
//! Writes cleaned Arrow RecordBatches to a single Parquet file.
//!
//! # Overview
//!
//! - [`ParquetWriterConfig`] picks compression, row group size and the
//!   encoding toggles
//! - [`ParquetWriter`] appends batches incrementally and refuses any batch
//!   whose schema differs from the one the file was opened with
//! - [`write_batches_to_parquet`] writes a slice of batches in one call

mod writer;

pub use writer::{write_batches_to_parquet, ParquetWriter, ParquetWriterConfig};
