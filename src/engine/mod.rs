//! Execution engine module
//!
//! Main read loop of a conversion.
//!
//! # Overview
//!
//! The engine module provides:
//! - `Pipeline` - Reads the input in chunks, cleans each chunk and appends
//!   it to the output Parquet file
//! - `PipelineStats` - Counters reported at the end of a run
//!
//! Chunks are processed strictly one after another; memory use is bounded
//! by the batch size, not by the input size.

mod types;

pub use types::PipelineStats;

use crate::config::PipelineConfig;
use crate::decode::{BadLineSink, ChunkReader};
use crate::error::{Error, Result};
use crate::output::{ParquetWriter, ParquetWriterConfig};
use crate::transform::{clean_chunk, CleaningRules};
use std::io::Read;
use std::path::Path;
use std::time::Instant;

/// Batch conversion of a taxpayer file to Parquet
#[derive(Debug, Clone)]
pub struct Pipeline {
    /// Pipeline configuration
    config: PipelineConfig,
    /// Cleaning rules derived from the configuration
    rules: CleaningRules,
    /// Parquet settings derived from the configuration
    writer_config: ParquetWriterConfig,
}

impl Pipeline {
    /// Create a pipeline from a validated configuration
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            rules: CleaningRules::from_config(&config),
            writer_config: ParquetWriterConfig::from_config(&config),
            config,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the conversion from the configured input file
    pub fn run(&self) -> Result<PipelineStats> {
        let input = self
            .config
            .input
            .as_deref()
            .ok_or_else(|| Error::config("No input file given"))?;

        tracing::info!(
            input = %input.display(),
            output = %self.config.output.display(),
            batch_size = self.config.batch_size,
            "Starting conversion"
        );

        let chunks = ChunkReader::open(input, self.config.delimiter, self.config.batch_size)?;
        self.drive(chunks)
    }

    /// Run the conversion from any reader
    pub fn run_reader<R: Read>(&self, input: R) -> Result<PipelineStats> {
        let chunks = ChunkReader::new(input, self.config.delimiter, self.config.batch_size)?;
        self.drive(chunks)
    }

    fn drive<R: Read>(&self, mut chunks: ChunkReader<R>) -> Result<PipelineStats> {
        let start = Instant::now();
        let mut stats = PipelineStats::new();

        if let Some(path) = &self.config.bad_lines {
            chunks = chunks.with_bad_lines(BadLineSink::open(path)?);
        }

        let mut writer: Option<ParquetWriter> = None;

        while let Some(chunk) = chunks.next_chunk()? {
            let cleaned = clean_chunk(&chunk, &self.rules)?;

            if writer.is_none() {
                writer = Some(self.open_writer(&self.config.output, &cleaned.batch)?);
            }
            if let Some(writer) = writer.as_mut() {
                writer.write(&cleaned.batch)?;
            }
            stats.add_batch(&cleaned.stats);

            tracing::info!(
                batch = cleaned.index,
                rows_in = cleaned.stats.rows_in,
                rows_out = cleaned.stats.rows_out,
                rejected_length = cleaned.stats.rejected_length,
                rejected_name = cleaned.stats.rejected_name,
                "Wrote batch"
            );
        }

        stats.set_read_stats(chunks.finish()?);

        match writer {
            Some(writer) => {
                writer.close()?;
            }
            None => tracing::warn!(
                output = %self.config.output.display(),
                "Input has no well-formed rows; no output file written"
            ),
        }

        stats.set_duration(start.elapsed().as_millis() as u64);

        tracing::info!(
            rows_read = stats.rows_read,
            rows_written = stats.rows_written,
            malformed = stats.malformed,
            rejected_length = stats.rejected_length,
            rejected_name = stats.rejected_name,
            null_birthdays = stats.null_birthdays,
            batches = stats.batches,
            duration_ms = stats.duration_ms,
            "Conversion complete"
        );

        Ok(stats)
    }

    fn open_writer(
        &self,
        path: &Path,
        first: &arrow::record_batch::RecordBatch,
    ) -> Result<ParquetWriter> {
        ParquetWriter::new(path, first.schema(), &self.writer_config)
    }
}
