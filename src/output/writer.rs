//! Parquet file writer
//!
//! Appends Arrow RecordBatches to a single Parquet file. Every non-empty
//! batch becomes its own row group (or several, if it exceeds the row group
//! size).

use crate::config::PipelineConfig;
use crate::error::{Error, Result, ResultExt};
use crate::types::CompressionCodec;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::{EnabledStatistics, WriterProperties};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Configuration for Parquet writer
#[derive(Debug, Clone, PartialEq)]
pub struct ParquetWriterConfig {
    compression: CompressionCodec,
    row_group_size: usize,
    dictionary_enabled: bool,
    statistics_enabled: bool,
}

impl ParquetWriterConfig {
    /// Get the compression codec
    #[must_use]
    pub fn compression(&self) -> CompressionCodec {
        self.compression
    }

    /// Get dictionary encoding enabled
    #[must_use]
    pub fn is_dictionary_enabled(&self) -> bool {
        self.dictionary_enabled
    }

    /// Get statistics enabled
    #[must_use]
    pub fn is_statistics_enabled(&self) -> bool {
        self.statistics_enabled
    }

    /// Get row group size
    #[must_use]
    pub fn row_group_size(&self) -> usize {
        self.row_group_size
    }
}

impl Default for ParquetWriterConfig {
    fn default() -> Self {
        Self {
            compression: CompressionCodec::Snappy,
            row_group_size: crate::config::DEFAULT_ROW_GROUP_SIZE,
            dictionary_enabled: true,
            statistics_enabled: true,
        }
    }
}

impl ParquetWriterConfig {
    /// Create a new config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take compression and row group size from a pipeline config
    #[must_use]
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new()
            .with_compression(config.compression)
            .with_row_group_size(config.row_group_size)
    }

    /// Set compression codec
    #[must_use]
    pub fn with_compression(mut self, compression: CompressionCodec) -> Self {
        self.compression = compression;
        self
    }

    /// Set row group size
    #[must_use]
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Enable or disable dictionary encoding
    #[must_use]
    pub fn with_dictionary(mut self, enabled: bool) -> Self {
        self.dictionary_enabled = enabled;
        self
    }

    /// Enable or disable statistics
    #[must_use]
    pub fn with_statistics(mut self, enabled: bool) -> Self {
        self.statistics_enabled = enabled;
        self
    }

    fn build_properties(&self) -> WriterProperties {
        let mut builder = WriterProperties::builder()
            .set_compression(self.compression.into())
            .set_max_row_group_size(self.row_group_size);

        if !self.dictionary_enabled {
            builder = builder.set_dictionary_enabled(false);
        }

        if !self.statistics_enabled {
            builder = builder.set_statistics_enabled(EnabledStatistics::None);
        }

        builder.build()
    }
}

/// Incremental Parquet file writer.
///
/// The schema is fixed when the writer is created; every later batch must
/// carry exactly that schema.
pub struct ParquetWriter {
    writer: ArrowWriter<File>,
    schema: SchemaRef,
    path: PathBuf,
    rows_written: usize,
    batches_written: usize,
}

impl std::fmt::Debug for ParquetWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParquetWriter")
            .field("path", &self.path)
            .field("rows_written", &self.rows_written)
            .field("batches_written", &self.batches_written)
            .finish_non_exhaustive()
    }
}

impl ParquetWriter {
    /// Create the file (and any missing parent directories) and a writer for it
    pub fn new(
        path: impl AsRef<Path>,
        schema: SchemaRef,
        config: &ParquetWriterConfig,
    ) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let file = File::create(path).map_err(|e| {
            Error::output(format!("Failed to create file {}: {e}", path.display()))
        })?;

        let props = config.build_properties();
        let writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

        tracing::debug!(
            path = %path.display(),
            compression = %config.compression,
            "Opened Parquet writer"
        );

        Ok(Self {
            writer,
            schema,
            path: path.to_path_buf(),
            rows_written: 0,
            batches_written: 0,
        })
    }

    /// Append a RecordBatch to the file
    pub fn write(&mut self, batch: &RecordBatch) -> Result<()> {
        if batch.schema() != self.schema {
            return Err(Error::schema_mismatch(format!(
                "batch {} does not match the file schema",
                self.batches_written
            )));
        }

        if batch.num_rows() > 0 {
            self.writer.write(batch)?;
            self.writer.flush()?;
        }

        self.rows_written += batch.num_rows();
        self.batches_written += 1;
        Ok(())
    }

    /// Schema every batch must match
    #[must_use]
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// Path of the file being written
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the number of rows written so far
    #[must_use]
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Number of batches accepted so far
    #[must_use]
    pub fn batches_written(&self) -> usize {
        self.batches_written
    }

    /// Close the writer and finalize the file
    pub fn close(self) -> Result<usize> {
        let rows = self.rows_written;
        self.writer.close()?;
        tracing::debug!(path = %self.path.display(), rows, "Closed Parquet writer");
        Ok(rows)
    }
}

/// Write multiple RecordBatches to a Parquet file
pub fn write_batches_to_parquet(
    path: impl AsRef<Path>,
    batches: &[RecordBatch],
    config: Option<&ParquetWriterConfig>,
) -> Result<usize> {
    let Some(first) = batches.first() else {
        return Err(Error::output("No batches to write"));
    };

    let default_config = ParquetWriterConfig::default();
    let config = config.unwrap_or(&default_config);

    let mut writer = ParquetWriter::new(path, first.schema(), config)?;
    for batch in batches {
        writer.write(batch)?;
    }
    writer.close()
}
