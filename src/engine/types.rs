//! Engine types
//!
//! Counters reported by a pipeline run.

use crate::decode::ReadStats;
use crate::transform::ChunkStats;
use serde::Serialize;

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    /// Data rows read from the input, malformed ones included
    pub rows_read: usize,
    /// Rows written to the output file
    pub rows_written: usize,
    /// Rows skipped because they could not be parsed
    pub malformed: usize,
    /// Rows dropped by the length filters
    pub rejected_length: usize,
    /// Rows dropped by the name policy
    pub rejected_name: usize,
    /// Written rows whose birthdate is null
    pub null_birthdays: usize,
    /// Batches appended to the output file
    pub batches: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl PipelineStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the counters of one written batch
    pub fn add_batch(&mut self, chunk: &ChunkStats) {
        self.rows_written += chunk.rows_out;
        self.rejected_length += chunk.rejected_length;
        self.rejected_name += chunk.rejected_name;
        self.null_birthdays += chunk.null_birthdays;
        self.batches += 1;
    }

    /// Take the reader's final counters
    pub fn set_read_stats(&mut self, read: ReadStats) {
        self.rows_read = read.rows;
        self.malformed = read.malformed;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }

    /// Rows dropped for any reason
    pub fn rows_dropped(&self) -> usize {
        self.malformed + self.rejected_length + self.rejected_name
    }
}
