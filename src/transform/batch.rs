//! Record cleaning and Arrow batch assembly

use super::cleaners::{
    extract_digits, normalize_email, parse_birthdate, split_full_name, timestamp_nanos,
    NameParts,
};
use crate::config::{LengthLimits, PipelineConfig};
use crate::decode::{Chunk, RawRecord};
use crate::error::Result;
use crate::schema::{taxpayer_schema, SourceColumn};
use crate::types::NamePolicy;
use arrow::array::{ArrayRef, StringArray, TimestampNanosecondArray, UInt64Array};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDateTime;
use std::sync::Arc;

/// Settings the cleaning rules depend on
#[derive(Debug, Clone, PartialEq)]
pub struct CleaningRules {
    pub name_policy: NamePolicy,
    pub limits: LengthLimits,
    pub date_formats: Vec<String>,
}

impl Default for CleaningRules {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

impl CleaningRules {
    /// Take the cleaning settings from a pipeline config
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            name_policy: config.name_policy,
            limits: config.limits,
            date_formats: config.date_formats.clone(),
        }
    }

    /// Set the name policy
    #[must_use]
    pub fn with_name_policy(mut self, policy: NamePolicy) -> Self {
        self.name_policy = policy;
        self
    }
}

/// Why a row was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// An identifier is too long (or too large for `u64`)
    Length,
    /// The name policy refused the full name
    Name,
}

/// A row that passed every rule, in output types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedRecord {
    pub name: NameParts,
    pub birthday: Option<NaiveDateTime>,
    pub phone: u64,
    pub snils: u64,
    pub inn: u64,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Apply every cleaning rule to one row
pub fn clean_record(
    record: &RawRecord,
    rules: &CleaningRules,
) -> std::result::Result<CleanedRecord, Rejection> {
    let phone = extract_digits(record.get(SourceColumn::Phone));
    let inn = extract_digits(record.get(SourceColumn::Inn));
    let snils = extract_digits(record.get(SourceColumn::Snils));
    let birthday = parse_birthdate(record.get(SourceColumn::Birthdate), &rules.date_formats);
    let email = normalize_email(record.get(SourceColumn::Email));

    let name = split_full_name(record.get(SourceColumn::FullName), rules.name_policy)
        .ok_or(Rejection::Name)?;

    if !rules.limits.accepts(&phone, &inn, &snils) {
        return Err(Rejection::Length);
    }

    let cast = |digits: &str| digits.parse::<u64>().map_err(|_| Rejection::Length);

    Ok(CleanedRecord {
        name,
        birthday,
        phone: cast(&phone)?,
        snils: cast(&snils)?,
        inn: cast(&inn)?,
        email,
        address: record.get(SourceColumn::Address).map(str::to_owned),
    })
}

/// Lay cleaned rows out as a batch with the taxpayer schema
pub fn build_batch(records: &[CleanedRecord]) -> Result<RecordBatch> {
    let birthdays: TimestampNanosecondArray = records
        .iter()
        .map(|r| r.birthday.as_ref().and_then(timestamp_nanos))
        .collect();

    let columns: Vec<ArrayRef> = vec![
        string_column(records.iter().map(|r| r.name.first.as_deref())),
        string_column(records.iter().map(|r| r.name.middle.as_deref())),
        string_column(records.iter().map(|r| r.name.last.as_deref())),
        Arc::new(birthdays),
        u64_column(records.iter().map(|r| r.phone)),
        u64_column(records.iter().map(|r| r.snils)),
        u64_column(records.iter().map(|r| r.inn)),
        string_column(records.iter().map(|r| r.email.as_deref())),
        string_column(records.iter().map(|r| r.address.as_deref())),
    ];

    Ok(RecordBatch::try_new(taxpayer_schema(), columns)?)
}

fn string_column<'a>(values: impl Iterator<Item = Option<&'a str>>) -> ArrayRef {
    Arc::new(values.collect::<StringArray>())
}

fn u64_column(values: impl Iterator<Item = u64>) -> ArrayRef {
    Arc::new(UInt64Array::from_iter_values(values))
}

/// Per-chunk counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChunkStats {
    pub rows_in: usize,
    pub rows_out: usize,
    pub rejected_length: usize,
    pub rejected_name: usize,
    pub null_birthdays: usize,
}

/// A cleaned chunk, ready to be written
#[derive(Debug, Clone)]
pub struct CleanedChunk {
    pub index: usize,
    pub batch: RecordBatch,
    pub stats: ChunkStats,
}

/// Clean every row of a chunk and build its batch.
///
/// Surviving rows keep their relative order; row numbering starts over at
/// zero in every batch.
pub fn clean_chunk(chunk: &Chunk, rules: &CleaningRules) -> Result<CleanedChunk> {
    let mut stats = ChunkStats {
        rows_in: chunk.len(),
        ..ChunkStats::default()
    };
    let mut kept = Vec::with_capacity(chunk.len());

    for record in &chunk.records {
        match clean_record(record, rules) {
            Ok(cleaned) => {
                if cleaned.birthday.is_none() {
                    stats.null_birthdays += 1;
                }
                kept.push(cleaned);
            }
            Err(reason) => {
                tracing::trace!(line = record.line, ?reason, "Dropping row");
                match reason {
                    Rejection::Length => stats.rejected_length += 1,
                    Rejection::Name => stats.rejected_name += 1,
                }
            }
        }
    }

    stats.rows_out = kept.len();
    let batch = build_batch(&kept)?;

    Ok(CleanedChunk {
        index: chunk.index,
        batch,
        stats,
    })
}
