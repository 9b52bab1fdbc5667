//! Per-batch cleaning
//!
//! Turns a [`Chunk`](crate::decode::Chunk) of raw rows into an Arrow
//! `RecordBatch` with the fixed taxpayer schema.
//!
//! # Rules, in order
//!
//! 1. Phone, SNILS and INN keep their first run of digits, or `"0"`
//! 2. Birthdates parse against the configured formats; failures become null
//! 3. Emails are lower-cased
//! 4. Full names split into first, middle and last name per [`NamePolicy`]
//! 5. Rows with over-long identifiers are dropped (see [`LengthLimits`])
//! 6. Identifiers are cast to `u64` and columns laid out in output order
//!
//! [`NamePolicy`]: crate::types::NamePolicy
//! [`LengthLimits`]: crate::config::LengthLimits

mod batch;
mod cleaners;

pub use batch::{
    build_batch, clean_chunk, clean_record, ChunkStats, CleanedChunk, CleanedRecord,
    CleaningRules, Rejection,
};
pub use cleaners::{
    extract_digits, normalize_email, parse_birthdate, split_full_name, timestamp_nanos,
    NameParts, MISSING_DIGITS,
};

#[cfg(test)]
mod tests;
