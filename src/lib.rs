// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # taxpayer-etl
//!
//! Batch cleaning of large taxpayer dumps into a single Parquet file, with
//! an embedded DuckDB read path for looking at the result.
//!
//! ## Features
//!
//! - **Chunked Reading**: Bounded memory regardless of input size
//! - **Malformed Row Handling**: Broken rows are skipped and optionally logged verbatim
//! - **Column Cleaning**: Digit extraction for phone/SNILS/INN, name splitting,
//!   email lower-casing, lenient birthdate parsing
//! - **Parquet Output**: Fixed Arrow schema, Snappy by default, one row group per batch
//! - **DuckDB Queries**: Register the output as a view and preview or query it
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use taxpayer_etl::{Pipeline, PipelineConfig, QueryEngine, Result};
//!
//! fn main() -> Result<()> {
//!     let config = PipelineConfig::default()
//!         .with_input("./data/dump.csv")
//!         .with_output("./data/processed.parquet");
//!
//!     let stats = Pipeline::new(config)?.run()?;
//!     println!("{} rows written", stats.rows_written);
//!
//!     let engine = QueryEngine::open_in_memory()?;
//!     engine.register_parquet("taxpayers", "./data/processed.parquet")?;
//!     let preview = engine.preview("taxpayers", 10)?;
//!     println!("{:?}", preview.to_records());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                          Pipeline                              │
//! │        run() → PipelineStats      (one chunk at a time)        │
//! └────────────────────────────────────────────────────────────────┘
//!                                 │
//! ┌──────────────┬────────────────┴───────────────┬───────────────┐
//! │    Decode    │           Transform            │    Output     │
//! ├──────────────┼────────────────────────────────┼───────────────┤
//! │ CSV rows     │ Digit extraction               │ Arrow batch   │
//! │ Chunking     │ Name split / email / birthdate │ Parquet file  │
//! │ Bad-line log │ Length filters                 │               │
//! └──────────────┴────────────────────────────────┴───────────────┘
//!                                 │
//! ┌────────────────────────────────────────────────────────────────┐
//! │            Query: DuckDB view over the Parquet file            │
//! └────────────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the pipeline
pub mod error;

/// Shared enums used by config and CLI
pub mod types;

/// Pipeline configuration
pub mod config;

/// Source columns, header layout and the output schema
pub mod schema;

/// Chunked reading of the input file
pub mod decode;

/// Per-batch cleaning rules
pub mod transform;

/// Parquet output
pub mod output;

/// Main execution engine
pub mod engine;

/// DuckDB read path
pub mod query;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::PipelineConfig;
pub use engine::{Pipeline, PipelineStats};
pub use error::{Error, Result};
pub use query::{QueryEngine, QueryResult};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
