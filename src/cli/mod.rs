//! CLI module
//!
//! Command-line interface for the conversion pipeline.
//!
//! # Commands
//!
//! - `convert` - Clean an input file and write it as Parquet
//! - `query` - Preview or query a written file through DuckDB
//! - `scan-bad` - Report malformed rows without converting

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
