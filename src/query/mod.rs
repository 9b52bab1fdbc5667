//! Read path over written Parquet files via DuckDB
//!
//! This module exposes an output file as a named view inside an embedded,
//! in-memory DuckDB database, for previews and ad-hoc SQL.

mod engine;

pub use engine::{QueryEngine, QueryResult};
