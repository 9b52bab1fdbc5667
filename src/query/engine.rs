//! DuckDB-based query engine
//!
//! Registers Parquet files as views and runs read queries against them.
//! Results come back as JSON values so the CLI can print them either way.

use crate::error::{Error, Result};
use duckdb::types::{TimeUnit, Value as DuckValue};
use duckdb::Connection;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::LazyLock;

/// Plain SQL identifier, no quoting needed
static RELATION_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Rows returned by a query
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryResult {
    /// Column names, in result order
    pub columns: Vec<String>,
    /// One JSON value per column, per row
    pub rows: Vec<Vec<Value>>,
}

impl QueryResult {
    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the result has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows as JSON objects keyed by column name
    pub fn to_records(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| {
                let object: Map<String, Value> = self
                    .columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect();
                Value::Object(object)
            })
            .collect()
    }

    /// Values of one column, if present
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| &row[index]).collect())
    }
}

/// Query engine over an in-memory DuckDB connection
pub struct QueryEngine {
    /// DuckDB connection
    conn: Connection,
}

impl std::fmt::Debug for QueryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryEngine").finish_non_exhaustive()
    }
}

impl QueryEngine {
    /// Create an engine backed by a fresh in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::query(format!("Failed to create DuckDB connection: {e}")))?;
        Ok(Self { conn })
    }

    /// Expose a Parquet file as view `name`, replacing any view of that name
    pub fn register_parquet(&self, name: &str, path: impl AsRef<Path>) -> Result<()> {
        validate_relation_name(name)?;

        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::file_not_found(path));
        }

        let literal = path.to_string_lossy().replace('\'', "''");
        let sql =
            format!("CREATE OR REPLACE VIEW {name} AS SELECT * FROM parquet_scan('{literal}');");

        tracing::debug!(view = name, path = %path.display(), "Registering Parquet view");

        self.conn
            .execute_batch(&sql)
            .map_err(|e| Error::query(format!("Failed to register view {name}: {e}")))?;
        Ok(())
    }

    /// First `limit` rows of a relation
    pub fn preview(&self, name: &str, limit: usize) -> Result<QueryResult> {
        validate_relation_name(name)?;
        self.query(&format!("SELECT * FROM {name} LIMIT {limit}"))
    }

    /// Run an arbitrary read query
    pub fn query(&self, sql: &str) -> Result<QueryResult> {
        tracing::debug!("Executing query: {}", sql);

        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| Error::query(format!("Failed to prepare query: {e}")))?;
        let mut rows = stmt
            .query([])
            .map_err(|e| Error::query(format!("Failed to run query: {e}")))?;

        let columns = rows
            .as_ref()
            .map(|stmt| stmt.column_names())
            .unwrap_or_default();

        let mut result = QueryResult {
            columns,
            rows: Vec::new(),
        };

        while let Some(row) = rows.next()? {
            let values = (0..result.columns.len())
                .map(|i| row.get::<_, DuckValue>(i).map(duckdb_value_to_json))
                .collect::<duckdb::Result<Vec<_>>>()?;
            result.rows.push(values);
        }

        Ok(result)
    }

    /// Number of rows in a relation
    pub fn count(&self, name: &str) -> Result<u64> {
        validate_relation_name(name)?;
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT count(*) FROM {name}"), [], |row| row.get(0))
            .map_err(|e| Error::query(format!("Failed to count rows of {name}: {e}")))?;
        u64::try_from(count).map_err(|e| Error::query(e.to_string()))
    }

    /// `(column_name, column_type)` pairs of a relation
    pub fn columns(&self, name: &str) -> Result<Vec<(String, String)>> {
        validate_relation_name(name)?;

        let mut stmt = self
            .conn
            .prepare(&format!("DESCRIBE {name}"))
            .map_err(|e| Error::query(format!("Failed to describe {name}: {e}")))?;

        let columns = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<duckdb::Result<Vec<(String, String)>>>()?;

        Ok(columns)
    }
}

/// Check that `name` can be used unquoted as a view name
pub fn validate_relation_name(name: &str) -> Result<()> {
    if RELATION_NAME.is_match(name) {
        Ok(())
    } else {
        Err(Error::InvalidRelationName {
            name: name.to_string(),
        })
    }
}

fn to_nanos(unit: TimeUnit, value: i64) -> i128 {
    let value = i128::from(value);
    match unit {
        TimeUnit::Second => value * 1_000_000_000,
        TimeUnit::Millisecond => value * 1_000_000,
        TimeUnit::Microsecond => value * 1_000,
        TimeUnit::Nanosecond => value,
    }
}

fn format_timestamp(unit: TimeUnit, value: i64) -> Option<String> {
    let nanos = to_nanos(unit, value);
    let secs = i64::try_from(nanos.div_euclid(1_000_000_000)).ok()?;
    let subsec = u32::try_from(nanos.rem_euclid(1_000_000_000)).ok()?;
    chrono::DateTime::from_timestamp(secs, subsec)
        .map(|dt| dt.naive_utc().format("%Y-%m-%dT%H:%M:%S%.f").to_string())
}

/// Convert DuckDB Value to JSON
fn duckdb_value_to_json(value: DuckValue) -> Value {
    match value {
        DuckValue::Null => Value::Null,
        DuckValue::Boolean(b) => Value::Bool(b),
        DuckValue::TinyInt(i) => Value::Number(i.into()),
        DuckValue::SmallInt(i) => Value::Number(i.into()),
        DuckValue::Int(i) => Value::Number(i.into()),
        DuckValue::BigInt(i) => Value::Number(i.into()),
        DuckValue::HugeInt(i) => Value::String(i.to_string()),
        DuckValue::UTinyInt(i) => Value::Number(i.into()),
        DuckValue::USmallInt(i) => Value::Number(i.into()),
        DuckValue::UInt(i) => Value::Number(i.into()),
        DuckValue::UBigInt(i) => Value::Number(i.into()),
        DuckValue::Float(f) => {
            serde_json::Number::from_f64(f64::from(f)).map_or(Value::Null, Value::Number)
        }
        DuckValue::Double(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        DuckValue::Text(s) => Value::String(s),
        DuckValue::Timestamp(unit, i) => {
            format_timestamp(unit, i).map_or(Value::Number(i.into()), Value::String)
        }
        DuckValue::Date32(d) => {
            // Days since epoch (719163 is the number of days from 1 CE to 1970-01-01)
            d.checked_add(719_163)
                .and_then(chrono::NaiveDate::from_num_days_from_ce_opt)
                .map(|date| Value::String(date.format("%Y-%m-%d").to_string()))
                .unwrap_or(Value::Number(d.into()))
        }
        DuckValue::Time64(unit, t) => {
            let nanos = to_nanos(unit, t);
            let secs = nanos / 1_000_000_000;
            let micros = (nanos % 1_000_000_000) / 1_000;
            Value::String(format!(
                "{:02}:{:02}:{:02}.{:06}",
                secs / 3600,
                (secs % 3600) / 60,
                secs % 60,
                micros
            ))
        }
        other => Value::String(format!("{other:?}")),
    }
}
