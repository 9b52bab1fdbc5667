//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::PipelineConfig;
use crate::decode::{scan_bad_lines, BadLineSink};
use crate::engine::Pipeline;
use crate::error::Result;
use crate::query::QueryEngine;
use serde_json::{json, Value};
use std::path::Path;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub fn run(&self) -> Result<()> {
        for message in self.execute()? {
            self.output_message(&message);
        }
        Ok(())
    }

    /// Run the command and collect what it would print
    pub fn execute(&self) -> Result<Vec<Value>> {
        match &self.cli.command {
            Commands::Convert { config, .. } => self.convert(config.as_deref()),
            Commands::Query {
                file,
                view,
                limit,
                sql,
                describe,
            } => self.query(file, view, *limit, sql.as_deref(), *describe),
            Commands::ScanBad {
                input,
                bad_lines,
                delimiter,
            } => self.scan_bad(input, bad_lines, *delimiter),
        }
    }

    fn convert(&self, config_path: Option<&Path>) -> Result<Vec<Value>> {
        let config = match config_path {
            Some(path) => PipelineConfig::from_file(path)?,
            None => PipelineConfig::default(),
        };
        let config = config.apply_overrides(self.cli.command.overrides());

        let pipeline = Pipeline::new(config)?;
        let stats = pipeline.run()?;

        Ok(vec![json!({
            "type": "SUMMARY",
            "output": pipeline.config().output.display().to_string(),
            "stats": stats,
        })])
    }

    fn query(
        &self,
        file: &Path,
        view: &str,
        limit: usize,
        sql: Option<&str>,
        describe: bool,
    ) -> Result<Vec<Value>> {
        let engine = QueryEngine::open_in_memory()?;
        engine.register_parquet(view, file)?;

        if describe {
            let columns = engine
                .columns(view)?
                .into_iter()
                .map(|(name, kind)| json!({ "column_name": name, "column_type": kind }))
                .collect();
            return Ok(columns);
        }

        let result = match sql {
            Some(sql) => engine.query(sql)?,
            None => engine.preview(view, limit)?,
        };
        tracing::debug!(rows = result.len(), "Query finished");
        Ok(result.to_records())
    }

    fn scan_bad(&self, input: &Path, bad_lines: &Path, delimiter: char) -> Result<Vec<Value>> {
        let sink = BadLineSink::open(bad_lines)?;
        let stats = scan_bad_lines(input, delimiter, Some(sink))?;

        tracing::info!(
            rows = stats.rows,
            malformed = stats.malformed,
            bad_lines = %bad_lines.display(),
            "Scan complete"
        );

        Ok(vec![json!({
            "type": "SCAN",
            "input": input.display().to_string(),
            "bad_lines": bad_lines.display().to_string(),
            "rows": stats.rows,
            "malformed": stats.malformed,
        })])
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}
