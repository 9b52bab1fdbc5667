//! CLI commands and argument parsing

use crate::config::ConfigOverrides;
use crate::types::{CompressionCodec, NamePolicy};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Taxpayer file cleaning and Parquet conversion
#[derive(Parser, Debug)]
#[command(name = "taxpayer-etl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clean a delimited taxpayer file and write it as Parquet
    Convert {
        /// Input file
        #[arg(short = 'i', long = "inp")]
        input: Option<PathBuf>,

        /// Output Parquet file [default: ./data/output.parquet]
        #[arg(short = 'o', long = "out")]
        output: Option<PathBuf>,

        /// Pipeline configuration file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Rows per batch
        #[arg(long)]
        batch_size: Option<usize>,

        /// Field delimiter
        #[arg(long)]
        delimiter: Option<char>,

        /// Append malformed rows to this file
        #[arg(long)]
        bad_lines: Option<PathBuf>,

        /// Handling of full names that are not exactly three words
        #[arg(long)]
        name_policy: Option<NamePolicy>,

        /// Parquet compression codec
        #[arg(long)]
        compression: Option<CompressionCodec>,
    },

    /// Query a written Parquet file through DuckDB
    Query {
        /// Parquet file to expose
        #[arg(long, default_value = "./data/processed.parquet")]
        file: PathBuf,

        /// View name the file is registered under
        #[arg(long, default_value = "taxpayers")]
        view: String,

        /// Rows to preview when no SQL is given
        #[arg(long, default_value = "10")]
        limit: usize,

        /// SQL to run instead of the preview
        #[arg(long, conflicts_with = "describe")]
        sql: Option<String>,

        /// Print the view's columns and types instead of rows
        #[arg(long)]
        describe: bool,
    },

    /// Report malformed rows without converting anything
    ScanBad {
        /// Input file
        #[arg(short = 'i', long = "inp")]
        input: PathBuf,

        /// File the malformed rows are appended to
        #[arg(long, default_value = "./data/bad.txt")]
        bad_lines: PathBuf,

        /// Field delimiter
        #[arg(long, default_value = ",")]
        delimiter: char,
    },
}

impl Commands {
    /// Config overrides carried by a `convert` invocation
    pub fn overrides(&self) -> ConfigOverrides {
        match self {
            Commands::Convert {
                input,
                output,
                batch_size,
                delimiter,
                bad_lines,
                name_policy,
                compression,
                ..
            } => ConfigOverrides {
                input: input.clone(),
                output: output.clone(),
                batch_size: *batch_size,
                delimiter: *delimiter,
                bad_lines: bad_lines.clone(),
                name_policy: *name_policy,
                compression: *compression,
            },
            _ => ConfigOverrides::default(),
        }
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one object per line)
    Json,
    /// Human-readable output
    Pretty,
}
