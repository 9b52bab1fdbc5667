//! Pipeline configuration
//!
//! The pipeline is driven by a [`PipelineConfig`] that can be loaded from a
//! YAML file and then patched with command-line overrides. Every field has a
//! default, so an empty file (or no file at all) is a valid configuration.

use crate::error::{Error, Result};
use crate::types::{CompressionCodec, NamePolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Rows per batch when nothing else is configured
pub const DEFAULT_BATCH_SIZE: usize = 100_000;

/// Rows per Parquet row group when nothing else is configured
pub const DEFAULT_ROW_GROUP_SIZE: usize = 1024 * 1024;

// ============================================================================
// Top-Level Pipeline Config
// ============================================================================

/// Complete pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Delimited input file
    pub input: Option<PathBuf>,

    /// Parquet output file
    pub output: PathBuf,

    /// Rows per batch
    pub batch_size: usize,

    /// Field delimiter
    pub delimiter: char,

    /// Side log for malformed rows (appended to, never truncated)
    pub bad_lines: Option<PathBuf>,

    /// Handling of full names with a token count other than three
    pub name_policy: NamePolicy,

    /// Exclusive upper bounds on cleaned identifier lengths
    pub limits: LengthLimits,

    /// Accepted birthdate formats, tried in order (chrono syntax)
    pub date_formats: Vec<String>,

    /// Parquet compression codec
    pub compression: CompressionCodec,

    /// Rows per Parquet row group
    pub row_group_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: None,
            output: PathBuf::from("./data/output.parquet"),
            batch_size: DEFAULT_BATCH_SIZE,
            delimiter: ',',
            bad_lines: None,
            name_policy: NamePolicy::default(),
            limits: LengthLimits::default(),
            date_formats: default_date_formats(),
            compression: CompressionCodec::default(),
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }
}

fn default_date_formats() -> Vec<String> {
    [
        "%Y-%m-%d",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%d.%m.%Y",
        "%d/%m/%Y",
        "%Y/%m/%d",
        "%Y%m%d",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

// ============================================================================
// Length Limits
// ============================================================================

/// Exclusive upper bounds on the digit-string length of each identifier.
///
/// A row survives only when `len < limit` holds for all three fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LengthLimits {
    pub phone: usize,
    pub inn: usize,
    pub snils: usize,
}

impl Default for LengthLimits {
    fn default() -> Self {
        Self {
            phone: 11,
            inn: 11,
            snils: 12,
        }
    }
}

impl LengthLimits {
    /// Check cleaned digit strings against the limits
    pub fn accepts(&self, phone: &str, inn: &str, snils: &str) -> bool {
        phone.len() < self.phone && inn.len() < self.inn && snils.len() < self.snils
    }
}

// ============================================================================
// Overrides
// ============================================================================

/// Values supplied on the command line; `None` keeps the configured value
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub batch_size: Option<usize>,
    pub delimiter: Option<char>,
    pub bad_lines: Option<PathBuf>,
    pub name_policy: Option<NamePolicy>,
    pub compression: Option<CompressionCodec>,
}

// ============================================================================
// Loading and Validation
// ============================================================================

impl PipelineConfig {
    /// Create a config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a config from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::file_not_found(path)
            } else {
                Error::config(format!(
                    "Failed to read config file '{}': {e}",
                    path.display()
                ))
            }
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load and validate a config from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        // An empty document deserializes as unit, not as an empty mapping
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides
    #[must_use]
    pub fn apply_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(input) = overrides.input {
            self.input = Some(input);
        }
        if let Some(output) = overrides.output {
            self.output = output;
        }
        if let Some(size) = overrides.batch_size {
            self.batch_size = size;
        }
        if let Some(delimiter) = overrides.delimiter {
            self.delimiter = delimiter;
        }
        if let Some(bad_lines) = overrides.bad_lines {
            self.bad_lines = Some(bad_lines);
        }
        if let Some(policy) = overrides.name_policy {
            self.name_policy = policy;
        }
        if let Some(codec) = overrides.compression {
            self.compression = codec;
        }
        self
    }

    /// Set the input file
    #[must_use]
    pub fn with_input(mut self, input: impl Into<PathBuf>) -> Self {
        self.input = Some(input.into());
        self
    }

    /// Set the output file
    #[must_use]
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Set the batch size
    #[must_use]
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Set the bad-line log
    #[must_use]
    pub fn with_bad_lines(mut self, path: impl Into<PathBuf>) -> Self {
        self.bad_lines = Some(path.into());
        self
    }

    /// Set the name policy
    #[must_use]
    pub fn with_name_policy(mut self, policy: NamePolicy) -> Self {
        self.name_policy = policy;
        self
    }

    /// Delimiter as the single byte the CSV reader expects
    pub fn delimiter_byte(&self) -> Result<u8> {
        delimiter_byte(self.delimiter)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::invalid_value(
                "batch_size",
                "must be greater than zero",
            ));
        }

        if self.row_group_size == 0 {
            return Err(Error::invalid_value(
                "row_group_size",
                "must be greater than zero",
            ));
        }

        for (field, limit) in [
            ("limits.phone", self.limits.phone),
            ("limits.inn", self.limits.inn),
            ("limits.snils", self.limits.snils),
        ] {
            if limit == 0 {
                return Err(Error::invalid_value(field, "must be greater than zero"));
            }
        }

        self.delimiter_byte()?;

        if self.date_formats.is_empty() {
            return Err(Error::invalid_value(
                "date_formats",
                "at least one format is required",
            ));
        }

        if self.bad_lines.as_deref() == Some(self.output.as_path()) {
            return Err(Error::invalid_value(
                "bad_lines",
                "must not be the same file as the output",
            ));
        }

        Ok(())
    }
}

/// Convert a delimiter character into a single ASCII byte
pub fn delimiter_byte(delimiter: char) -> Result<u8> {
    if delimiter.is_ascii() && delimiter != '"' && delimiter != '\n' && delimiter != '\r' {
        Ok(delimiter as u8)
    } else {
        Err(Error::invalid_value(
            "delimiter",
            format!("{delimiter:?} is not a usable single-byte delimiter"),
        ))
    }
}
