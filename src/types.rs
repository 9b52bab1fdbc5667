//! Common types used throughout taxpayer-etl
//!
//! Shared enums that appear both in the YAML configuration and on the
//! command line.

use serde::{Deserialize, Serialize};

// ============================================================================
// Name Policy
// ============================================================================

/// What to do with a full name that does not split into exactly three tokens
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum NamePolicy {
    /// Keep the row; missing parts become null, extra inner tokens join the middle name
    #[default]
    Pad,
    /// Drop the row
    Reject,
}

impl std::fmt::Display for NamePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NamePolicy::Pad => write!(f, "pad"),
            NamePolicy::Reject => write!(f, "reject"),
        }
    }
}

// ============================================================================
// Compression
// ============================================================================

/// Parquet compression codec
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CompressionCodec {
    #[default]
    Snappy,
    Zstd,
    Gzip,
    Lz4,
    Uncompressed,
}

impl From<CompressionCodec> for parquet::basic::Compression {
    fn from(codec: CompressionCodec) -> Self {
        use parquet::basic::{Compression, GzipLevel, ZstdLevel};
        match codec {
            CompressionCodec::Snappy => Compression::SNAPPY,
            CompressionCodec::Zstd => Compression::ZSTD(ZstdLevel::default()),
            CompressionCodec::Gzip => Compression::GZIP(GzipLevel::default()),
            CompressionCodec::Lz4 => Compression::LZ4_RAW,
            CompressionCodec::Uncompressed => Compression::UNCOMPRESSED,
        }
    }
}

impl std::fmt::Display for CompressionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CompressionCodec::Snappy => "snappy",
            CompressionCodec::Zstd => "zstd",
            CompressionCodec::Gzip => "gzip",
            CompressionCodec::Lz4 => "lz4",
            CompressionCodec::Uncompressed => "uncompressed",
        };
        write!(f, "{name}")
    }
}
