//! Parquet writer into an in-memory buffer (enabled with `--features parquet`).
//!
//! Options:
//! - `compression`: `uncompressed` | `snappy` (default) | `gzip` | `zstd` | `lz4`
//! - `row_group_size` (integer): max rows per row group

use std::str::FromStr;

use arrow_array::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::WriterProperties;

use crate::error::{Error, Result};
use crate::options::FormatOptions;
use crate::registry::Converted;

/// Compression codec for Parquet files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParquetCompression {
    Uncompressed,
    #[default]
    Snappy,
    Gzip,
    Zstd,
    Lz4,
}

impl ParquetCompression {
    fn to_parquet_compression(self) -> Compression {
        match self {
            ParquetCompression::Uncompressed => Compression::UNCOMPRESSED,
            ParquetCompression::Snappy => Compression::SNAPPY,
            ParquetCompression::Gzip => Compression::GZIP(Default::default()),
            ParquetCompression::Zstd => Compression::ZSTD(ZstdLevel::default()),
            ParquetCompression::Lz4 => Compression::LZ4,
        }
    }
}

impl FromStr for ParquetCompression {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "uncompressed" | "none" => Ok(Self::Uncompressed),
            "snappy" => Ok(Self::Snappy),
            "gzip" => Ok(Self::Gzip),
            "zstd" => Ok(Self::Zstd),
            "lz4" => Ok(Self::Lz4),
            other => Err(Error::InvalidOption {
                key: "compression".into(),
                message: format!("unknown codec '{}'", other),
            }),
        }
    }
}

pub fn write_parquet(batch: &RecordBatch, options: &FormatOptions) -> Result<Converted> {
    let compression = match options.get_str("compression")? {
        Some(name) => name.parse()?,
        None => ParquetCompression::default(),
    };

    let mut props = WriterProperties::builder().set_compression(compression.to_parquet_compression());
    if let Some(rows) = options.get_positive_usize("row_group_size")? {
        props = props.set_max_row_group_size(rows);
    }

    let mut buf = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buf, batch.schema(), Some(props.build()))?;
    writer.write(batch)?;
    writer.close()?;
    Ok(Converted::Bytes(buf))
}
