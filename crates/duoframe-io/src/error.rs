use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow_schema::ArrowError),

    #[cfg(feature = "parquet")]
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("unsupported format: no reader or writer registered for '{0}'")]
    UnsupportedFormat(String),

    #[error("unsupported conversion: no writer registered for '{0}'")]
    UnsupportedConversion(String),

    #[error("'{member}' not in zip-file ({})", .archive.display())]
    MemberNotFound { member: String, archive: PathBuf },

    #[error("invalid option '{key}': {message}")]
    InvalidOption { key: String, message: String },

    #[error("schema error: {0}")]
    Schema(String),

    #[error(transparent)]
    Core(#[from] duoframe_core::Error),
}

impl Error {
    /// Prefix the message of string-carrying variants with `context`.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        let ctx = context.into();
        match self {
            Error::Schema(msg) => Error::Schema(format!("{}: {}", ctx, msg)),
            Error::InvalidOption { key, message } => Error::InvalidOption {
                key,
                message: format!("{}: {}", ctx, message),
            },
            Error::Core(e) => Error::Core(e.with_context(ctx)),
            other => other,
        }
    }

    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Error::UnsupportedFormat(name) => vec![
                format!("Register a reader named '{}' or pass a different format hint", name),
                "Without a hint, unknown suffixes fall back to the csv reader".into(),
            ],
            Error::UnsupportedConversion(name) => vec![
                format!("No writer named '{}'", name),
                "Built-in targets: csv, json, jsonl, ndjson, records, dict, parquet".into(),
            ],
            Error::MemberNotFound { archive, .. } => vec![
                "Member names are matched exactly, including directory prefixes".into(),
                format!("List the entries of {} to find the right name", archive.display()),
            ],
            Error::Core(e) => e.suggestions(),
            _ => vec![],
        }
    }
}
