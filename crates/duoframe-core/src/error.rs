use arrow_schema::ArrowError;
use thiserror::Error;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    #[error("Schema mismatch: cannot append columns {right:?} onto {left:?}")]
    SchemaMismatch {
        left: Vec<String>,
        right: Vec<String>,
    },

    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error with context chain for better debugging
    #[error("Error in {context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Add context to an error, creating an error chain.
    ///
    /// # Example
    /// ```rust,no_run
    /// use duoframe_core::error::Error;
    /// let err = Error::ColumnNotFound("date".into());
    /// let err = err.with_context("while projecting a time series");
    /// ```
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Error::Context {
            context: context.into(),
            source: Box::new(self) as Box<dyn std::error::Error + Send + Sync>,
        }
    }

    /// Get suggestions for common errors.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Error::ColumnNotFound(name) => vec![
                format!("Check that '{}' is spelled correctly (names are case-sensitive)", name),
                "List the available columns with `Frame::columns()`".into(),
            ],
            Error::SchemaMismatch { .. } => vec![
                "Append requires identical column names in identical order".into(),
                "Select or reorder columns before appending".into(),
            ],
            Error::Config(msg) => {
                if msg.contains("engine") {
                    vec!["Valid engines are 'columnar' (alias 'primary') and 'legacy' (alias 'secondary')".into()]
                } else {
                    vec![]
                }
            }
            _ => vec![],
        }
    }
}
