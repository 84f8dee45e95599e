use thiserror::Error;

use duoframe_core::Error as CoreError;
use duoframe_io::Error as IoError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Io(#[from] IoError),
}

/// Flat view over the nested error enums.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    UnsupportedFormat,
    UnsupportedConversion,
    MemberNotFound,
    SchemaMismatch,
    ColumnNotFound,
    Schema,
    InvalidOption,
    Io,
    Other,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Core(e) | Error::Io(IoError::Core(e)) => core_kind(e),
            Error::Io(e) => match e {
                IoError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
                IoError::UnsupportedConversion(_) => ErrorKind::UnsupportedConversion,
                IoError::MemberNotFound { .. } => ErrorKind::MemberNotFound,
                IoError::InvalidOption { .. } => ErrorKind::InvalidOption,
                IoError::Schema(_) => ErrorKind::Schema,
                IoError::Io(_) => ErrorKind::Io,
                _ => ErrorKind::Other,
            },
        }
    }

    pub fn with_context(self, context: impl Into<String>) -> Self {
        match self {
            Error::Core(e) => Error::Core(e.with_context(context)),
            Error::Io(e) => Error::Io(e.with_context(context)),
        }
    }

    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Error::Core(e) => e.suggestions(),
            Error::Io(e) => e.suggestions(),
        }
    }
}

fn core_kind(e: &CoreError) -> ErrorKind {
    match e {
        CoreError::Config(_) => ErrorKind::Config,
        CoreError::ColumnNotFound(_) => ErrorKind::ColumnNotFound,
        CoreError::SchemaMismatch { .. } => ErrorKind::SchemaMismatch,
        CoreError::Schema(_) => ErrorKind::Schema,
        CoreError::Context { source, .. } => match source.downcast_ref::<CoreError>() {
            Some(inner) => core_kind(inner),
            None => ErrorKind::Other,
        },
        CoreError::Arrow(_) => ErrorKind::Other,
    }
}
