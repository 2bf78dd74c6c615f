use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience result type for pipeline operations.
pub type SweepResult<T> = Result<T, SweepError>;

/// Error type returned by decoding, projection, encoding and the pipeline.
///
/// Every variant is file-scoped: the pipeline turns it into a
/// [`crate::pipeline::ConversionResult::Failure`] and moves on to the next file.
#[derive(Debug, Error)]
pub enum SweepError {
    /// The input or output format is not one of the supported table formats.
    #[error("unsupported format '{format}'")]
    UnsupportedFormat { format: String },

    /// The input bytes are malformed for the declared format.
    #[error("decode error: {message}")]
    Decode { message: String },

    /// A projection referenced a column that the table does not have.
    #[error("unknown column '{name}'")]
    UnknownColumn { name: String },

    /// Columns handed to [`crate::types::Table::new`] do not form a table.
    #[error("invalid table: {message}")]
    InvalidTable { message: String },

    /// Serializing a table into the requested format failed.
    #[error("encode error: {message}")]
    Encode { message: String },

    /// Underlying I/O error while reading an upload from disk.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SweepError {
    pub(crate) fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_table(message: impl Into<String>) -> Self {
        Self::InvalidTable {
            message: message.into(),
        }
    }

    pub(crate) fn encode(message: impl Into<String>) -> Self {
        Self::Encode {
            message: message.into(),
        }
    }

    /// The coarse category reported back to the caller in a failure result.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            Self::Decode { .. } => ErrorKind::DecodeError,
            Self::UnknownColumn { .. } => ErrorKind::UnknownColumn,
            Self::InvalidTable { .. } => ErrorKind::InvalidTable,
            Self::Encode { .. } => ErrorKind::EncodeError,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}

#[cfg(feature = "excel")]
impl From<calamine::XlsxError> for SweepError {
    fn from(err: calamine::XlsxError) -> Self {
        Self::decode(format!("xlsx: {err}"))
    }
}

#[cfg(feature = "excel")]
impl From<rust_xlsxwriter::XlsxError> for SweepError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::encode(format!("xlsx: {err}"))
    }
}

/// Category of a [`SweepError`], suitable for display and serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    UnsupportedFormat,
    DecodeError,
    UnknownColumn,
    InvalidTable,
    EncodeError,
    Io,
}
