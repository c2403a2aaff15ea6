//! Decode failure classification.

use strum::{AsRefStr, Display};
use thiserror::Error;

/// Category of a fatal decode failure
#[derive(AsRefStr, Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum DecodeErrorKind {
    EncodingError,
    StructureError,
    MetadataError,
    SchemaError,
}

/// Errors that abort a decode. Row-level problems in the data body never
/// produce one of these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Bytes could not be read under any enabled text encoding
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Too few rows, tokenizer failure, or no sensor groups in the header
    #[error("Structure error: {0}")]
    Structure(String),

    /// A required header cell is missing or malformed
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// The header schema itself is inconsistent
    #[error("Schema error: {0}")]
    Schema(String),
}

impl DecodeError {
    pub fn kind(&self) -> DecodeErrorKind {
        match self {
            DecodeError::Encoding(_) => DecodeErrorKind::EncodingError,
            DecodeError::Structure(_) => DecodeErrorKind::StructureError,
            DecodeError::Metadata(_) => DecodeErrorKind::MetadataError,
            DecodeError::Schema(_) => DecodeErrorKind::SchemaError,
        }
    }

    /// Human-readable detail without the category prefix
    pub fn detail(&self) -> &str {
        match self {
            DecodeError::Encoding(d)
            | DecodeError::Structure(d)
            | DecodeError::Metadata(d)
            | DecodeError::Schema(d) => d,
        }
    }
}
