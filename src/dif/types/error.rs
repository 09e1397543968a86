//! Error types for the dif-flavor crate.

use thiserror::Error;

use crate::dif::flavor::validate::ValidationError;

/// Broad category of a [`DifError`], for callers that only need to branch
/// on what went wrong and show the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Format,
    FieldDecode,
    MalformedRow,
    ItemIntegrity,
    Edit,
    Validation,
    Snapshot,
}

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum DifError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A flavor snapshot could not be read or written as JSON.
    #[error("Malformed flavor snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// No record could be found at all: the marker pattern is absent or no
    /// line parses as a record.
    #[error("No data found: {0}")]
    Format(String),

    /// A binary record's key or value bytes could not be decoded.
    #[error("Record at offset {offset:#x} could not be decoded: {reason}")]
    FieldDecode { offset: usize, reason: String },

    /// A text dump line does not have the expected shape.
    #[error("Malformed row on line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    /// A reconstructed list index is missing its name or duration.
    #[error("Flavor '{flavor}' {category} {index:02} is missing its {missing}")]
    ItemIntegrity {
        flavor: String,
        category: &'static str,
        index: usize,
        missing: &'static str,
    },

    /// A duration is not a whole number or decimal.
    #[error("{category} duration must be a whole number or decimal, got '{value}'")]
    InvalidDuration { category: &'static str, value: String },

    /// A required item field was left empty.
    #[error("{category} requires a {field}")]
    MissingField {
        category: &'static str,
        field: &'static str,
    },

    /// An edit addressed a list position that does not exist.
    #[error("No {category} at index {index} (list holds {len})")]
    IndexOutOfRange {
        category: &'static str,
        index: usize,
        len: usize,
    },

    /// The flavor breaks one or more export rules.
    #[error("Flavor cannot be exported until {} problem(s) are resolved", .0.len())]
    Validation(Vec<ValidationError>),
}

impl DifError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DifError::Io(_) => ErrorKind::Io,
            DifError::Json(_) => ErrorKind::Snapshot,
            DifError::Format(_) => ErrorKind::Format,
            DifError::FieldDecode { .. } => ErrorKind::FieldDecode,
            DifError::MalformedRow { .. } => ErrorKind::MalformedRow,
            DifError::ItemIntegrity { .. } => ErrorKind::ItemIntegrity,
            DifError::InvalidDuration { .. }
            | DifError::MissingField { .. }
            | DifError::IndexOutOfRange { .. } => ErrorKind::Edit,
            DifError::Validation(_) => ErrorKind::Validation,
        }
    }
}

/// A convenience `Result` type alias using the crate's `DifError` type.
pub type Result<T> = std::result::Result<T, DifError>;
