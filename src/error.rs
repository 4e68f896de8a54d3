//! Error types for the property history engine

use thiserror::Error;

use crate::types::FieldError;

/// Result type for service operations
pub type HistoryResult<T> = Result<T, HistoryError>;

/// Result type for event store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the history service
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Malformed input, reported field by field. Nothing was written.
    #[error("validation failed: {}", join_fields(.0))]
    Validation(Vec<FieldError>),

    #[error("unsupported export format '{0}'")]
    UnsupportedFormat(String),

    #[error("internal failure: {0}")]
    Internal(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl HistoryError {
    /// Message safe to show to callers; store and internal faults stay generic
    pub fn public_message(&self, operation: &str) -> String {
        match self {
            HistoryError::Validation(_) => "Validation failed".to_string(),
            HistoryError::UnsupportedFormat(format) => {
                format!("Unsupported export format '{}'", format)
            }
            HistoryError::Store(StoreError::InvalidPatch(_)) => "Validation failed".to_string(),
            HistoryError::Internal(_) | HistoryError::Store(_) => {
                format!("Internal error while {}", operation)
            }
        }
    }

    /// Field errors carried by validation failures
    pub fn field_errors(&self) -> Vec<FieldError> {
        match self {
            HistoryError::Validation(errors) => errors.clone(),
            HistoryError::Store(StoreError::InvalidPatch(error)) => vec![error.clone()],
            _ => Vec::new(),
        }
    }

    pub fn is_internal(&self) -> bool {
        match self {
            HistoryError::Internal(_) => true,
            HistoryError::Store(StoreError::InvalidPatch(_)) => false,
            HistoryError::Store(_) => true,
            _ => false,
        }
    }
}

/// Errors raised by event store implementations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("event id '{0}' already exists")]
    DuplicateId(String),

    #[error("invalid patch: {0}")]
    InvalidPatch(FieldError),
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
