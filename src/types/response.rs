//! Uniform result envelope for caller-facing operations

use serde::{Deserialize, Serialize};

use super::request::FieldError;

/// Why an operation did not succeed. Not part of the wire shape; transports
/// use it to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    Success,
    /// Caller input was refused
    Rejected,
    NotFound,
    /// Store or internal fault
    Failed,
}

/// `{success, data?, message?, errors}` returned by every service operation
/// that can be refused
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
    #[serde(skip)]
    pub outcome: Outcome,
}

impl<T> ServiceResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: Vec::new(),
            outcome: Outcome::Success,
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::ok(data)
        }
    }

    fn unsuccessful(outcome: Outcome, message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            errors,
            outcome,
        }
    }

    /// Internal fault; `message` must already be safe to show
    pub fn failure(message: impl Into<String>) -> Self {
        Self::unsuccessful(Outcome::Failed, message, Vec::new())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::unsuccessful(Outcome::NotFound, message, Vec::new())
    }

    pub fn rejected(message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self::unsuccessful(Outcome::Rejected, message, errors)
    }

    /// Names of the rejected fields, in validation order
    pub fn error_fields(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.field.as_str()).collect()
    }
}
