//! # Error Types
//!
//! Structured error types for vent_core. These errors are designed to be
//! informative for both humans and LLMs, providing enough context to
//! understand and fix issues programmatically.
//!
//! Input validation never stops at the first problem: every offending field
//! is collected into a single [`CalcError::ValidationFailed`] so a caller can
//! highlight all of them at once.
//!
//! ## Example
//!
//! ```rust
//! use vent_core::errors::{CalcError, CalcResult, FieldIssue};
//!
//! fn validate_height(height_ft: f64) -> CalcResult<()> {
//!     if !(height_ft > 0.0) {
//!         return Err(CalcError::validation_failed(vec![FieldIssue::new(
//!             "height_ft",
//!             height_ft.to_string(),
//!             "Height must be a positive number",
//!         )]));
//!     }
//!     Ok(())
//! }
//!
//! let err = validate_height(-3.0).unwrap_err();
//! assert_eq!(err.error_code(), "VALIDATION_FAILED");
//! assert_eq!(err.offending_fields(), vec!["height_ft"]);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for vent_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// One rejected input field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldIssue {
    /// Field name as it appears in the JSON input (e.g. "length_ft")
    pub field: String,
    /// Offending value rendered as text ("NaN", "-4", "<missing>")
    pub value: String,
    /// Why the value was rejected
    pub reason: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        FieldIssue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Issue for a field that was not supplied at all
    pub fn missing(field: impl Into<String>, reason: impl Into<String>) -> Self {
        FieldIssue::new(field, "<missing>", reason)
    }
}

impl std::fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' = {} ({})", self.field, self.value, self.reason)
    }
}

/// Structured error type for calculation operations.
///
/// Each variant provides specific context about what went wrong,
/// enabling programmatic error handling by LLMs and other consumers.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, wrong type, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// One or more inputs failed validation; no computation was performed
    #[error("Validation failed: {}", format_issues(.issues))]
    ValidationFailed { issues: Vec<FieldIssue> },

    /// Leak source component not found in the emission factor table
    #[error("Component type not found: {component_name}")]
    ComponentNotFound { component_name: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

fn format_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a ValidationFailed error from collected issues
    pub fn validation_failed(issues: Vec<FieldIssue>) -> Self {
        CalcError::ValidationFailed { issues }
    }

    /// Create a ComponentNotFound error
    pub fn component_not_found(component_name: impl Into<String>) -> Self {
        CalcError::ComponentNotFound {
            component_name: component_name.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Names of every field this error blames, in reporting order
    pub fn offending_fields(&self) -> Vec<&str> {
        match self {
            CalcError::InvalidInput { field, .. } => vec![field.as_str()],
            CalcError::ValidationFailed { issues } => issues.iter().map(|i| i.field.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::ValidationFailed { .. } => "VALIDATION_FAILED",
            CalcError::ComponentNotFound { .. } => "COMPONENT_NOT_FOUND",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::validation_failed(vec![
            FieldIssue::new("length_ft", "-5", "Length must be a positive number"),
            FieldIssue::missing("leak_rate_cfm", "Supply leak sources or a leak rate"),
        ]);
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"ValidationFailed\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_validation_message_names_every_field() {
        let error = CalcError::validation_failed(vec![
            FieldIssue::new("width_ft", "0", "Width must be a positive number"),
            FieldIssue::new("lfl_percent", "NaN", "LFL must be a positive number"),
        ]);
        let message = error.to_string();
        assert!(message.contains("'width_ft'"));
        assert!(message.contains("'lfl_percent'"));
        assert_eq!(error.offending_fields(), vec!["width_ft", "lfl_percent"]);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CalcError::invalid_input("vent_type", "rounded", "unknown vent type").offending_fields(),
            vec!["vent_type"]
        );
        assert_eq!(CalcError::component_not_found("gasket").error_code(), "COMPONENT_NOT_FOUND");
        assert!(CalcError::component_not_found("gasket").offending_fields().is_empty());
    }
}
