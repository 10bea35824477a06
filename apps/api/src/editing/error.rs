use thiserror::Error;

/// Failures of the inline-edit core. None of these are fatal to a session:
/// the snapshot is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Path not found: '{path}' (missing at {step})")]
    PathNotFound { path: String, step: String },

    #[error("Type mismatch at '{path}': {reason}")]
    TypeMismatch { path: String, reason: String },

    #[error("Duplicate id '{id}' in '{path}'")]
    DuplicateId { path: String, id: String },

    #[error("Id '{id}' at '{path}' cannot be changed")]
    ImmutableId { path: String, id: String },

    #[error("Invalid date '{value}': expected YYYY-MM")]
    InvalidDate { value: String },

    #[error("Invalid theme color '{value}': expected #rrggbb")]
    InvalidThemeColor { value: String },
}
