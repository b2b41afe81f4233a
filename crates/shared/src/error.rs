//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Each variant carries a machine-checkable `error_code` alongside the
/// human-readable message.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed.
    #[error("Authentication failed: {message}")]
    Unauthorized {
        /// Stable error code.
        code: &'static str,
        /// Human-readable message.
        message: String,
    },

    /// Access denied.
    #[error("Access denied: {message}")]
    Forbidden {
        /// Stable error code.
        code: &'static str,
        /// Human-readable message.
        message: String,
    },

    /// Resource not found.
    #[error("Not found: {message}")]
    NotFound {
        /// Stable error code.
        code: &'static str,
        /// Human-readable message.
        message: String,
    },

    /// Malformed or out-of-range input.
    #[error("Validation error: {message}")]
    Validation {
        /// Stable error code.
        code: &'static str,
        /// Human-readable message.
        message: String,
    },

    /// Conflict with existing state (duplicate, overlapping booking).
    #[error("Conflict: {message}")]
    Conflict {
        /// Stable error code.
        code: &'static str,
        /// Human-readable message.
        message: String,
    },

    /// Blocked by referential or business state.
    #[error("Precondition failed: {message}")]
    PreconditionFailed {
        /// Stable error code.
        code: &'static str,
        /// Human-readable message.
        message: String,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized { .. } => 401,
            Self::Forbidden { .. } => 403,
            Self::NotFound { .. } => 404,
            Self::Validation { .. } => 400,
            Self::Conflict { .. } => 409,
            Self::PreconditionFailed { .. } => 422,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized { code, .. }
            | Self::Forbidden { code, .. }
            | Self::NotFound { code, .. }
            | Self::Validation { code, .. }
            | Self::Conflict { code, .. }
            | Self::PreconditionFailed { code, .. } => *code,
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Shorthand for a validation error with the generic code.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            code: "VALIDATION_ERROR",
            message: message.into(),
        }
    }

    /// Shorthand for an authentication failure.
    #[must_use]
    pub fn unauthorized(code: &'static str, message: impl Into<String>) -> Self {
        Self::Unauthorized {
            code,
            message: message.into(),
        }
    }
}
