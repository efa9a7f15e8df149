//! # API Error Type
//!
//! Unified error type returned by every command.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Command Function  ── Result<T, ApiError>                               │
//! │         │                                                               │
//! │         ├── ValidationError ─────► VALIDATION_ERROR (400)               │
//! │         ├── CoreError::NotFound ─► NOT_FOUND        (404)               │
//! │         ├── AlreadyExists ───────► CONFLICT         (409)               │
//! │         ├── Ownership ───────────► FORBIDDEN        (403)               │
//! │         ├── AuthError / login ───► UNAUTHORIZED     (401)               │
//! │         └── storage/config ──────► INTERNAL         (500, logged)       │
//! │                                                                         │
//! │  Router: (err.status(), Json(err))                                      │
//! │    { "code": "NOT_FOUND", "message": "Maybe it's on your ..." }         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use std::fmt;

use crate::auth::AuthError;
use freight_core::CoreError;

pub const UNAUTHORIZED_MESSAGE: &str = "Wrong credentials, impostor!";
pub const NOT_FOUND_MESSAGE: &str = "Maybe it's on your imagination...";
pub const ALREADY_EXISTS_MESSAGE: &str = "That already exists! We do not allow plagiarism.";

/// Error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "FORBIDDEN",
///   "message": "client 2 does not own product 7"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (400)
    ValidationError,

    /// Missing or rejected credentials (401)
    Unauthorized,

    /// Authenticated, but not the owner (403)
    Forbidden,

    /// Resource not found (404)
    NotFound,

    /// Duplicate record (409)
    Conflict,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    /// HTTP status a router should answer with.
    pub fn status(self) -> u16 {
        match self {
            ErrorCode::ValidationError => 400,
            ErrorCode::Unauthorized => 401,
            ErrorCode::Forbidden => 403,
            ErrorCode::NotFound => 404,
            ErrorCode::Conflict => 409,
            ErrorCode::Internal => 500,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Rejected credentials or token.
    pub fn unauthorized() -> Self {
        ApiError::new(ErrorCode::Unauthorized, UNAUTHORIZED_MESSAGE)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn status(&self) -> u16 {
        self.code.status()
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
            CoreError::NotFound { .. } => ApiError::new(ErrorCode::NotFound, NOT_FOUND_MESSAGE),
            CoreError::AlreadyExists { .. } => {
                ApiError::new(ErrorCode::Conflict, ALREADY_EXISTS_MESSAGE)
            }
            err @ CoreError::Ownership { .. } => ApiError::new(ErrorCode::Forbidden, err.to_string()),
            CoreError::UnknownStorage(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Storage failure: {}", e);
                ApiError::internal("Storage operation failed")
            }
            CoreError::Configuration(e) => {
                tracing::error!("Configuration failure: {}", e);
                ApiError::internal("Server misconfigured")
            }
        }
    }
}

/// Converts credential and token errors to API errors.
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken(reason) => {
                tracing::warn!(reason = %reason, "Rejected token");
                ApiError::unauthorized()
            }
            AuthError::Hashing(e) | AuthError::Signing(e) => {
                tracing::error!("Credential service failure: {}", e);
                ApiError::internal("Credential service failed")
            }
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
