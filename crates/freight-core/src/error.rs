//! # Error Types
//!
//! Domain error taxonomy shared by every Freight crate.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  freight-core errors (this file)                                       │
//! │  ├── CoreError        - Taxonomy every operation reports in            │
//! │  └── ValidationError  - Input validation failures (names the field)    │
//! │                                                                         │
//! │  freight-db errors (separate crate)                                    │
//! │  └── DbError          - Classified sqlx failures                       │
//! │                                                                         │
//! │  freight-api errors (request layer)                                    │
//! │  └── ApiError         - Code + message handed to the router            │
//! │                                                                         │
//! │  Flow: sqlx::Error → DbError → CoreError → ApiError                    │
//! │        ValidationError ────────┘                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::types::{ClientId, ProductId};
use thiserror::Error;

/// Convenience alias used by repositories and commands.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Core Error
// =============================================================================

/// Every failure a Freight operation can report.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Input rejected before any storage call.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The addressed record does not exist.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// A uniqueness constraint rejected the write (duplicate username).
    #[error("{entity} already exists: {detail}")]
    AlreadyExists { entity: &'static str, detail: String },

    /// The acting client does not own the product.
    ///
    /// ## When This Occurs
    /// ```text
    /// update(product 7, acting client 2)
    ///      │
    ///      ▼
    /// UPDATE ... WHERE id = 7 AND client_id = 2   → 0 rows
    ///      │
    ///      ▼
    /// SELECT client_id FROM product WHERE id = 7  → 1
    ///      │
    ///      ▼
    /// Ownership { product: 7, client: 2 }
    /// ```
    #[error("client {client} does not own product {product}")]
    Ownership { product: ProductId, client: ClientId },

    /// Storage failed for a reason that has no better classification.
    #[error("Unknown storage error: {0}")]
    UnknownStorage(String),

    /// Wiring problem: missing repository, wrong capability, bad settings.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CoreError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        CoreError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        CoreError::Configuration(message.into())
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Every variant names the offending field so the caller can point at it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value does not have the expected shape.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Count or id that may not be negative.
    #[error("{field} must not be negative (got {value})")]
    Negative { field: String, value: i64 },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Range whose start lies after its end.
    #[error("{field} range start must not be after its end")]
    InvalidRange { field: String },
}

impl ValidationError {
    /// Name of the field that failed.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::Negative { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::InvalidRange { field } => field,
        }
    }
}
