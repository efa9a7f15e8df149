//! # Validation Module
//!
//! Field format rules for clients, products and search filters.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Request layer (freight-api)                                  │
//! │  ├── Parsing (ints, floats, RFC 3339 timestamps)                       │
//! │  └── Missing/garbled query values                                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Model constructors (freight-core)                            │
//! │  ├── THIS MODULE: plate, guide number, username, counts                │
//! │  └── Range ordering (search criteria)                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE (client.username)                                          │
//! │  └── Foreign key (product.client_id)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Exact length of a guide number.
pub const GUIDE_NUMBER_LEN: usize = 10;

/// Username length bounds (inclusive).
pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 32;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a vehicle plate: three ASCII letters, a hyphen, three digits.
///
/// ## Example
/// ```rust
/// use freight_core::validation::validate_vehicle_plate;
///
/// assert!(validate_vehicle_plate("ABC-123").is_ok());
/// assert!(validate_vehicle_plate("abc-123").is_ok());
/// assert!(validate_vehicle_plate("AB-1234").is_err());
/// ```
pub fn validate_vehicle_plate(plate: &str) -> ValidationResult<()> {
    let bytes = plate.as_bytes();
    let well_formed = bytes.len() == 7
        && bytes[..3].iter().all(u8::is_ascii_alphabetic)
        && bytes[3] == b'-'
        && bytes[4..].iter().all(u8::is_ascii_digit);

    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: "vehicle_plate".to_string(),
            reason: "expected three letters, a hyphen and three digits (ABC-123)".to_string(),
        });
    }

    Ok(())
}

/// Validates a guide number: exactly ten ASCII letters or digits.
///
/// ## Example
/// ```rust
/// use freight_core::validation::validate_guide_number;
///
/// assert!(validate_guide_number("AB12CD34EF").is_ok());
/// assert!(validate_guide_number("AB12").is_err());
/// ```
pub fn validate_guide_number(guide_number: &str) -> ValidationResult<()> {
    if guide_number.len() != GUIDE_NUMBER_LEN
        || !guide_number.bytes().all(|b| b.is_ascii_alphanumeric())
    {
        return Err(ValidationError::InvalidFormat {
            field: "guide_number".to_string(),
            reason: format!("expected {GUIDE_NUMBER_LEN} letters or digits"),
        });
    }

    Ok(())
}

/// Validates a username: 3 to 32 characters of `a-z`, `0-9`, `_` or `-`.
pub fn validate_username(username: &str) -> ValidationResult<()> {
    if username.is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }

    let len_ok = (USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&username.len());
    let chars_ok = username
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-');

    if !len_ok || !chars_ok {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: format!(
                "must be {USERNAME_MIN_LEN}-{USERNAME_MAX_LEN} lowercase letters, digits, '_' or '-'"
            ),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Rejects negative counts (port, vault).
pub fn validate_non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

/// Owner ids come from the database and start at 1.
pub fn validate_owner(client_id: i64) -> ValidationResult<()> {
    if client_id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "client_id".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Sanitization
// =============================================================================

/// Trims surrounding whitespace and escapes HTML special characters.
///
/// Applied to free-text client fields before they are stored.
///
/// ```rust
/// use freight_core::validation::sanitize;
///
/// assert_eq!(sanitize("  <b>Ann</b> "), "&lt;b&gt;Ann&lt;/b&gt;");
/// ```
pub fn sanitize(input: &str) -> String {
    let trimmed = input.trim();
    let mut out = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&#34;"),
            other => out.push(other),
        }
    }
    out
}
