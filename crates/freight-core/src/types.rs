//! # Domain Types
//!
//! Core domain types for Freight: client accounts and the shipped-goods
//! product records they own.
//!
//! ## Type Relationships
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Domain Model                                      │
//! │                                                                         │
//! │  ┌──────────────┐   owns 0..n    ┌──────────────────────────────────┐  │
//! │  │    Client    │───────────────►│             Product              │  │
//! │  │              │                │                                  │  │
//! │  │ id           │                │ id, client_id                    │  │
//! │  │ username     │                │ guide_number, type, quantity     │  │
//! │  │ password_hash│                │ joined_at, delivered_at          │  │
//! │  │ name,surname │                │ shipping_price, vehicle_plate    │  │
//! │  │ created_at   │                │ port, vault                      │  │
//! │  └──────────────┘                │ discount (computed, not stored)  │  │
//! │                                  └──────────────────────────────────┘  │
//! │                                                                         │
//! │  Write inputs:  NewClient ─► Client::new                               │
//! │                 NewProduct ─► Product::new                             │
//! │                 ProductPatch ─► ProductUpdate::new (partial merge)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Records built by a constructor carry an unassigned id (`0`) until storage
//! hands back the real one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::discount;
use crate::validation::{
    sanitize, validate_guide_number, validate_non_negative, validate_owner, validate_username,
    validate_vehicle_plate, ValidationResult,
};
use crate::ValidationError;

// =============================================================================
// Identifiers
// =============================================================================

/// Primary key of a client row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(transparent)]
pub struct ClientId(pub i64);

/// Primary key of a product row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Client
// =============================================================================

/// A registered client account.
///
/// Immutable once created; there is no update path for clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Client {
    pub id: ClientId,
    pub username: String,
    /// Argon2 PHC string. Never serialized.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub name: String,
    pub surname: String,
    pub created_at: DateTime<Utc>,
}

/// Registration payload as received from the request layer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewClient {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
}

/// Login payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Client {
    /// The stored form of a username: trimmed, HTML-escaped, then checked
    /// against `[a-z0-9_-]{3,32}`.
    pub fn normalize_username(raw: &str) -> ValidationResult<String> {
        let username = sanitize(raw);
        validate_username(&username)?;
        Ok(username)
    }

    /// Builds a client ready to be stored.
    ///
    /// Free-text fields are trimmed and HTML-escaped; the username must then
    /// match `[a-z0-9_-]{3,32}`. The password has already been hashed by the
    /// caller.
    pub fn new(input: NewClient, password_hash: String) -> ValidationResult<Self> {
        let username = Self::normalize_username(&input.username)?;

        if password_hash.is_empty() {
            return Err(ValidationError::Required {
                field: "password".to_string(),
            });
        }

        Ok(Self {
            id: ClientId::default(),
            username,
            password_hash,
            name: sanitize(&input.name),
            surname: sanitize(&input.surname),
            created_at: Utc::now(),
        })
    }
}

// =============================================================================
// Product
// =============================================================================

/// A shipped-goods record owned by a client.
///
/// Every attribute besides the ids is optional, mirroring nullable columns.
/// `discount` is never stored; call [`Product::with_discount`] on every read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: ProductId,
    pub client_id: ClientId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guide_number: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "type"))]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_plate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault: Option<i64>,
    #[serde(default)]
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub discount: f64,
}

/// Creation payload as received from the request layer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewProduct {
    pub guide_number: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub quantity: Option<i64>,
    pub joined_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub shipping_price: Option<f64>,
    pub vehicle_plate: Option<String>,
    pub port: Option<i64>,
    pub vault: Option<i64>,
}

impl Product {
    /// Full-validation constructor.
    ///
    /// ## Rules
    /// - owner id must be positive
    /// - vehicle plate present and shaped `ABC-123`
    /// - guide number present and ten alphanumerics
    /// - port and vault not negative when given
    pub fn new(input: NewProduct, owner: ClientId) -> ValidationResult<Self> {
        validate_owner(owner.0)?;

        let vehicle_plate = input.vehicle_plate.ok_or_else(|| ValidationError::Required {
            field: "vehicle_plate".to_string(),
        })?;
        validate_vehicle_plate(&vehicle_plate)?;

        let guide_number = input.guide_number.ok_or_else(|| ValidationError::Required {
            field: "guide_number".to_string(),
        })?;
        validate_guide_number(&guide_number)?;

        if let Some(port) = input.port {
            validate_non_negative("port", port)?;
        }
        if let Some(vault) = input.vault {
            validate_non_negative("vault", vault)?;
        }

        Ok(Self {
            id: ProductId::default(),
            client_id: owner,
            guide_number: Some(guide_number),
            kind: input.kind,
            quantity: input.quantity,
            joined_at: input.joined_at,
            delivered_at: input.delivered_at,
            shipping_price: input.shipping_price,
            vehicle_plate: Some(vehicle_plate),
            port: input.port,
            vault: input.vault,
            discount: 0.0,
        })
    }

    /// Returns the product with its discount freshly computed.
    pub fn with_discount(mut self) -> Self {
        self.discount = discount::for_product(&self);
        self
    }
}

// =============================================================================
// Partial Update
// =============================================================================

/// Fields a client may change on an existing product. `None` keeps the
/// stored value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductPatch {
    pub guide_number: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub quantity: Option<i64>,
    pub joined_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub shipping_price: Option<f64>,
    pub vehicle_plate: Option<String>,
    pub port: Option<i64>,
    pub vault: Option<i64>,
}

impl ProductPatch {
    /// Validates only the supplied fields.
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(plate) = &self.vehicle_plate {
            validate_vehicle_plate(plate)?;
        }
        if let Some(guide_number) = &self.guide_number {
            validate_guide_number(guide_number)?;
        }
        if let Some(port) = self.port {
            validate_non_negative("port", port)?;
        }
        if let Some(vault) = self.vault {
            validate_non_negative("vault", vault)?;
        }
        Ok(())
    }
}

/// A validated partial update, addressed to one product by its owner.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub id: ProductId,
    pub owner: ClientId,
    pub changes: ProductPatch,
}

impl ProductUpdate {
    /// Partial-merge constructor: validates the patch, not the stored row.
    pub fn new(id: ProductId, owner: ClientId, changes: ProductPatch) -> ValidationResult<Self> {
        validate_owner(owner.0)?;
        changes.validate()?;
        Ok(Self { id, owner, changes })
    }
}
