//! # Commands Module
//!
//! One async function per endpoint. A router extracts request values, calls
//! the command with the shared [`AppContext`], and serializes the result.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (shared helpers)
//! ├── auth.rs      ◄─── register, login, authenticate
//! ├── clients.rs   ◄─── Client listing and lookup
//! ├── products.rs  ◄─── Product CRUD (owner-scoped)
//! └── search.rs    ◄─── Product search from query-string values
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  GET /products?page=1   Authorization: Bearer eyJ...                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  let principal = auth::authenticate(&ctx, token).await?;               │
//! │  let page = query.get("page");                                          │
//! │  products::list_products(&ctx, &principal, page).await                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Result<Vec<ProductDto>, ApiError>  ──►  200 JSON / err.status()       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`AppContext`]: crate::AppContext

pub mod auth;
pub mod clients;
pub mod products;
pub mod search;

use crate::error::ApiError;

/// Parses the `page` query parameter; absent or empty means page 0.
pub fn parse_page(raw: Option<&str>) -> Result<u32, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(0),
        Some(value) => value
            .parse()
            .map_err(|_| ApiError::validation(format!("invalid page param: {}", value))),
    }
}
