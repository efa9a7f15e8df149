//! # freight-api: Request Layer
//!
//! Everything an HTTP router needs to serve Freight: configuration, password
//! and token services, the shared [`AppContext`], and one async command per
//! endpoint.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  GET /products/search?startQuantity=10&token=...                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  router: read_token() ──► commands::auth::authenticate() ──► Principal │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  commands::search::search_products(&ctx, &principal, query)            │
//! │       │   parse raw values ──► SearchCriteria::new ──► repository      │
//! │       ▼                                                                 │
//! │  Result<Vec<ProductDto>, ApiError>                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  router: ApiError::status() + JSON body                                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Environment configuration
//! - [`auth`] - Argon2 password hashing and JWT tokens
//! - [`context`] - Immutable application context
//! - [`commands`] - Request handlers
//! - [`error`] - API error type
//! - [`telemetry`] - Tracing subscriber setup

pub mod auth;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod telemetry;

pub use config::ApiConfig;
pub use context::AppContext;
pub use error::{ApiError, ErrorCode};
