//! # freight-db: Database Layer for Freight
//!
//! Storage for clients and products on SQLite through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Freight Data Flow                                │
//! │                                                                         │
//! │  Command (search_products)                                             │
//! │       │  registry.products()?.search(&criteria)                        │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     freight-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │   Registry   │  │   │
//! │  │   │   (pool.rs)   │    │               │    │              │  │   │
//! │  │   │               │    │ Auth          │    │ AUTH    ──►  │  │   │
//! │  │   │ SqlitePool    │◄───│ Client        │◄───│ CLIENT  ──►  │  │   │
//! │  │   │ Migrations    │    │ Product       │    │ PRODUCT ──►  │  │   │
//! │  │   │               │    │  └ predicate  │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │                 client, product tables                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error classification
//! - [`repository`] - Repository traits and SQLite implementations
//! - [`registry`] - Typed repository registry filled at startup
//!
//! ## Usage
//!
//! ```rust,ignore
//! use freight_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("freight.db")).await?;
//! let registry = db.repositories()?;
//!
//! let products = registry.products()?.list(0, owner).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod registry;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use registry::{RegistryBuilder, RepositoryHandle, RepositoryId, RepositoryRegistry};

// Repository re-exports for convenience
pub use repository::auth::SqliteAuthRepository;
pub use repository::client::SqliteClientRepository;
pub use repository::predicate::ProductPredicate;
pub use repository::product::SqliteProductRepository;
pub use repository::{AuthRepository, ClientRepository, ProductRepository};
