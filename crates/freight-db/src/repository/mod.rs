//! # Repository Module
//!
//! Storage contracts for Freight and their SQLite implementations.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Command                                                                │
//! │       │  registry.products()?.search(&criteria)                        │
//! │       ▼                                                                 │
//! │  dyn ProductRepository  (trait, this module)                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SqliteProductRepository (product.rs)                                  │
//! │  ├── ProductPredicate (predicate.rs) → WHERE clause                    │
//! │  └── SqlitePool                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every trait is object safe and `Send + Sync` so instances can live in the
//! registry as `Arc<dyn ...>`. All methods report [`CoreError`] values.
//!
//! [`CoreError`]: freight_core::CoreError

use async_trait::async_trait;
use freight_core::{
    Client, ClientId, CoreResult, Product, ProductId, ProductUpdate, SearchCriteria,
};

pub mod auth;
pub mod client;
pub mod predicate;
pub mod product;

/// Column list shared by every product SELECT.
pub(crate) const PRODUCT_COLUMNS: &str = "id, client_id, guide_number, type, quantity, joined_at, \
     delivered_at, shipping_price, vehicle_plate, port, vault";

/// Credential lookups and registration.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// Returns the client id and stored password hash for `username`.
    ///
    /// Fails with `NotFound` when no such client exists.
    async fn lookup(&self, username: &str) -> CoreResult<(ClientId, String)>;

    /// Stores a new client and returns its id.
    ///
    /// Fails with `AlreadyExists` when the username is taken.
    async fn create(&self, client: &Client) -> CoreResult<ClientId>;
}

/// Read access to client accounts.
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// One page of clients, ordered by id.
    async fn list(&self, page: u32) -> CoreResult<Vec<Client>>;

    async fn get(&self, id: ClientId) -> CoreResult<Client>;
}

/// Products, always scoped to an owning client.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// One page of `owner`'s products, ordered by id.
    async fn list(&self, page: u32, owner: ClientId) -> CoreResult<Vec<Product>>;

    /// `NotFound` if `id` does not exist, `Ownership` if it belongs to
    /// another client.
    async fn get(&self, id: ProductId, owner: ClientId) -> CoreResult<Product>;

    async fn create(&self, product: &Product) -> CoreResult<ProductId>;

    async fn search(&self, criteria: &SearchCriteria) -> CoreResult<Vec<Product>>;

    /// Overwrites only the supplied fields. Ownership-checked.
    async fn update(&self, update: &ProductUpdate) -> CoreResult<()>;

    /// Ownership-checked delete.
    async fn delete(&self, id: ProductId, owner: ClientId) -> CoreResult<()>;
}
