//! # freight-core: Pure Domain Logic for Freight
//!
//! Everything in this crate is deterministic and free of I/O: the client and
//! product models, input validation, the search criteria model, the discount
//! engine and pagination math.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Freight Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              HTTP router (external collaborator)                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ plain async calls                      │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 freight-api commands                            │   │
//! │  │    register, login, list_products, search_products, ...        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ freight-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  search   │  │ discount  │  │ validation│  │   │
//! │  │   │  Client   │  │  Range<T> │  │ pagination│  │   rules   │  │   │
//! │  │   │  Product  │  │  Criteria │  │           │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  freight-db (Database Layer)                    │   │
//! │  │     SQLite repositories, predicate builder, registry            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Client, Product, ids, patches)
//! - [`search`] - Search criteria with optional two-sided ranges
//! - [`discount`] - Shipping price discount engine
//! - [`pagination`] - Page index to limit/offset
//! - [`error`] - Domain error taxonomy
//! - [`validation`] - Field format rules
//!
//! ## Example Usage
//!
//! ```rust
//! use freight_core::discount::discount;
//! use freight_core::pagination::Pagination;
//!
//! // 12 units with a vault: 5% of the shipping price
//! let off = discount(1, 0, 12, 200.0);
//! assert!((off - 10.0).abs() < 1e-9);
//!
//! let page = Pagination::for_page(2);
//! assert_eq!((page.limit, page.offset), (60, 40));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod discount;
pub mod error;
pub mod pagination;
pub mod search;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use pagination::Pagination;
pub use search::{Range, SearchCriteria, SearchParams};
pub use types::*;
