//! # Product Commands
//!
//! Owner-scoped product CRUD. The principal's client id is the owner for
//! every call; touching another client's product answers `FORBIDDEN` and
//! leaves storage untouched.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  list_products   page ──► PRODUCT.list(page, owner)   ──► [ProductDto]  │
//! │  get_product     id   ──► PRODUCT.get(id, owner)      ──► ProductDto    │
//! │  create_product  body ──► Product::new ──► create     ──► ProductDto    │
//! │  update_product  body ──► ProductUpdate::new ──► update                 │
//! │  delete_product  id   ──► PRODUCT.delete(id, owner)                     │
//! │                                                                         │
//! │  Every ProductDto carries a freshly computed discount.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info};

use super::auth::Principal;
use super::parse_page;
use crate::context::AppContext;
use crate::error::ApiError;
use freight_core::{
    ClientId, CoreError, NewProduct, Product, ProductId, ProductPatch, ProductUpdate,
};

/// Product DTO (Data Transfer Object) for API responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDto {
    pub id: ProductId,
    pub client_id: ClientId,
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
    pub discount: f64,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        let p = p.with_discount();
        ProductDto {
            id: p.id,
            client_id: p.client_id,
            guide_number: p.guide_number,
            kind: p.kind,
            quantity: p.quantity,
            joined_at: p.joined_at,
            delivered_at: p.delivered_at,
            shipping_price: p.shipping_price,
            vehicle_plate: p.vehicle_plate,
            port: p.port,
            vault: p.vault,
            discount: p.discount,
        }
    }
}

pub async fn list_products(
    ctx: &AppContext,
    principal: &Principal,
    page: Option<&str>,
) -> Result<Vec<ProductDto>, ApiError> {
    let start = Instant::now();
    let page = parse_page(page)?;
    debug!(owner = %principal.client_id, page, "list_products command");

    let products = ctx
        .repositories
        .products()?
        .list(page, principal.client_id)
        .await?;
    let dtos: Vec<ProductDto> = products.into_iter().map(ProductDto::from).collect();

    info!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        count = dtos.len(),
        page,
        "list_products complete"
    );

    Ok(dtos)
}

pub async fn get_product(
    ctx: &AppContext,
    principal: &Principal,
    id: ProductId,
) -> Result<ProductDto, ApiError> {
    debug!(id = %id, owner = %principal.client_id, "get_product command");
    let product = ctx
        .repositories
        .products()?
        .get(id, principal.client_id)
        .await?;
    Ok(product.into())
}

/// Validates and stores a product owned by the principal.
pub async fn create_product(
    ctx: &AppContext,
    principal: &Principal,
    input: NewProduct,
) -> Result<ProductDto, ApiError> {
    debug!(owner = %principal.client_id, "create_product command");

    let mut product = Product::new(input, principal.client_id).map_err(CoreError::from)?;
    product.id = ctx.repositories.products()?.create(&product).await?;

    info!(id = %product.id, owner = %principal.client_id, "create_product complete");
    Ok(product.into())
}

/// Overwrites the supplied fields of one of the principal's products.
pub async fn update_product(
    ctx: &AppContext,
    principal: &Principal,
    id: ProductId,
    changes: ProductPatch,
) -> Result<(), ApiError> {
    debug!(id = %id, owner = %principal.client_id, "update_product command");

    let update = ProductUpdate::new(id, principal.client_id, changes).map_err(CoreError::from)?;
    ctx.repositories.products()?.update(&update).await?;

    info!(id = %id, "update_product complete");
    Ok(())
}

pub async fn delete_product(
    ctx: &AppContext,
    principal: &Principal,
    id: ProductId,
) -> Result<(), ApiError> {
    debug!(id = %id, owner = %principal.client_id, "delete_product command");
    ctx.repositories
        .products()?
        .delete(id, principal.client_id)
        .await?;

    info!(id = %id, "delete_product complete");
    Ok(())
}
