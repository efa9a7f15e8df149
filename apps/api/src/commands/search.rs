//! # Search Command
//!
//! Turns raw query-string values into [`SearchParams`], validates them into
//! [`SearchCriteria`] and runs the owner-scoped search.
//!
//! ```text
//! ?startQuantity=10&endPrice=250.5&startJoinedAt=2024-01-01T00:00:00Z
//!        │
//!        ▼
//! SearchQuery (strings) ──parse──► SearchParams ──validate──► SearchCriteria
//!        │                                                        │
//!        │  "abc" for a number → VALIDATION_ERROR                 ▼
//!        │                                          PRODUCT.search(criteria)
//!        ▼                                                        │
//!   empty value = filter unset                                    ▼
//!                                                   [ProductDto] with discount
//! ```

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::str::FromStr;
use std::time::Instant;
use tracing::{debug, info};

use super::auth::Principal;
use super::products::ProductDto;
use crate::context::AppContext;
use crate::error::ApiError;
use freight_core::{CoreError, SearchCriteria, SearchParams};

/// Search filters exactly as they arrive in the query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub guide_number: Option<String>,
    pub vehicle_plate: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub port: Option<String>,
    pub vault: Option<String>,
    pub start_price: Option<String>,
    pub end_price: Option<String>,
    pub start_quantity: Option<String>,
    pub end_quantity: Option<String>,
    pub start_joined_at: Option<String>,
    pub end_joined_at: Option<String>,
    pub start_delivered_at: Option<String>,
    pub end_delivered_at: Option<String>,
}

fn present(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn number<T: FromStr + Default>(name: &str, raw: &Option<String>) -> Result<T, ApiError> {
    match present(raw) {
        None => Ok(T::default()),
        Some(value) => value
            .parse()
            .map_err(|_| ApiError::validation(format!("invalid {} param: {}", name, value))),
    }
}

fn price(name: &str, raw: &Option<String>) -> Result<f64, ApiError> {
    let value: f64 = number(name, raw)?;
    if !value.is_finite() {
        return Err(ApiError::validation(format!("invalid {} param: {}", name, value)));
    }
    Ok(value)
}

fn timestamp(name: &str, raw: &Option<String>) -> Result<Option<DateTime<Utc>>, ApiError> {
    present(raw)
        .map(|value| {
            DateTime::parse_from_rfc3339(value)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|_| ApiError::validation(format!("invalid {} param: {}", name, value)))
        })
        .transpose()
}

impl SearchQuery {
    /// Parses every present value; absent or empty values stay unset.
    pub fn to_params(&self, principal: &Principal) -> Result<SearchParams, ApiError> {
        Ok(SearchParams {
            client_id: principal.client_id,
            guide_number: present(&self.guide_number).unwrap_or_default().to_string(),
            kind: present(&self.kind).unwrap_or_default().to_string(),
            vehicle_plate: present(&self.vehicle_plate).unwrap_or_default().to_string(),
            port: number("port", &self.port)?,
            vault: number("vault", &self.vault)?,
            start_price: price("startPrice", &self.start_price)?,
            end_price: price("endPrice", &self.end_price)?,
            start_quantity: number("startQuantity", &self.start_quantity)?,
            end_quantity: number("endQuantity", &self.end_quantity)?,
            start_joined_at: timestamp("startJoinedAt", &self.start_joined_at)?,
            end_joined_at: timestamp("endJoinedAt", &self.end_joined_at)?,
            start_delivered_at: timestamp("startDeliveredAt", &self.start_delivered_at)?,
            end_delivered_at: timestamp("endDeliveredAt", &self.end_delivered_at)?,
        })
    }
}

/// Searches the principal's products.
pub async fn search_products(
    ctx: &AppContext,
    principal: &Principal,
    query: &SearchQuery,
) -> Result<Vec<ProductDto>, ApiError> {
    let start = Instant::now();
    debug!(owner = %principal.client_id, ?query, "search_products command");

    let criteria = SearchCriteria::new(query.to_params(principal)?).map_err(CoreError::from)?;
    let products = ctx.repositories.products()?.search(&criteria).await?;
    let dtos: Vec<ProductDto> = products.into_iter().map(ProductDto::from).collect();

    info!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        count = dtos.len(),
        "search_products complete"
    );

    Ok(dtos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::products::create_product;
    use crate::commands::test_support::{context, principal};
    use crate::error::ErrorCode;
    use chrono::TimeZone;
    use freight_core::{ClientId, NewProduct};

    fn principal_for(id: i64) -> Principal {
        Principal {
            client_id: ClientId(id),
        }
    }

    fn product(quantity: i64, price: f64, plate: &str) -> NewProduct {
        NewProduct {
            guide_number: Some("GUIDE00001".to_string()),
            vehicle_plate: Some(plate.to_string()),
            quantity: Some(quantity),
            shipping_price: Some(price),
            vault: Some(1),
            port: Some(0),
            ..Default::default()
        }
    }

    #[test]
    fn test_query_parsing() {
        let query: SearchQuery = serde_json::from_value(serde_json::json!({
            "type": "fragile",
            "startQuantity": "10",
            "endPrice": "250.5",
            "startJoinedAt": "2024-01-01T00:00:00+02:00",
            "vault": "",
        }))
        .unwrap();

        let params = query.to_params(&principal_for(3)).unwrap();
        assert_eq!(params.client_id, ClientId(3));
        assert_eq!(params.kind, "fragile");
        assert_eq!(params.start_quantity, 10);
        assert_eq!(params.end_quantity, 0);
        assert_eq!(params.end_price, 250.5);
        assert_eq!(params.vault, 0);
        assert_eq!(
            params.start_joined_at,
            Some(Utc.with_ymd_and_hms(2023, 12, 31, 22, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_query_parsing_errors() {
        let bad = |query: SearchQuery| query.to_params(&principal_for(1)).unwrap_err();

        let err = bad(SearchQuery {
            port: Some("two".to_string()),
            ..Default::default()
        });
        assert_eq!(err.message, "invalid port param: two");

        let err = bad(SearchQuery {
            start_price: Some("NaN".to_string()),
            ..Default::default()
        });
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = bad(SearchQuery {
            end_delivered_at: Some("yesterday".to_string()),
            ..Default::default()
        });
        assert!(err.message.contains("endDeliveredAt"));
    }

    #[tokio::test]
    async fn test_search_filters_and_discounts() {
        let (ctx, _db) = context().await;
        let alice = principal(&ctx, "alice").await;
        let bob = principal(&ctx, "bob_1").await;

        create_product(&ctx, &alice, product(5, 100.0, "AAA-111")).await.unwrap();
        create_product(&ctx, &alice, product(15, 200.0, "BBB-222")).await.unwrap();
        create_product(&ctx, &bob, product(50, 300.0, "CCC-333")).await.unwrap();

        let query = SearchQuery {
            start_quantity: Some("10".to_string()),
            ..Default::default()
        };
        let found = search_products(&ctx, &alice, &query).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].quantity, Some(15));
        assert!((found[0].discount - 10.0).abs() < 1e-9);

        let query = SearchQuery {
            end_quantity: Some("10".to_string()),
            ..Default::default()
        };
        let found = search_products(&ctx, &alice, &query).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].vehicle_plate.as_deref(), Some("AAA-111"));
        assert_eq!(found[0].discount, 0.0);

        let everything = search_products(&ctx, &alice, &SearchQuery::default()).await.unwrap();
        assert_eq!(everything.len(), 2);
    }

    #[tokio::test]
    async fn test_search_rejects_inverted_range() {
        let (ctx, _db) = context().await;
        let alice = principal(&ctx, "alice").await;

        let query = SearchQuery {
            start_price: Some("300".to_string()),
            end_price: Some("100".to_string()),
            ..Default::default()
        };
        let err = search_products(&ctx, &alice, &query).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("price"));
    }
}
