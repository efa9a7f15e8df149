//! # Discount Engine
//!
//! Price reduction granted on a product's shipping price.
//!
//! ## Rules
//! ```text
//! quantity < 10 ──────────────► 0
//!      │ no
//!      ▼
//! vault > 0 ──────────────────► shipping_price × 0.05
//!      │ no
//!      ▼
//! port > 0 ───────────────────► shipping_price × 0.03
//!      │ no
//!      ▼
//!      0
//! ```
//!
//! The discount is recomputed on every read path and never persisted.

use crate::types::Product;

/// Smallest quantity that qualifies for any discount.
pub const MIN_DISCOUNT_QUANTITY: i64 = 10;

/// Rate applied when goods go to a vault.
pub const VAULT_RATE: f64 = 0.05;

/// Rate applied when goods go to a port (and no vault).
pub const PORT_RATE: f64 = 0.03;

/// Computes the discount for the given attributes.
pub fn discount(vault_count: i64, port_count: i64, quantity: i64, shipping_price: f64) -> f64 {
    if quantity < MIN_DISCOUNT_QUANTITY {
        return 0.0;
    }

    if vault_count > 0 {
        shipping_price * VAULT_RATE
    } else if port_count > 0 {
        shipping_price * PORT_RATE
    } else {
        0.0
    }
}

/// Discount for a stored product; absent attributes count as zero.
pub fn for_product(product: &Product) -> f64 {
    discount(
        product.vault.unwrap_or(0),
        product.port.unwrap_or(0),
        product.quantity.unwrap_or(0),
        product.shipping_price.unwrap_or(0.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_below_minimum_quantity_gets_nothing() {
        assert_eq!(discount(5, 5, 9, 100.0), 0.0);
    }

    #[test]
    fn test_vault_wins_over_port() {
        assert!(approx(discount(1, 1, 10, 100.0), 5.0));
    }

    #[test]
    fn test_port_only() {
        assert!(approx(discount(0, 1, 10, 100.0), 3.0));
    }

    #[test]
    fn test_neither_vault_nor_port() {
        assert_eq!(discount(0, 0, 10, 100.0), 0.0);
    }

    #[test]
    fn test_for_product_treats_missing_as_zero() {
        let product = Product {
            quantity: Some(25),
            vault: Some(2),
            ..Default::default()
        };
        // no shipping price recorded
        assert_eq!(for_product(&product), 0.0);

        let product = Product {
            quantity: Some(25),
            port: Some(1),
            shipping_price: Some(200.0),
            ..Default::default()
        };
        assert!(approx(for_product(&product), 6.0));
        assert!(approx(product.with_discount().discount, 6.0));
    }
}
