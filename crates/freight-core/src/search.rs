//! # Search Criteria
//!
//! Validated filter set for product search.
//!
//! ## From raw parameters to criteria
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SearchParams (raw)                 SearchCriteria (validated)          │
//! │  ─────────────────────              ──────────────────────────          │
//! │  guide_number: ""          ──►      guide_number: None                  │
//! │  port: 0                   ──►      port: None                          │
//! │  port: 3                   ──►      port: Some(3)                       │
//! │  start_price: 0.0                                                       │
//! │  end_price: 50.0           ──►      price: UpperOnly(50.0)              │
//! │  start_quantity: 10                                                     │
//! │  end_quantity: 0           ──►      quantity: LowerOnly(10)             │
//! │  joined_at: None, None     ──►      joined_at: Unbounded                │
//! │                                                                         │
//! │  Zero or empty means "unset", never a literal bound.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Validation order (first failure wins)
//! 1. port ≥ 0
//! 2. vault ≥ 0
//! 3. guide number format (when given)
//! 4. vehicle plate format (when given)
//! 5. price bounds finite, range ordering
//! 6. quantity range ordering
//! 7. joined_at range ordering
//! 8. delivered_at range ordering

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::ClientId;
use crate::validation::{
    validate_guide_number, validate_non_negative, validate_vehicle_plate, ValidationResult,
};

// =============================================================================
// Range
// =============================================================================

/// A filter over an ordered value whose two bounds are independently optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum Range<T> {
    #[default]
    Unbounded,
    LowerOnly(T),
    UpperOnly(T),
    Both(T, T),
}

impl<T: PartialOrd + Copy> Range<T> {
    /// Builds a range from two optional bounds.
    ///
    /// The between-check applies only when both bounds are present; a single
    /// missing bound is enough to fall back to a one-sided filter.
    pub fn from_bounds(start: Option<T>, end: Option<T>) -> Self {
        match (start, end) {
            (Some(start), Some(end)) => Range::Both(start, end),
            (Some(start), None) => Range::LowerOnly(start),
            (None, Some(end)) => Range::UpperOnly(end),
            (None, None) => Range::Unbounded,
        }
    }

    /// Rejects `Both(start, end)` with `start > end`.
    fn check_order(self, field: &str) -> ValidationResult<Self> {
        if let Range::Both(lo, hi) = self {
            if lo > hi {
                return Err(ValidationError::InvalidRange {
                    field: field.to_string(),
                });
            }
        }
        Ok(self)
    }
}

impl<T: PartialOrd> Range<T> {
    /// Inclusive containment test; the in-memory twin of the SQL filter.
    pub fn contains(&self, value: &T) -> bool {
        match self {
            Range::Unbounded => true,
            Range::LowerOnly(lo) => value >= lo,
            Range::UpperOnly(hi) => value <= hi,
            Range::Both(lo, hi) => lo <= value && value <= hi,
        }
    }
}

// =============================================================================
// Raw parameters
// =============================================================================

/// Search filters as the request layer hands them over.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchParams {
    pub client_id: ClientId,
    pub guide_number: String,
    pub kind: String,
    pub vehicle_plate: String,
    pub port: i64,
    pub vault: i64,
    pub start_price: f64,
    pub end_price: f64,
    pub start_quantity: i64,
    pub end_quantity: i64,
    pub start_joined_at: Option<DateTime<Utc>>,
    pub end_joined_at: Option<DateTime<Utc>>,
    pub start_delivered_at: Option<DateTime<Utc>>,
    pub end_delivered_at: Option<DateTime<Utc>>,
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn non_zero(value: i64) -> Option<i64> {
    (value != 0).then_some(value)
}

fn non_zero_price(value: f64) -> Option<f64> {
    (value != 0.0).then_some(value)
}

/// NaN and infinities have no place in a price bound.
fn finite_price(value: f64) -> ValidationResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: format!("bound must be a finite number, got {value}"),
        })
    }
}

// =============================================================================
// Criteria
// =============================================================================

/// Validated product search, always scoped to one owner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    pub owner: ClientId,
    pub guide_number: Option<String>,
    pub kind: Option<String>,
    pub vehicle_plate: Option<String>,
    pub port: Option<i64>,
    pub vault: Option<i64>,
    pub price: Range<f64>,
    pub quantity: Range<i64>,
    pub joined_at: Range<DateTime<Utc>>,
    pub delivered_at: Range<DateTime<Utc>>,
}

impl SearchCriteria {
    /// Validates raw parameters into criteria.
    pub fn new(params: SearchParams) -> ValidationResult<Self> {
        validate_non_negative("port", params.port)?;
        validate_non_negative("vault", params.vault)?;

        let guide_number = non_empty(params.guide_number);
        if let Some(guide_number) = &guide_number {
            validate_guide_number(guide_number)?;
        }

        let vehicle_plate = non_empty(params.vehicle_plate);
        if let Some(plate) = &vehicle_plate {
            validate_vehicle_plate(plate)?;
        }

        let price = Range::from_bounds(
            non_zero_price(finite_price(params.start_price)?),
            non_zero_price(finite_price(params.end_price)?),
        )
        .check_order("price")?;
        let quantity = Range::from_bounds(
            non_zero(params.start_quantity),
            non_zero(params.end_quantity),
        )
        .check_order("quantity")?;
        let joined_at = Range::from_bounds(params.start_joined_at, params.end_joined_at)
            .check_order("joined_at")?;
        let delivered_at = Range::from_bounds(params.start_delivered_at, params.end_delivered_at)
            .check_order("delivered_at")?;

        Ok(Self {
            owner: params.client_id,
            guide_number,
            kind: non_empty(params.kind),
            vehicle_plate,
            port: non_zero(params.port),
            vault: non_zero(params.vault),
            price,
            quantity,
            joined_at,
            delivered_at,
        })
    }

    /// Criteria matching every product of `owner`.
    pub fn for_owner(owner: ClientId) -> Self {
        Self {
            owner,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn params() -> SearchParams {
        SearchParams {
            client_id: ClientId(1),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_params_are_unbounded() {
        let criteria = SearchCriteria::new(params()).unwrap();
        assert_eq!(criteria, SearchCriteria::for_owner(ClientId(1)));
        assert_eq!(criteria.price, Range::Unbounded);
    }

    #[test]
    fn test_zero_means_unset() {
        let criteria = SearchCriteria::new(SearchParams {
            start_quantity: 10,
            end_quantity: 0,
            port: 0,
            ..params()
        })
        .unwrap();
        assert_eq!(criteria.quantity, Range::LowerOnly(10));
        assert_eq!(criteria.port, None);
    }

    #[test]
    fn test_lower_only_quantity() {
        let range = Range::from_bounds(Some(10), None);
        assert!(range.contains(&15));
        assert!(!range.contains(&5));
    }

    #[test]
    fn test_upper_only_quantity() {
        let range = Range::from_bounds(None, Some(10));
        assert!(range.contains(&5));
        assert!(!range.contains(&15));
    }

    #[test]
    fn test_both_bounds_inclusive() {
        let range = Range::from_bounds(Some(1.5), Some(3.0));
        assert!(range.contains(&1.5));
        assert!(range.contains(&3.0));
        assert!(!range.contains(&3.1));
        assert!(Range::<f64>::Unbounded.contains(&-1.0));
    }

    #[test]
    fn test_non_finite_price_bounds_rejected() {
        for (start_price, end_price) in [(f64::NAN, 0.0), (0.0, f64::INFINITY), (f64::NAN, 5.0)] {
            let err = SearchCriteria::new(SearchParams {
                start_price,
                end_price,
                ..params()
            })
            .unwrap_err();
            assert_eq!(err.field(), "price");
            assert!(matches!(err, ValidationError::InvalidFormat { .. }));
        }
    }

    #[test]
    fn test_inverted_ranges_name_their_field() {
        let err = SearchCriteria::new(SearchParams {
            start_price: 10.0,
            end_price: 5.0,
            ..params()
        })
        .unwrap_err();
        assert_eq!(err.field(), "price");

        let err = SearchCriteria::new(SearchParams {
            start_quantity: 9,
            end_quantity: 3,
            ..params()
        })
        .unwrap_err();
        assert_eq!(err.field(), "quantity");

        let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        let err = SearchCriteria::new(SearchParams {
            start_joined_at: Some(late),
            end_joined_at: Some(early),
            ..params()
        })
        .unwrap_err();
        assert_eq!(err.field(), "joined_at");

        let err = SearchCriteria::new(SearchParams {
            start_delivered_at: Some(late),
            end_delivered_at: Some(early),
            ..params()
        })
        .unwrap_err();
        assert_eq!(err.field(), "delivered_at");
    }

    #[test]
    fn test_validation_order() {
        // every field is wrong; port is reported first
        let bad = SearchParams {
            port: -1,
            vault: -1,
            guide_number: "x".to_string(),
            vehicle_plate: "x".to_string(),
            start_price: 2.0,
            end_price: 1.0,
            ..params()
        };
        assert_eq!(SearchCriteria::new(bad.clone()).unwrap_err().field(), "port");

        let bad = SearchParams { port: 0, ..bad };
        assert_eq!(SearchCriteria::new(bad.clone()).unwrap_err().field(), "vault");

        let bad = SearchParams { vault: 0, ..bad };
        assert_eq!(
            SearchCriteria::new(bad.clone()).unwrap_err().field(),
            "guide_number"
        );

        let bad = SearchParams {
            guide_number: String::new(),
            ..bad
        };
        assert_eq!(
            SearchCriteria::new(bad.clone()).unwrap_err().field(),
            "vehicle_plate"
        );

        let bad = SearchParams {
            vehicle_plate: String::new(),
            ..bad
        };
        assert_eq!(SearchCriteria::new(bad).unwrap_err().field(), "price");
    }

    #[test]
    fn test_one_sided_ranges_skip_ordering_check() {
        let criteria = SearchCriteria::new(SearchParams {
            start_price: 100.0,
            start_quantity: 50,
            ..params()
        })
        .unwrap();
        assert_eq!(criteria.price, Range::LowerOnly(100.0));
        assert_eq!(criteria.quantity, Range::LowerOnly(50));
    }
}
