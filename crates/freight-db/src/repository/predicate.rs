//! # Product Search Predicate
//!
//! Turns [`SearchCriteria`] into a conjunction of column conditions.
//!
//! ## Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SearchCriteria                       ProductPredicate                  │
//! │  ──────────────                       ────────────────                  │
//! │  guide_number: Some("AB12CD34EF") ──► Eq(guide_number, "AB12CD34EF")    │
//! │  kind: None                       ──► (nothing)                         │
//! │  price: Both(10.0, 50.0)          ──► Within(shipping_price, Both)      │
//! │  quantity: LowerOnly(10)          ──► Within(quantity, LowerOnly)       │
//! │  joined_at: UpperOnly(t)          ──► Within(joined_at, UpperOnly)      │
//! │  delivered_at: Unbounded          ──► (nothing)                         │
//! │  owner: 7                         ──► Eq(client_id, 7)   ← always last  │
//! │                                                                         │
//! │  SQL:  WHERE guide_number = ? AND shipping_price BETWEEN ? AND ?        │
//! │          AND quantity >= ? AND julianday(joined_at) <= julianday(?)     │
//! │          AND client_id = ?                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Values are always bound as parameters. Timestamp columns compare through
//! `julianday()` so RFC 3339 text with and without fractional seconds orders
//! by instant, not by characters.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite};

use freight_core::{Range, SearchCriteria};

#[cfg(test)]
use freight_core::Product;

// =============================================================================
// Building blocks
// =============================================================================

/// Filterable product columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    GuideNumber,
    Type,
    VehiclePlate,
    Port,
    Vault,
    ShippingPrice,
    Quantity,
    JoinedAt,
    DeliveredAt,
    ClientId,
}

impl Column {
    pub fn name(&self) -> &'static str {
        match self {
            Column::GuideNumber => "guide_number",
            Column::Type => "type",
            Column::VehiclePlate => "vehicle_plate",
            Column::Port => "port",
            Column::Vault => "vault",
            Column::ShippingPrice => "shipping_price",
            Column::Quantity => "quantity",
            Column::JoinedAt => "joined_at",
            Column::DeliveredAt => "delivered_at",
            Column::ClientId => "client_id",
        }
    }

    fn is_timestamp(&self) -> bool {
        matches!(self, Column::JoinedAt | Column::DeliveredAt)
    }

    /// The product's value for this column, `None` when the column is NULL.
    #[cfg(test)]
    fn read(&self, product: &Product) -> Option<Value> {
        match self {
            Column::GuideNumber => product.guide_number.clone().map(Value::Text),
            Column::Type => product.kind.clone().map(Value::Text),
            Column::VehiclePlate => product.vehicle_plate.clone().map(Value::Text),
            Column::Port => product.port.map(Value::Int),
            Column::Vault => product.vault.map(Value::Int),
            Column::ShippingPrice => product.shipping_price.map(Value::Real),
            Column::Quantity => product.quantity.map(Value::Int),
            Column::JoinedAt => product.joined_at.map(Value::Timestamp),
            Column::DeliveredAt => product.delivered_at.map(Value::Timestamp),
            Column::ClientId => Some(Value::Int(product.client_id.0)),
        }
    }
}

/// A bound parameter.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub enum Value {
    Text(String),
    Int(i64),
    Real(f64),
    Timestamp(DateTime<Utc>),
}

/// One conjunct of the WHERE clause. Range bounds are inclusive.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(Column, Value),
    Within(Column, Range<Value>),
}

impl Condition {
    pub fn column(&self) -> Column {
        match self {
            Condition::Eq(c, _) | Condition::Within(c, _) => *c,
        }
    }

    /// SQL NULL never satisfies a comparison; neither does `None` here.
    #[cfg(test)]
    fn matches(&self, product: &Product) -> bool {
        let Some(actual) = self.column().read(product) else {
            return false;
        };
        match self {
            Condition::Eq(_, v) => actual == *v,
            Condition::Within(_, range) => range.contains(&actual),
        }
    }

    fn push_to(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        let column = self.column();
        push_column(qb, column);
        match self {
            Condition::Eq(_, v) => {
                qb.push(" = ");
                push_value(qb, column, v);
            }
            Condition::Within(_, Range::Unbounded) => {
                qb.push(" IS NOT NULL");
            }
            Condition::Within(_, Range::LowerOnly(lo)) => {
                qb.push(" >= ");
                push_value(qb, column, lo);
            }
            Condition::Within(_, Range::UpperOnly(hi)) => {
                qb.push(" <= ");
                push_value(qb, column, hi);
            }
            Condition::Within(_, Range::Both(lo, hi)) => {
                qb.push(" BETWEEN ");
                push_value(qb, column, lo);
                qb.push(" AND ");
                push_value(qb, column, hi);
            }
        }
    }
}

fn push_column(qb: &mut QueryBuilder<'_, Sqlite>, column: Column) {
    if column.is_timestamp() {
        qb.push("julianday(").push(column.name()).push(")");
    } else {
        qb.push(column.name());
    }
}

fn push_value(qb: &mut QueryBuilder<'_, Sqlite>, column: Column, value: &Value) {
    if column.is_timestamp() {
        qb.push("julianday(");
    }
    match value {
        Value::Text(s) => qb.push_bind(s.clone()),
        Value::Int(i) => qb.push_bind(*i),
        Value::Real(f) => qb.push_bind(*f),
        Value::Timestamp(t) => qb.push_bind(*t),
    };
    if column.is_timestamp() {
        qb.push(")");
    }
}

/// Lowers a range onto `column`; unbounded ranges add nothing.
fn range_condition<T: PartialOrd + Copy>(
    column: Column,
    range: &Range<T>,
    value: fn(T) -> Value,
) -> Option<Condition> {
    let lowered = match *range {
        Range::Unbounded => return None,
        Range::LowerOnly(lo) => Range::LowerOnly(value(lo)),
        Range::UpperOnly(hi) => Range::UpperOnly(value(hi)),
        Range::Both(lo, hi) => Range::Both(value(lo), value(hi)),
    };
    Some(Condition::Within(column, lowered))
}

// =============================================================================
// Predicate
// =============================================================================

/// Conjunction of conditions for one product search.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPredicate {
    conditions: Vec<Condition>,
}

impl ProductPredicate {
    pub fn from_criteria(criteria: &SearchCriteria) -> Self {
        let mut conditions = Vec::new();

        let exact = [
            (Column::GuideNumber, criteria.guide_number.clone().map(Value::Text)),
            (Column::Type, criteria.kind.clone().map(Value::Text)),
            (Column::VehiclePlate, criteria.vehicle_plate.clone().map(Value::Text)),
            (Column::Port, criteria.port.map(Value::Int)),
            (Column::Vault, criteria.vault.map(Value::Int)),
        ];
        for (column, value) in exact {
            if let Some(value) = value {
                conditions.push(Condition::Eq(column, value));
            }
        }

        conditions.extend(
            [
                range_condition(Column::ShippingPrice, &criteria.price, Value::Real),
                range_condition(Column::Quantity, &criteria.quantity, Value::Int),
                range_condition(Column::JoinedAt, &criteria.joined_at, Value::Timestamp),
                range_condition(Column::DeliveredAt, &criteria.delivered_at, Value::Timestamp),
            ]
            .into_iter()
            .flatten(),
        );

        // owner scope is mandatory and always the last conjunct
        conditions.push(Condition::Eq(Column::ClientId, Value::Int(criteria.owner.0)));

        ProductPredicate { conditions }
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Appends ` WHERE c1 AND c2 ...` to `qb`.
    pub fn push_to(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        for (i, condition) in self.conditions.iter().enumerate() {
            qb.push(if i == 0 { " WHERE " } else { " AND " });
            condition.push_to(qb);
        }
    }

    /// Rendered WHERE clause with `?` placeholders.
    pub fn to_sql(&self) -> String {
        let mut qb = QueryBuilder::<Sqlite>::new("");
        self.push_to(&mut qb);
        qb.sql().trim_start().to_string()
    }

    /// Evaluates the predicate against an in-memory product.
    #[cfg(test)]
    pub(crate) fn matches(&self, product: &Product) -> bool {
        self.conditions.iter().all(|c| c.matches(product))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use freight_core::ClientId;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, 8, 0, 0).unwrap()
    }

    fn owner_only() -> SearchCriteria {
        SearchCriteria::for_owner(ClientId(7))
    }

    #[test]
    fn test_owner_scope_alone() {
        let predicate = ProductPredicate::from_criteria(&owner_only());
        assert_eq!(predicate.to_sql(), "WHERE client_id = ?");
        assert_eq!(predicate.conditions().len(), 1);
    }

    #[test]
    fn test_exact_filters_then_owner_last() {
        let criteria = SearchCriteria {
            guide_number: Some("AB12CD34EF".to_string()),
            kind: Some("box".to_string()),
            vehicle_plate: Some("ABC-123".to_string()),
            port: Some(2),
            vault: Some(1),
            ..owner_only()
        };
        let predicate = ProductPredicate::from_criteria(&criteria);

        assert_eq!(
            predicate.to_sql(),
            "WHERE guide_number = ? AND type = ? AND vehicle_plate = ? AND port = ? \
             AND vault = ? AND client_id = ?"
        );
        assert_eq!(
            predicate.conditions().last(),
            Some(&Condition::Eq(Column::ClientId, Value::Int(7)))
        );
    }

    /// Expected SQL for the four bound-presence combinations on one column.
    fn rendered(column: &str, timestamp: bool) -> [String; 4] {
        let (col, param) = if timestamp {
            (format!("julianday({column})"), "julianday(?)".to_string())
        } else {
            (column.to_string(), "?".to_string())
        };
        [
            "WHERE client_id = ?".to_string(),
            format!("WHERE {col} >= {param} AND client_id = ?"),
            format!("WHERE {col} <= {param} AND client_id = ?"),
            format!("WHERE {col} BETWEEN {param} AND {param} AND client_id = ?"),
        ]
    }

    #[test]
    fn test_price_bound_combinations() {
        let expected = rendered("shipping_price", false);
        let ranges = [
            Range::from_bounds(None, None),
            Range::from_bounds(Some(10.0), None),
            Range::from_bounds(None, Some(50.0)),
            Range::from_bounds(Some(10.0), Some(50.0)),
        ];
        for (range, sql) in ranges.into_iter().zip(expected) {
            let criteria = SearchCriteria { price: range, ..owner_only() };
            assert_eq!(ProductPredicate::from_criteria(&criteria).to_sql(), sql);
        }
    }

    #[test]
    fn test_quantity_bound_combinations() {
        let expected = rendered("quantity", false);
        let ranges = [
            Range::from_bounds(None, None),
            Range::from_bounds(Some(10), None),
            Range::from_bounds(None, Some(10)),
            Range::from_bounds(Some(5), Some(10)),
        ];
        for (range, sql) in ranges.into_iter().zip(expected) {
            let criteria = SearchCriteria { quantity: range, ..owner_only() };
            assert_eq!(ProductPredicate::from_criteria(&criteria).to_sql(), sql);
        }
    }

    #[test]
    fn test_joined_at_bound_combinations() {
        let expected = rendered("joined_at", true);
        let ranges = [
            Range::from_bounds(None, None),
            Range::from_bounds(Some(at(1)), None),
            Range::from_bounds(None, Some(at(9))),
            Range::from_bounds(Some(at(1)), Some(at(9))),
        ];
        for (range, sql) in ranges.into_iter().zip(expected) {
            let criteria = SearchCriteria { joined_at: range, ..owner_only() };
            assert_eq!(ProductPredicate::from_criteria(&criteria).to_sql(), sql);
        }
    }

    #[test]
    fn test_delivered_at_bound_combinations() {
        let expected = rendered("delivered_at", true);
        let ranges = [
            Range::from_bounds(None, None),
            Range::from_bounds(Some(at(1)), None),
            Range::from_bounds(None, Some(at(9))),
            Range::from_bounds(Some(at(1)), Some(at(9))),
        ];
        for (range, sql) in ranges.into_iter().zip(expected) {
            let criteria = SearchCriteria { delivered_at: range, ..owner_only() };
            assert_eq!(ProductPredicate::from_criteria(&criteria).to_sql(), sql);
        }
    }

    #[test]
    fn test_matches_one_sided_quantity() {
        let low = Product { client_id: ClientId(7), quantity: Some(5), ..Default::default() };
        let high = Product { client_id: ClientId(7), quantity: Some(15), ..Default::default() };

        let at_least = ProductPredicate::from_criteria(&SearchCriteria {
            quantity: Range::from_bounds(Some(10), None),
            ..owner_only()
        });
        assert!(at_least.matches(&high));
        assert!(!at_least.matches(&low));

        let at_most = ProductPredicate::from_criteria(&SearchCriteria {
            quantity: Range::from_bounds(None, Some(10)),
            ..owner_only()
        });
        assert!(at_most.matches(&low));
        assert!(!at_most.matches(&high));
    }

    #[test]
    fn test_matches_bounds_are_inclusive() {
        let predicate = ProductPredicate::from_criteria(&SearchCriteria {
            quantity: Range::from_bounds(Some(5), Some(10)),
            ..owner_only()
        });
        let with_quantity = |quantity| Product {
            client_id: ClientId(7),
            quantity: Some(quantity),
            ..Default::default()
        };

        assert!(predicate.matches(&with_quantity(5)));
        assert!(predicate.matches(&with_quantity(10)));
        assert!(!predicate.matches(&with_quantity(4)));
        assert!(!predicate.matches(&with_quantity(11)));
    }

    #[test]
    fn test_matches_requires_owner_and_non_null() {
        let predicate = ProductPredicate::from_criteria(&SearchCriteria {
            price: Range::from_bounds(Some(1.0), None),
            ..owner_only()
        });

        let priced = Product { client_id: ClientId(7), shipping_price: Some(3.0), ..Default::default() };
        let unpriced = Product { client_id: ClientId(7), ..Default::default() };
        let foreign = Product { client_id: ClientId(8), shipping_price: Some(3.0), ..Default::default() };

        assert!(predicate.matches(&priced));
        assert!(!predicate.matches(&unpriced));
        assert!(!predicate.matches(&foreign));
    }
}
