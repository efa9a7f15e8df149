//! # Product Repository
//!
//! Owner-scoped product storage and search.
//!
//! ## Ownership-checked mutation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  update / delete (id, owner)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UPDATE|DELETE ... WHERE id = ? AND client_id = ?                      │
//! │       │                                                                 │
//! │       ├── rows_affected = 1 ──► Ok(())                                 │
//! │       │                                                                 │
//! │       └── rows_affected = 0 ──► SELECT client_id WHERE id = ?          │
//! │                                    ├── no row    ──► NotFound          │
//! │                                    └── other one ──► Ownership         │
//! │                                                                         │
//! │  One statement decides; the follow-up read only explains the miss.     │
//! │  Storage is never touched when the caller is not the owner.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info, warn};

use freight_core::{
    ClientId, CoreError, CoreResult, Pagination, Product, ProductId, ProductUpdate,
    SearchCriteria,
};

use super::predicate::ProductPredicate;
use super::{ProductRepository, PRODUCT_COLUMNS};
use crate::error::DbError;

/// SQLite-backed [`ProductRepository`].
#[derive(Debug, Clone)]
pub struct SqliteProductRepository {
    pool: SqlitePool,
}

impl SqliteProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteProductRepository { pool }
    }

    /// Explains why a conditional mutation touched no row.
    async fn classify_miss(&self, id: ProductId, owner: ClientId) -> CoreError {
        let stored: Result<Option<ClientId>, sqlx::Error> =
            sqlx::query_scalar("SELECT client_id FROM product WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await;

        match stored {
            Ok(None) => CoreError::not_found("product", id),
            Ok(Some(stored_owner)) => {
                warn!(
                    product_id = %id,
                    client_id = %owner,
                    owner_id = %stored_owner,
                    "Rejected mutation of a product owned by another client"
                );
                CoreError::Ownership {
                    product: id,
                    client: owner,
                }
            }
            Err(e) => DbError::from(e).into(),
        }
    }
}

#[async_trait]
impl ProductRepository for SqliteProductRepository {
    async fn list(&self, page: u32, owner: ClientId) -> CoreResult<Vec<Product>> {
        let window = Pagination::for_page(page);
        debug!(client_id = %owner, page, limit = window.limit, "Listing products");

        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE client_id = ? ORDER BY id LIMIT ? OFFSET ?"
        ))
        .bind(owner)
        .bind(window.limit)
        .bind(window.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(products)
    }

    async fn get(&self, id: ProductId, owner: ClientId) -> CoreResult<Product> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::from)?
        .ok_or_else(|| CoreError::not_found("product", id))?;

        if product.client_id != owner {
            warn!(product_id = %id, client_id = %owner, "Rejected read of a foreign product");
            return Err(CoreError::Ownership {
                product: id,
                client: owner,
            });
        }

        Ok(product)
    }

    async fn create(&self, product: &Product) -> CoreResult<ProductId> {
        let result = sqlx::query(
            r#"
            INSERT INTO product (
                client_id, guide_number, type, joined_at, delivered_at,
                shipping_price, vehicle_plate, port, vault, quantity
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(product.client_id)
        .bind(&product.guide_number)
        .bind(&product.kind)
        .bind(product.joined_at)
        .bind(product.delivered_at)
        .bind(product.shipping_price)
        .bind(&product.vehicle_plate)
        .bind(product.port)
        .bind(product.vault)
        .bind(product.quantity)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::ForeignKeyViolation { .. } => {
                CoreError::not_found("client", product.client_id)
            }
            other => other.into(),
        })?;

        let id = ProductId(result.last_insert_rowid());
        info!(product_id = %id, client_id = %product.client_id, "Product created");
        Ok(id)
    }

    async fn search(&self, criteria: &SearchCriteria) -> CoreResult<Vec<Product>> {
        let predicate = ProductPredicate::from_criteria(criteria);
        debug!(
            client_id = %criteria.owner,
            filter = %predicate.to_sql(),
            "Searching products"
        );

        let mut qb: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM product"));
        predicate.push_to(&mut qb);
        qb.push(" ORDER BY id");

        let products = qb
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::from)?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    async fn update(&self, update: &ProductUpdate) -> CoreResult<()> {
        let changes = &update.changes;
        let result = sqlx::query(
            r#"
            UPDATE product SET
                guide_number   = COALESCE(?, guide_number),
                type           = COALESCE(?, type),
                joined_at      = COALESCE(?, joined_at),
                delivered_at   = COALESCE(?, delivered_at),
                shipping_price = COALESCE(?, shipping_price),
                vehicle_plate  = COALESCE(?, vehicle_plate),
                port           = COALESCE(?, port),
                vault          = COALESCE(?, vault),
                quantity       = COALESCE(?, quantity)
            WHERE id = ? AND client_id = ?
            "#,
        )
        .bind(&changes.guide_number)
        .bind(&changes.kind)
        .bind(changes.joined_at)
        .bind(changes.delivered_at)
        .bind(changes.shipping_price)
        .bind(&changes.vehicle_plate)
        .bind(changes.port)
        .bind(changes.vault)
        .bind(changes.quantity)
        .bind(update.id)
        .bind(update.owner)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            return Err(self.classify_miss(update.id, update.owner).await);
        }

        info!(product_id = %update.id, client_id = %update.owner, "Product updated");
        Ok(())
    }

    async fn delete(&self, id: ProductId, owner: ClientId) -> CoreResult<()> {
        let result = sqlx::query("DELETE FROM product WHERE id = ? AND client_id = ?")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            return Err(self.classify_miss(id, owner).await);
        }

        info!(product_id = %id, client_id = %owner, "Product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{database, insert_client};
    use crate::Database;
    use chrono::{DateTime, TimeZone, Utc};
    use freight_core::{NewProduct, ProductPatch, Range};

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, 8, 0, 0).unwrap()
    }

    fn product(owner: ClientId, guide: &str, quantity: i64, price: f64, day: u32) -> Product {
        let mut product = Product::new(
            NewProduct {
                guide_number: Some(guide.to_string()),
                vehicle_plate: Some("ABC-123".to_string()),
                kind: Some("box".to_string()),
                port: Some(1),
                vault: Some(0),
                ..Default::default()
            },
            owner,
        )
        .unwrap();
        product.quantity = Some(quantity);
        product.shipping_price = Some(price);
        product.joined_at = Some(at(day));
        product.delivered_at = Some(at(day + 10));
        product
    }

    struct Fixture {
        db: Database,
        repo: SqliteProductRepository,
        ann: ClientId,
        bob: ClientId,
    }

    async fn fixture() -> Fixture {
        let db = database().await;
        let ann = insert_client(&db, "ann").await;
        let bob = insert_client(&db, "bob").await;
        let repo = SqliteProductRepository::new(db.pool().clone());
        Fixture { db, repo, ann, bob }
    }

    /// Three products for ann: quantities 5/10/15, prices 5/10/15, joined May 5/10/15.
    async fn seed_ann(f: &Fixture) -> Vec<ProductId> {
        let mut ids = Vec::new();
        for (i, n) in [5, 10, 15].into_iter().enumerate() {
            let guide = format!("GUIDE0000{i}");
            let p = product(f.ann, &guide, n, n as f64, n as u32);
            ids.push(f.repo.create(&p).await.unwrap());
        }
        // bob's product matches every range but must never show up for ann
        f.repo
            .create(&product(f.bob, "BOBGUIDE00", 10, 10.0, 10))
            .await
            .unwrap();
        ids
    }

    async fn stored_products(db: &Database) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM product")
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    async fn quantities(f: &Fixture, criteria: SearchCriteria) -> Vec<i64> {
        f.repo
            .search(&criteria)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.quantity.unwrap_or_default())
            .collect()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let f = fixture().await;
        let stored = product(f.ann, "AB12CD34EF", 12, 40.0, 3);
        let id = f.repo.create(&stored).await.unwrap();

        let fetched = f.repo.get(id, f.ann).await.unwrap();
        assert_eq!(fetched.id, id);
        assert_eq!(fetched.kind.as_deref(), Some("box"));
        assert_eq!(fetched.joined_at, Some(at(3)));
        assert_eq!(fetched.shipping_price, Some(40.0));
        assert_eq!(fetched.discount, 0.0);
    }

    #[tokio::test]
    async fn test_get_distinguishes_missing_from_foreign() {
        let f = fixture().await;
        let id = f
            .repo
            .create(&product(f.ann, "AB12CD34EF", 1, 1.0, 1))
            .await
            .unwrap();

        assert!(matches!(
            f.repo.get(ProductId(404), f.ann).await,
            Err(CoreError::NotFound { .. })
        ));
        assert!(matches!(
            f.repo.get(id, f.bob).await,
            Err(CoreError::Ownership { .. })
        ));
    }

    #[tokio::test]
    async fn test_create_for_unknown_client() {
        let f = fixture().await;
        let err = f
            .repo
            .create(&product(ClientId(999), "AB12CD34EF", 1, 1.0, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound { entity: "client", .. }));
    }

    #[tokio::test]
    async fn test_list_is_owner_scoped() {
        let f = fixture().await;
        let ids = seed_ann(&f).await;

        let listed = f.repo.list(0, f.ann).await.unwrap();
        assert_eq!(listed.iter().map(|p| p.id).collect::<Vec<_>>(), ids);

        assert_eq!(f.repo.list(0, f.bob).await.unwrap().len(), 1);
        assert!(f.repo.list(3, f.ann).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_merges_supplied_fields() {
        let f = fixture().await;
        let id = f
            .repo
            .create(&product(f.ann, "AB12CD34EF", 12, 40.0, 3))
            .await
            .unwrap();

        let patch = ProductPatch {
            vehicle_plate: Some("XYZ-999".to_string()),
            quantity: Some(20),
            ..Default::default()
        };
        f.repo
            .update(&ProductUpdate::new(id, f.ann, patch).unwrap())
            .await
            .unwrap();

        let updated = f.repo.get(id, f.ann).await.unwrap();
        assert_eq!(updated.vehicle_plate.as_deref(), Some("XYZ-999"));
        assert_eq!(updated.quantity, Some(20));
        assert_eq!(updated.guide_number.as_deref(), Some("AB12CD34EF"));
        assert_eq!(updated.shipping_price, Some(40.0));
    }

    #[tokio::test]
    async fn test_update_by_other_client_leaves_row_untouched() {
        let f = fixture().await;
        let original = product(f.ann, "AB12CD34EF", 12, 40.0, 3);
        let id = f.repo.create(&original).await.unwrap();

        let patch = ProductPatch {
            quantity: Some(1),
            ..Default::default()
        };
        let err = f
            .repo
            .update(&ProductUpdate::new(id, f.bob, patch).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Ownership { .. }));

        let stored = f.repo.get(id, f.ann).await.unwrap();
        assert_eq!(stored.quantity, Some(12));
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let f = fixture().await;
        let update = ProductUpdate::new(ProductId(5), f.ann, ProductPatch::default()).unwrap();
        assert!(matches!(
            f.repo.update(&update).await,
            Err(CoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_by_owner() {
        let f = fixture().await;
        let id = f
            .repo
            .create(&product(f.ann, "AB12CD34EF", 1, 1.0, 1))
            .await
            .unwrap();

        f.repo.delete(id, f.ann).await.unwrap();
        assert!(matches!(
            f.repo.get(id, f.ann).await,
            Err(CoreError::NotFound { .. })
        ));
        assert!(matches!(
            f.repo.delete(id, f.ann).await,
            Err(CoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_by_other_client_leaves_row_untouched() {
        let f = fixture().await;
        let id = f
            .repo
            .create(&product(f.ann, "AB12CD34EF", 1, 1.0, 1))
            .await
            .unwrap();

        assert!(matches!(
            f.repo.delete(id, f.bob).await,
            Err(CoreError::Ownership { .. })
        ));
        assert_eq!(stored_products(&f.db).await, 1);
        assert!(f.repo.get(id, f.ann).await.is_ok());
        drop(f.db);
    }

    #[tokio::test]
    async fn test_search_owner_scope_and_exact_filters() {
        let f = fixture().await;
        seed_ann(&f).await;

        assert_eq!(
            quantities(&f, SearchCriteria::for_owner(f.ann)).await,
            vec![5, 10, 15]
        );

        let by_guide = SearchCriteria {
            guide_number: Some("GUIDE00001".to_string()),
            ..SearchCriteria::for_owner(f.ann)
        };
        assert_eq!(quantities(&f, by_guide).await, vec![10]);

        let by_vault = SearchCriteria {
            vault: Some(3),
            ..SearchCriteria::for_owner(f.ann)
        };
        assert!(quantities(&f, by_vault).await.is_empty());
    }

    #[tokio::test]
    async fn test_search_quantity_bounds() {
        let f = fixture().await;
        seed_ann(&f).await;
        let base = SearchCriteria::for_owner(f.ann);

        let cases = [
            (Range::from_bounds(None, None), vec![5, 10, 15]),
            (Range::from_bounds(Some(10), None), vec![10, 15]),
            (Range::from_bounds(None, Some(10)), vec![5, 10]),
            (Range::from_bounds(Some(6), Some(14)), vec![10]),
        ];
        for (range, expected) in cases {
            let criteria = SearchCriteria { quantity: range, ..base.clone() };
            assert_eq!(quantities(&f, criteria).await, expected, "{range:?}");
        }
    }

    #[tokio::test]
    async fn test_search_price_bounds() {
        let f = fixture().await;
        seed_ann(&f).await;
        let base = SearchCriteria::for_owner(f.ann);

        let cases = [
            (Range::from_bounds(None, None), vec![5, 10, 15]),
            (Range::from_bounds(Some(10.0), None), vec![10, 15]),
            (Range::from_bounds(None, Some(10.0)), vec![5, 10]),
            (Range::from_bounds(Some(6.0), Some(14.0)), vec![10]),
        ];
        for (range, expected) in cases {
            let criteria = SearchCriteria { price: range, ..base.clone() };
            assert_eq!(quantities(&f, criteria).await, expected, "{range:?}");
        }
    }

    #[tokio::test]
    async fn test_search_joined_at_bounds() {
        let f = fixture().await;
        seed_ann(&f).await;
        let base = SearchCriteria::for_owner(f.ann);

        let cases = [
            (Range::from_bounds(None, None), vec![5, 10, 15]),
            (Range::from_bounds(Some(at(10)), None), vec![10, 15]),
            (Range::from_bounds(None, Some(at(10))), vec![5, 10]),
            (Range::from_bounds(Some(at(6)), Some(at(14))), vec![10]),
        ];
        for (range, expected) in cases {
            let criteria = SearchCriteria { joined_at: range, ..base.clone() };
            assert_eq!(quantities(&f, criteria).await, expected, "{range:?}");
        }
    }

    #[tokio::test]
    async fn test_search_delivered_at_bounds() {
        let f = fixture().await;
        seed_ann(&f).await;
        let base = SearchCriteria::for_owner(f.ann);

        // delivered_at is joined_at + 10 days: May 15/20/25
        let cases = [
            (Range::from_bounds(None, None), vec![5, 10, 15]),
            (Range::from_bounds(Some(at(20)), None), vec![10, 15]),
            (Range::from_bounds(None, Some(at(20))), vec![5, 10]),
            (Range::from_bounds(Some(at(16)), Some(at(24))), vec![10]),
        ];
        for (range, expected) in cases {
            let criteria = SearchCriteria { delivered_at: range, ..base.clone() };
            assert_eq!(quantities(&f, criteria).await, expected, "{range:?}");
        }
    }

    #[tokio::test]
    async fn test_search_agrees_with_in_memory_predicate() {
        let f = fixture().await;
        seed_ann(&f).await;

        let criteria = SearchCriteria {
            quantity: Range::from_bounds(Some(10), None),
            price: Range::from_bounds(None, Some(12.0)),
            ..SearchCriteria::for_owner(f.ann)
        };
        let predicate = ProductPredicate::from_criteria(&criteria);

        let found = f.repo.search(&criteria).await.unwrap();
        let everything = f.repo.list(0, f.ann).await.unwrap();
        let expected: Vec<_> = everything.into_iter().filter(|p| predicate.matches(p)).collect();

        assert_eq!(found, expected);
        assert_eq!(found.len(), 1);
    }
}
