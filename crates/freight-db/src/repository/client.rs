//! Read access to client accounts.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use freight_core::{Client, ClientId, CoreError, CoreResult, Pagination};

use super::ClientRepository;
use crate::error::DbError;

/// SQLite-backed [`ClientRepository`].
#[derive(Debug, Clone)]
pub struct SqliteClientRepository {
    pool: SqlitePool,
}

impl SqliteClientRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteClientRepository { pool }
    }
}

#[async_trait]
impl ClientRepository for SqliteClientRepository {
    async fn list(&self, page: u32) -> CoreResult<Vec<Client>> {
        let window = Pagination::for_page(page);
        debug!(page, limit = window.limit, offset = window.offset, "Listing clients");

        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, username, password_hash, name, surname, created_at
            FROM client
            ORDER BY id
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(window.limit)
        .bind(window.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)?;

        debug!(count = clients.len(), "Listed clients");
        Ok(clients)
    }

    async fn get(&self, id: ClientId) -> CoreResult<Client> {
        sqlx::query_as::<_, Client>(
            r#"
            SELECT id, username, password_hash, name, surname, created_at
            FROM client
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::from)?
        .ok_or_else(|| CoreError::not_found("client", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{database, insert_client};

    #[tokio::test]
    async fn test_get_client() {
        let db = database().await;
        let id = insert_client(&db, "ann").await;
        let repo = SqliteClientRepository::new(db.pool().clone());

        let client = repo.get(id).await.unwrap();
        assert_eq!(client.id, id);
        assert_eq!(client.username, "ann");
        assert_eq!(client.surname, "Client");
    }

    #[tokio::test]
    async fn test_get_missing_client() {
        let db = database().await;
        let repo = SqliteClientRepository::new(db.pool().clone());

        assert!(matches!(
            repo.get(ClientId(99)).await,
            Err(CoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_is_ordered_and_windowed() {
        let db = database().await;
        for i in 0..25 {
            insert_client(&db, &format!("user{i:02}")).await;
        }
        let repo = SqliteClientRepository::new(db.pool().clone());

        let first = repo.list(0).await.unwrap();
        assert_eq!(first.len(), 20);
        assert!(first.windows(2).all(|w| w[0].id < w[1].id));

        // page 1 starts at offset 20 and may return up to 40 rows
        let second = repo.list(1).await.unwrap();
        assert_eq!(second.len(), 5);
        assert_eq!(second[0].username, "user20");
    }
}
