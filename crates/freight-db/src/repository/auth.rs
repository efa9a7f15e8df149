//! Credential storage: username lookup and client registration.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{debug, info};

use freight_core::{Client, ClientId, CoreError, CoreResult};

use super::AuthRepository;
use crate::error::DbError;

/// SQLite-backed [`AuthRepository`].
#[derive(Debug, Clone)]
pub struct SqliteAuthRepository {
    pool: SqlitePool,
}

impl SqliteAuthRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteAuthRepository { pool }
    }
}

#[async_trait]
impl AuthRepository for SqliteAuthRepository {
    async fn lookup(&self, username: &str) -> CoreResult<(ClientId, String)> {
        debug!(username = %username, "Looking up credentials");

        let row: Option<(ClientId, String)> =
            sqlx::query_as("SELECT id, password_hash FROM client WHERE username = ?")
                .bind(username)
                .fetch_optional(&self.pool)
                .await
                .map_err(DbError::from)?;

        row.ok_or_else(|| CoreError::not_found("client", username))
    }

    async fn create(&self, client: &Client) -> CoreResult<ClientId> {
        let result = sqlx::query(
            r#"
            INSERT INTO client (name, surname, username, password_hash, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&client.name)
        .bind(&client.surname)
        .bind(&client.username)
        .bind(&client.password_hash)
        .bind(client.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => CoreError::AlreadyExists {
                entity: "client",
                detail: format!("username '{}'", client.username),
            },
            other => other.into(),
        })?;

        let id = ClientId(result.last_insert_rowid());
        info!(client_id = %id, username = %client.username, "Client registered");
        Ok(id)
    }
}
