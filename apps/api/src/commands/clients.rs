//! Client listing and lookup.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info};

use super::parse_page;
use crate::context::AppContext;
use crate::error::ApiError;
use freight_core::{Client, ClientId};

/// Client as exposed over the API. The password hash never leaves storage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientDto {
    pub id: ClientId,
    pub username: String,
    pub name: String,
    pub surname: String,
    pub created_at: DateTime<Utc>,
}

impl From<Client> for ClientDto {
    fn from(c: Client) -> Self {
        ClientDto {
            id: c.id,
            username: c.username,
            name: c.name,
            surname: c.surname,
            created_at: c.created_at,
        }
    }
}

pub async fn list_clients(ctx: &AppContext, page: Option<&str>) -> Result<Vec<ClientDto>, ApiError> {
    let start = Instant::now();
    let page = parse_page(page)?;
    debug!(page, "list_clients command");

    let clients = ctx.repositories.clients()?.list(page).await?;
    let dtos: Vec<ClientDto> = clients.into_iter().map(ClientDto::from).collect();

    info!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        count = dtos.len(),
        page,
        "list_clients complete"
    );

    Ok(dtos)
}

pub async fn get_client(ctx: &AppContext, id: ClientId) -> Result<ClientDto, ApiError> {
    debug!(id = %id, "get_client command");
    let client = ctx.repositories.clients()?.get(id).await?;
    Ok(client.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{context, principal};
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_list_and_get() {
        let (ctx, _db) = context().await;
        let alice = principal(&ctx, "alice").await;
        principal(&ctx, "bob_1").await;

        let clients = list_clients(&ctx, None).await.unwrap();
        assert_eq!(clients.len(), 2);
        assert_eq!(clients[0].username, "alice");

        let json = serde_json::to_string(&clients[0]).unwrap();
        assert!(!json.contains("argon2"));

        let fetched = get_client(&ctx, alice.client_id).await.unwrap();
        assert_eq!(fetched.username, "alice");
    }

    #[tokio::test]
    async fn test_get_missing_and_bad_page() {
        let (ctx, _db) = context().await;

        let err = get_client(&ctx, ClientId(404)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = list_clients(&ctx, Some("x")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
