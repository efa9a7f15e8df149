//! # Auth Commands
//!
//! Registration, login and per-request token checks.
//!
//! ```text
//! register(NewClient) ──► hash password ──► Client::new ──► AUTH.create ──► token
//! login(Credentials)  ──► AUTH.lookup   ──► verify hash ─────────────────► token
//! authenticate(token) ──► TokenService::parse ──► Principal { client_id }
//! ```
//!
//! Unknown usernames and wrong passwords produce the same `UNAUTHORIZED`
//! answer.

use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::context::AppContext;
use crate::error::ApiError;
use freight_core::{Client, ClientId, CoreError, Credentials, NewClient, ValidationError};

/// Body returned by register and login.
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// The authenticated client behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub client_id: ClientId,
}

/// Creates a client account and signs it in.
pub async fn register(ctx: &AppContext, input: NewClient) -> Result<TokenResponse, ApiError> {
    let start = Instant::now();
    debug!(username = %input.username, "register command");

    if input.password.is_empty() {
        return Err(CoreError::from(ValidationError::Required {
            field: "password".to_string(),
        })
        .into());
    }

    // username is checked before the password is hashed
    Client::normalize_username(&input.username).map_err(CoreError::from)?;

    let password_hash = ctx.passwords.hash(&input.password)?;
    let client = Client::new(input, password_hash).map_err(CoreError::from)?;

    let id = ctx.repositories.auth()?.create(&client).await?;
    let token = ctx.tokens.issue(id)?;

    info!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        client_id = %id,
        "register complete"
    );

    Ok(TokenResponse { token })
}

/// Exchanges username and password for a token.
pub async fn login(ctx: &AppContext, credentials: Credentials) -> Result<TokenResponse, ApiError> {
    debug!(username = %credentials.username, "login command");

    let Ok(username) = Client::normalize_username(&credentials.username) else {
        warn!(username = %credentials.username, "Login with a malformed username");
        return Err(ApiError::unauthorized());
    };

    let (id, password_hash) = match ctx.repositories.auth()?.lookup(&username).await {
        Ok(found) => found,
        Err(CoreError::NotFound { .. }) => {
            warn!(username = %credentials.username, "Login for unknown username");
            return Err(ApiError::unauthorized());
        }
        Err(e) => return Err(e.into()),
    };

    if !ctx.passwords.verify(&password_hash, &credentials.password) {
        warn!(client_id = %id, "Login with wrong password");
        return Err(ApiError::unauthorized());
    }

    let token = ctx.tokens.issue(id)?;
    info!(client_id = %id, "login complete");

    Ok(TokenResponse { token })
}

/// Resolves the request's token (see [`crate::auth::read_token`]) to a
/// principal.
pub async fn authenticate(ctx: &AppContext, token: Option<&str>) -> Result<Principal, ApiError> {
    let token = token.ok_or_else(|| {
        warn!("Request without token");
        ApiError::unauthorized()
    })?;

    let client_id = ctx.tokens.parse(token)?;
    Ok(Principal { client_id })
}
