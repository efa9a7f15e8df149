//! # Application Context
//!
//! Everything a command needs, built once at startup and shared read-only.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AppContext (Clone = Arc bumps)                                         │
//! │                                                                         │
//! │  repositories: Arc<RepositoryRegistry>   AUTH / CLIENT / PRODUCT        │
//! │  passwords:    Arc<dyn PasswordService>  Argon2id                       │
//! │  tokens:       Arc<dyn TokenService>     HS256 JWT                      │
//! │  config:       Arc<ApiConfig>                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::auth::{Argon2PasswordService, JwtTokenService, PasswordService, TokenService};
use crate::config::ApiConfig;
use freight_core::CoreError;
use freight_db::{Database, DbError, RepositoryRegistry};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to open database")]
    Database(#[source] DbError),

    #[error("failed to build repository registry")]
    Registry(#[source] CoreError),
}

#[derive(Clone)]
pub struct AppContext {
    pub repositories: Arc<RepositoryRegistry>,
    pub passwords: Arc<dyn PasswordService>,
    pub tokens: Arc<dyn TokenService>,
    pub config: Arc<ApiConfig>,
}

impl AppContext {
    pub fn new(
        repositories: RepositoryRegistry,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
        config: ApiConfig,
    ) -> Self {
        Self {
            repositories: Arc::new(repositories),
            passwords,
            tokens,
            config: Arc::new(config),
        }
    }

    /// Opens the database described by `config` and wires the default services.
    ///
    /// The returned [`Database`] owns the pool; close it on shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error when the database cannot be opened or migrated.
    pub async fn bootstrap(config: ApiConfig) -> Result<(Self, Database), AppInitError> {
        let db = Database::new(config.db_config())
            .await
            .map_err(AppInitError::Database)?;

        let repositories = db.repositories().map_err(AppInitError::Registry)?;
        let tokens = JwtTokenService::new(&config.jwt_secret, config.jwt_lifespan_hours);

        info!(
            database = %config.database_path.display(),
            repositories = repositories.len(),
            "Application context ready"
        );

        let context = Self::new(
            repositories,
            Arc::new(Argon2PasswordService::new()),
            Arc::new(tokens),
            config,
        );
        Ok((context, db))
    }
}
