//! Shared application state.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::CarstockConfig;
use crate::db::{CarStore, DealerStore, SqliteCarStore, SqliteDealerStore};
use crate::services::{AuthService, InventoryService};
use crate::token::JwtIssuer;

/// Shared application state, cheap to clone.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CarstockConfig,
    pool: SqlitePool,
    auth: AuthService,
    inventory: InventoryService,
    tokens: JwtIssuer,
}

impl AppState {
    /// Build application state from config and a connected pool, wiring the
    /// services to the `SQLite` stores.
    #[must_use]
    pub fn new(config: CarstockConfig, pool: SqlitePool) -> Self {
        let dealers: Arc<dyn DealerStore> = Arc::new(SqliteDealerStore::new(pool.clone()));
        let cars: Arc<dyn CarStore> = Arc::new(SqliteCarStore::new(pool.clone()));
        let tokens = JwtIssuer::new(&config.jwt_secret);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                auth: AuthService::new(dealers, tokens.clone()),
                inventory: InventoryService::new(cars),
                tokens,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &CarstockConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    #[must_use]
    pub fn inventory(&self) -> &InventoryService {
        &self.inner.inventory
    }

    #[must_use]
    pub fn tokens(&self) -> &JwtIssuer {
        &self.inner.tokens
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
