//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the product repository selected by config
//! - Create the schema when asked to
//!
//! # Design Decisions
//! - The database is not required at startup: the pool connects lazily and
//!   a failed schema check is logged, not fatal. Product routes answer 500
//!   until the database is reachable; `/ping` keeps working.

use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::storage::{InMemoryProductRepository, PgProductRepository, ProductRepository, RepositoryError};

/// Build the repository named by `config.url`.
pub async fn build_repository(
    config: &DatabaseConfig,
) -> Result<Arc<dyn ProductRepository>, RepositoryError> {
    if config.is_memory() {
        tracing::warn!("Using in-memory product store; data is lost on exit");
        return Ok(Arc::new(InMemoryProductRepository::new()));
    }

    let repo = PgProductRepository::connect_lazy(config)?;
    tracing::info!(
        max_connections = config.max_connections,
        "Postgres pool configured"
    );

    if config.create_schema {
        match repo.ensure_schema().await {
            Ok(()) => tracing::info!("Product table ready"),
            Err(e) => tracing::error!(error = %e, "Database initialization failed"),
        }
    }

    Ok(Arc::new(repo))
}
