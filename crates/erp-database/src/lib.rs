//! # erp-database
//!
//! Connections to the hosted backend and the three [`QueryBackend`]
//! implementations: the hosted REST data API, a direct PostgreSQL pool,
//! and an in-process store. On top of them sits the generic
//! [`TableRepository`], the single repository implementation every
//! entity screen uses.
//!
//! [`QueryBackend`]: erp_core::traits::QueryBackend

pub mod connection;
pub mod memory;
pub mod postgres;
pub mod repositories;
pub mod rest;

use std::sync::Arc;

use erp_core::config::{BackendConfig, BackendMode};
use erp_core::result::AppResult;
use erp_core::traits::{AccessTokenSource, QueryBackend};

pub use connection::{DatabasePool, HostedClient};
pub use memory::MemoryBackend;
pub use postgres::PgBackend;
pub use repositories::TableRepository;
pub use rest::RestBackend;

/// Build the query backend selected by `config.mode`.
///
/// `tokens` supplies the signed-in user's bearer token to the REST
/// backend; the other backends ignore it.
pub async fn connect_backend(
    config: &BackendConfig,
    tokens: Option<Arc<dyn AccessTokenSource>>,
) -> AppResult<Arc<dyn QueryBackend>> {
    let backend: Arc<dyn QueryBackend> = match config.mode {
        BackendMode::Rest => {
            let client = HostedClient::new(config, tokens)?;
            Arc::new(RestBackend::new(client, &config.schema))
        }
        BackendMode::Postgres => {
            let pool = DatabasePool::connect(config).await?;
            Arc::new(PgBackend::new(pool.into_pool()))
        }
        BackendMode::Memory => Arc::new(MemoryBackend::new()),
    };
    tracing::info!(backend = backend.backend_type(), "Query backend ready");
    Ok(backend)
}
