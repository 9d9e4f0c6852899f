//! Persistence gateway: connection pool, migrations, and repositories.
//!
//! Handlers never see a pool directly. They go through the [`Store`] trait,
//! which [`PgStore`] implements on PostgreSQL and [`MemoryStore`] implements
//! in memory for tests.

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

pub mod error;
pub mod memory;
pub mod models;
pub mod repositories;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use repositories::{CharacterRepo, PgStore, Store, UserRepo};

pub type DbPool = sqlx::PgPool;

/// How long a request waits for a free pooled connection before failing.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a lazily-connecting pool.
///
/// No connection is opened here, so the process can start while the database
/// is unreachable. Queries fail individually until it comes back.
pub fn create_pool(options: PgConnectOptions, max_connections: u32) -> DbPool {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_lazy_with(options)
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
