//! Data access layer.
//!
//! Plain async functions over a `PgPool`, one module per table. Every query on
//! categories and todos takes the caller's id and filters by it, so a row owned
//! by another user reads exactly like a missing one (`None`, `false`).

pub mod categories;
pub mod todos;
pub mod users;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::Config;

/// Opens the connection pool described by `config`.
pub async fn connect(config: &Config) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
}

/// Applies the migrations under `migrations/`.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
