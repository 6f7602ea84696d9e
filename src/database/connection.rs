//! Conexión a PostgreSQL
//!
//! Construcción del pool y ejecución de migraciones embebidas.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::config::environment::EnvironmentConfig;

pub async fn create_pool(config: &EnvironmentConfig) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await?;

    info!(
        "✅ Pool de PostgreSQL listo ({} conexiones máx.)",
        config.database_max_connections
    );
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("✅ Migraciones aplicadas");
    Ok(())
}
