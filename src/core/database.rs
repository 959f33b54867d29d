use crate::core::config::DatabaseConfig;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use std::time::Duration;

/// Connection options with the server-side statement timeout applied.
///
/// PostgreSQL aborts (and rolls back) any statement that outlives it, so a
/// write abandoned by an expired request deadline cannot commit afterwards.
pub fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, sqlx::Error> {
    let options = config.url.parse::<PgConnectOptions>()?;
    Ok(options.options([(
        "statement_timeout",
        config.statement_timeout.as_millis().to_string(),
    )]))
}

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect_with(connect_options(config)?)
        .await
}

/// Startup-only connect loop. Request handling never retries.
pub async fn connect_with_retry(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match create_pool(config).await {
            Ok(pool) => return Ok(pool),
            Err(e) if attempt <= config.connect_retries => {
                tracing::warn!(
                    "Database connection attempt {} failed: {}. Retrying in {:?}",
                    attempt,
                    e,
                    config.connect_retry_delay
                );
                tokio::time::sleep(config.connect_retry_delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
