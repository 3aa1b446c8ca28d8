pub mod models;
pub mod repository;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

const PRODUCTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id          BIGSERIAL PRIMARY KEY,
    name        TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    category    TEXT NOT NULL DEFAULT '',
    price       DOUBLE PRECISION NOT NULL DEFAULT 0,
    stock       INTEGER NOT NULL DEFAULT 0 CHECK (stock >= 0),
    image_url   TEXT NOT NULL DEFAULT '',
    created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
    deleted_at  TIMESTAMPTZ
)
"#;

// Authoritative uniqueness guard: the application-level pre-check in the
// create handler only exists for a friendlier 409 message, and admits a
// narrow race that this partial index closes.
const PRODUCTS_NAME_INDEX: &str = r#"
CREATE UNIQUE INDEX IF NOT EXISTS products_name_lower_idx
    ON products (LOWER(name))
    WHERE deleted_at IS NULL
"#;

/// Open the connection pool. A missing DATABASE_URL is fatal at startup.
pub async fn connect() -> anyhow::Result<PgPool> {
    let url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL environment variable is not set")?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&url)
        .await
        .context("failed to connect to PostgreSQL")?;

    Ok(pool)
}

// Advisory lock key serializing schema bootstrap across instances
const MIGRATION_LOCK_KEY: i64 = 0x70726f64;

/// Create the product schema if it does not exist yet. Concurrent callers
/// (multiple instances starting, parallel test binaries) are serialized via
/// a session advisory lock, since IF NOT EXISTS alone still races.
pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    let mut conn = pool.acquire().await.context("failed to acquire connection")?;

    sqlx::query("SELECT pg_advisory_lock($1)")
        .bind(MIGRATION_LOCK_KEY)
        .execute(&mut *conn)
        .await
        .context("failed to take migration lock")?;

    let result = async {
        sqlx::query(PRODUCTS_TABLE).execute(&mut *conn).await?;
        sqlx::query(PRODUCTS_NAME_INDEX).execute(&mut *conn).await?;
        Ok::<_, sqlx::Error>(())
    }
    .await;

    sqlx::query("SELECT pg_advisory_unlock($1)")
        .bind(MIGRATION_LOCK_KEY)
        .execute(&mut *conn)
        .await
        .context("failed to release migration lock")?;

    result.context("failed to create product schema")?;

    info!("product schema ready");
    Ok(())
}

/// Pings the pool to ensure connectivity
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
