//! # Control Escolar DB
//!
//! PostgreSQL connection pool initialization using SQLx.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
//!
//! Role-group helpers shared by the API and the admin CLI live here too:
//! [`ensure_role_group`] and [`add_user_to_role_group`].
//!
//! # Example
//!
//! ```ignore
//! use control_escolar_db::init_db_pool;
//!
//! let pool = init_db_pool().await?;
//! sqlx::migrate!("./migrations").run(&pool).await?;
//! ```

use std::env;

use sqlx::PgConnection;
use sqlx::postgres::PgPoolOptions;

pub use sqlx::PgPool;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Errors raised while building the pool.
#[derive(Debug, thiserror::Error)]
pub enum DbInitError {
    #[error("DATABASE_URL must be set")]
    MissingUrl,
    #[error("Failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),
}

/// Initializes a PostgreSQL connection pool from `DATABASE_URL`.
///
/// The returned pool is cheaply cloneable and is shared through the
/// application state.
pub async fn init_db_pool() -> Result<PgPool, DbInitError> {
    let database_url = env::var("DATABASE_URL").map_err(|_| DbInitError::MissingUrl)?;
    let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_MAX_CONNECTIONS);

    tracing::debug!(max_connections, "Connecting to database");

    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await
        .map_err(DbInitError::Connect)
}

/// Returns the id of the role-group `name`, creating it when absent.
///
/// Idempotent under concurrency: the unique constraint on `roles.name`
/// decides the winner and every caller gets the same id back.
pub async fn ensure_role_group(conn: &mut PgConnection, name: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"INSERT INTO roles (name)
           VALUES ($1)
           ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
           RETURNING id"#,
    )
    .bind(name)
    .fetch_one(conn)
    .await
}

/// Adds the account to the role-group. Existing memberships are left alone.
pub async fn add_user_to_role_group(
    conn: &mut PgConnection,
    user_id: i64,
    role_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"INSERT INTO user_roles (user_id, role_id)
           VALUES ($1, $2)
           ON CONFLICT (user_id, role_id) DO NOTHING"#,
    )
    .bind(user_id)
    .bind(role_id)
    .execute(conn)
    .await?;

    Ok(())
}
