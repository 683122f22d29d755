//! Account bootstrap for the first administrator.

use anyhow::{Context, bail};
use sqlx::PgPool;

use control_escolar_core::hash_password;
use control_escolar_db::{add_user_to_role_group, ensure_role_group};

pub struct NewAdmin {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Creates an active account and its role-group membership in one
/// transaction. Fails when the email is already registered.
pub async fn create_admin(db: &PgPool, admin: &NewAdmin) -> anyhow::Result<i64> {
    let hashed_password = hash_password(&admin.password)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e.error))?;

    let mut tx = db.begin().await?;

    let user_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (username, email, first_name, last_name, password, is_active)
         VALUES ($1, $1, $2, $3, $4, TRUE)
         ON CONFLICT DO NOTHING
         RETURNING id",
    )
    .bind(&admin.email)
    .bind(&admin.first_name)
    .bind(&admin.last_name)
    .bind(&hashed_password)
    .fetch_optional(&mut *tx)
    .await
    .context("Failed to insert account")?;

    let Some(user_id) = user_id else {
        tx.rollback().await?;
        bail!("User with this email already exists");
    };

    let role_id = ensure_role_group(&mut *tx, &admin.role).await?;
    add_user_to_role_group(&mut *tx, user_id, role_id).await?;

    tx.commit().await?;

    Ok(user_id)
}
