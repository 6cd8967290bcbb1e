//! Repositories: users and their roles.
//!
//! Updates are last-write-wins per record; no cross-request ordering is
//! imposed beyond what Postgres gives per statement.

use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::DbPool;

/// User row joined with its role name.
#[derive(Debug, FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub status: String,
    pub role_name: String,
    pub created_at: DateTime<Utc>,
}

const USER_COLUMNS: &str = "u.id, u.username, u.password_hash, u.status, r.name AS role_name, u.created_at";

pub async fn user_create(
    pool: &DbPool,
    username: &str,
    password_hash: &str,
    status: &str,
    role_name: &str,
) -> AppResult<UserRecord> {
    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO users (username, password_hash, status, role_id)
        SELECT $1, $2, $3, r.id FROM roles r WHERE lower(r.name) = lower($4)
        RETURNING id
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .bind(status)
    .bind(role_name)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::Validation(format!("Unknown role: {}", role_name)))?;

    user_get_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("created user vanished")))
}

pub async fn user_get_by_id(pool: &DbPool, id: Uuid) -> AppResult<Option<UserRecord>> {
    let row = sqlx::query_as::<_, UserRecord>(&format!(
        "SELECT {USER_COLUMNS} FROM users u JOIN roles r ON r.id = u.role_id WHERE u.id = $1",
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn user_find_by_username(
    pool: &DbPool,
    username: &str,
) -> AppResult<Option<UserRecord>> {
    let row = sqlx::query_as::<_, UserRecord>(&format!(
        "SELECT {USER_COLUMNS} FROM users u JOIN roles r ON r.id = u.role_id WHERE u.username = $1",
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Partial update; `None` fields keep their current value. Returns `None`
/// when no row with this id exists.
pub async fn user_update(
    pool: &DbPool,
    id: Uuid,
    username: Option<&str>,
    password_hash: Option<&str>,
    status: Option<&str>,
    role_name: Option<&str>,
) -> AppResult<Option<UserRecord>> {
    let updated = sqlx::query_scalar::<_, Uuid>(
        r#"
        UPDATE users u SET
            username = COALESCE($2, u.username),
            password_hash = COALESCE($3, u.password_hash),
            status = COALESCE($4, u.status),
            role_id = COALESCE(
                (SELECT id FROM roles WHERE lower(name) = lower($5)), u.role_id)
        WHERE u.id = $1
        RETURNING u.id
        "#,
    )
    .bind(id)
    .bind(username)
    .bind(password_hash)
    .bind(status)
    .bind(role_name)
    .fetch_optional(pool)
    .await?;

    match updated {
        Some(id) => user_get_by_id(pool, id).await,
        None => Ok(None),
    }
}

/// Set only the status. Returns `None` when the user is absent.
pub async fn user_set_status(
    pool: &DbPool,
    id: Uuid,
    status: &str,
) -> AppResult<Option<UserRecord>> {
    let r = sqlx::query("UPDATE users SET status = $1 WHERE id = $2")
        .bind(status)
        .bind(id)
        .execute(pool)
        .await?;
    if r.rows_affected() == 0 {
        return Ok(None);
    }
    user_get_by_id(pool, id).await
}

/// Delete is idempotent; deleting an absent user is not an error.
pub async fn user_delete(pool: &DbPool, id: Uuid) -> AppResult<()> {
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
