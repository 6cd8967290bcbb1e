//! Admin state transitions: disable, approve.
//!
//! The guards are pure predicates over (status, role name) so the rules are
//! testable without storage. Writes are last-write-wins; concurrent
//! transitions on the same user race and the final write persists.

use uuid::Uuid;

use crate::db::{user_get_by_id, user_set_status, DbPool, UserRecord};
use crate::error::{AppError, AppResult};
use crate::models::{ROLE_MEMBER, ROLE_MODERATOR, STATUS_ACTIVE, STATUS_DISABLED, STATUS_PENDING};

/// Only Member and Moderator accounts can be disabled.
pub fn can_disable(role_name: &str) -> bool {
    role_name.eq_ignore_ascii_case(ROLE_MEMBER) || role_name.eq_ignore_ascii_case(ROLE_MODERATOR)
}

/// Only a Pending Member can be approved.
pub fn can_approve(status: &str, role_name: &str) -> bool {
    status.eq_ignore_ascii_case(STATUS_PENDING) && role_name.eq_ignore_ascii_case(ROLE_MEMBER)
}

pub async fn disable(pool: &DbPool, id: Uuid) -> AppResult<UserRecord> {
    let user = user_get_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if !can_disable(&user.role_name) {
        return Err(AppError::Forbidden(format!(
            "Cannot disable a {} account",
            user.role_name
        )));
    }

    user_set_status(pool, id, STATUS_DISABLED)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

pub async fn approve(pool: &DbPool, id: Uuid) -> AppResult<UserRecord> {
    let user = user_get_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if !can_approve(&user.status, &user.role_name) {
        return Err(AppError::Validation(format!(
            "Only a Pending Member can be approved (status: {}, role: {})",
            user.status, user.role_name
        )));
    }

    user_set_status(pool, id, STATUS_ACTIVE)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}
