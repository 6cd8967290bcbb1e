//! User CRUD handlers plus the admin disable/approve actions.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::auth::CredentialService;
use crate::db::{user_create, user_delete, user_find_by_username, user_get_by_id, user_update};
use crate::error::AppError;
use crate::handlers::http::AppState;
use crate::models::{User, STATUS_ACTIVE};
use crate::services;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    pub role: String,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 64))]
    pub username: Option<String>,
    #[validate(length(min = 8, max = 128))]
    pub password: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
}

/// GET /api/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    let user = user_get_by_id(state.db(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(user.into()))
}

/// POST /api/users — direct creation with an explicit role; defaults to
/// Active status, unlike self-registration.
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    CredentialService::validate_username(&body.username)?;

    if user_find_by_username(state.db(), &body.username)
        .await?
        .is_some()
    {
        return Err(AppError::Validation("Username already taken".to_string()));
    }

    let password_hash = CredentialService::hash_password(&body.password)?;
    let status = body.status.as_deref().unwrap_or(STATUS_ACTIVE);
    let user = user_create(state.db(), &body.username, &password_hash, status, &body.role).await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// PUT /api/users/:id
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<User>, AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    if let Some(username) = &body.username {
        CredentialService::validate_username(username)?;
    }

    let password_hash = match &body.password {
        Some(p) => Some(CredentialService::hash_password(p)?),
        None => None,
    };

    let user = user_update(
        state.db(),
        id,
        body.username.as_deref(),
        password_hash.as_deref(),
        body.status.as_deref(),
        body.role.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}

/// DELETE /api/users/:id — 204 whether or not the user existed.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    user_delete(state.db(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/users/:id/disable
pub async fn disable_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    let user = services::users::disable(state.db(), id).await?;
    Ok(Json(user.into()))
}

/// POST /api/users/:id/approve
pub async fn approve_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    let user = services::users::approve(state.db(), id).await?;
    Ok(Json(user.into()))
}
