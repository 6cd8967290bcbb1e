//! Auth HTTP handlers: register, login.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::CredentialService;
use crate::db::{user_create, user_find_by_username};
use crate::error::AppError;
use crate::handlers::http::AppState;
use crate::models::{User, ROLE_MEMBER, STATUS_PENDING};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// POST /api/users/register — self-registration. New users start Pending
/// with role Member and must be approved before going Active.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    CredentialService::validate_username(&body.username)?;

    if user_find_by_username(state.db(), &body.username)
        .await?
        .is_some()
    {
        return Err(AppError::Validation(
            "Username already registered".to_string(),
        ));
    }

    let password_hash = CredentialService::hash_password(&body.password)?;
    let user = user_create(
        state.db(),
        &body.username,
        &password_hash,
        STATUS_PENDING,
        ROLE_MEMBER,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /api/users/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = user_find_by_username(state.db(), &body.username)
        .await?
        .ok_or_else(|| AppError::Auth("Invalid username or password".to_string()))?;

    if !CredentialService::verify_password(&body.password, &user.password_hash)? {
        return Err(AppError::Auth("Invalid username or password".to_string()));
    }

    let token = state.tokens().issue(&user.username)?;

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}
