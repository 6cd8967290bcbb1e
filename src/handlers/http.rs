//! Application state shared by handlers, plus the health probe.

use axum::{http::StatusCode, Json};
use serde_json::json;

use crate::auth::TokenService;
use crate::db::DbPool;

/// Shared application state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub tokens: TokenService,
}

impl AppState {
    pub fn db(&self) -> &DbPool {
        &self.db
    }
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }
}

/// GET /health — liveness probe.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "service": "userhub" })),
    )
}
