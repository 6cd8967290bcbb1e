//! User management REST backend for a trading platform.
//!
//! JWT bearer authentication with a path-scoped access filter, user CRUD,
//! self-registration, and admin state transitions (disable, approve).

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod users;

pub use config::Config;
pub use error::AppError;
pub use handlers::http::AppState;

use axum::routing::{get, post};
use handlers::http;
use middleware::{require_bearer, AccessFilter};

/// Build the API router (user CRUD, login/register, admin actions, health).
/// Used by main and by integration tests.
pub fn create_app(state: AppState) -> axum::Router {
    let filter = AccessFilter::new(state.tokens().clone());

    let user_routes = axum::Router::new()
        .route("/api/users", post(users::create_user))
        .route("/api/users/login", post(auth::login))
        .route("/api/users/register", post(auth::register))
        .route(
            "/api/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/api/users/:id/disable", post(users::disable_user))
        .route("/api/users/:id/approve", post(users::approve_user))
        .layer(axum::middleware::from_fn_with_state(filter, require_bearer));

    axum::Router::new()
        .merge(user_routes)
        .route("/health", get(http::health))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::cors::CorsLayer::permissive())
        .with_state(state)
}
