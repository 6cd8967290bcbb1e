//! Access filter: bearer-token gate for the user-management API subtree.
//!
//! Per request: paths outside the protected prefix pass through untouched;
//! public paths (login, register) pass without token inspection; everything
//! else needs an `Authorization: Bearer <token>` the token service accepts,
//! or the request is answered 401 with an empty body and the handler never
//! runs.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::auth::TokenService;
use crate::middleware::PathPattern;

const BEARER_PREFIX: &str = "Bearer ";

const PROTECTED_SCOPE: &str = "/api/users/*";
const PUBLIC_PATHS: &[&str] = &["/api/users/login", "/api/users/register"];

#[derive(Clone)]
pub struct AccessFilter {
    tokens: TokenService,
    scope: Arc<PathPattern>,
    public: Arc<Vec<PathPattern>>,
}

impl AccessFilter {
    /// Filter scoped to the user-management subtree with the standard
    /// public allow-list.
    pub fn new(tokens: TokenService) -> Self {
        Self::with_paths(tokens, PROTECTED_SCOPE, PUBLIC_PATHS)
    }

    pub fn with_paths(tokens: TokenService, scope: &str, public: &[&str]) -> Self {
        Self {
            tokens,
            scope: Arc::new(PathPattern::new(scope)),
            public: Arc::new(public.iter().map(|p| PathPattern::new(p)).collect()),
        }
    }

    fn in_scope(&self, path: &str) -> bool {
        self.scope.matches(path)
    }

    fn is_public(&self, path: &str) -> bool {
        self.public.iter().any(|p| p.matches(path))
    }
}

/// Axum middleware wrapping the protected routes.
pub async fn require_bearer(
    State(filter): State<AccessFilter>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();

    if !filter.in_scope(&path) || filter.is_public(&path) {
        return next.run(request).await;
    }

    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX));

    match token {
        Some(token) if filter.tokens.validate(token) => next.run(request).await,
        _ => {
            debug!(%path, "rejected request: missing or invalid bearer token");
            StatusCode::UNAUTHORIZED.into_response()
        }
    }
}
