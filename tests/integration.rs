//! Integration tests: health, auth (register/login), CRUD, admin actions.
//!
//! Run with `cargo test`. DB-backed tests need Postgres with the migrations
//! applied and `TEST_DATABASE_URL` set; they skip themselves otherwise.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;
use userhub::auth::TokenService;
use userhub::{create_app, db, AppState};

const TEST_JWT_SECRET: &str = "test-jwt-secret-min-32-chars!!!!";

async fn test_state(database_url: &str) -> Result<AppState, Box<dyn std::error::Error>> {
    let db_pool = db::create_pool(database_url).await?;
    let tokens = TokenService::new(TEST_JWT_SECRET.to_string(), 24);
    Ok(AppState {
        db: db_pool,
        tokens,
    })
}

async fn test_app() -> Option<axum::Router> {
    let database_url = match std::env::var("TEST_DATABASE_URL") {
        Ok(u) => u,
        Err(_) => {
            eprintln!("Skip integration test: set TEST_DATABASE_URL");
            return None;
        }
    };
    match test_state(&database_url).await {
        Ok(state) => Some(create_app(state)),
        Err(e) => {
            eprintln!("Skip integration test: {}", e);
            None
        }
    }
}

fn unique_username(prefix: &str) -> String {
    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis();
    format!("{prefix}-{millis}")
}

fn json_request(
    method: &str,
    uri: &str,
    bearer: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut b = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        b = b.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(v) => b
            .header("content-type", "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => b.body(Body::empty()).unwrap(),
    }
}

async fn body_json(res: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register and log in a fresh user, returning a bearer token.
async fn obtain_token(app: &axum::Router) -> String {
    let username = unique_username("login");
    let body = serde_json::json!({ "username": username, "password": "password123" });
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users/register",
            None,
            Some(body.clone()),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED, "register should succeed");

    let res = app
        .clone()
        .oneshot(json_request("POST", "/api/users/login", None, Some(body)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK, "login should succeed");
    let json = body_json(res).await;
    json.get("token").and_then(|v| v.as_str()).unwrap().to_string()
}

#[tokio::test]
async fn health_returns_ok() {
    let app = match test_app().await {
        Some(a) => a,
        None => return,
    };
    let res = app
        .oneshot(json_request("GET", "/health", None, None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert_eq!(json.get("status").and_then(|v| v.as_str()), Some("ok"));
}

#[tokio::test]
async fn register_then_login_returns_valid_token() {
    let app = match test_app().await {
        Some(a) => a,
        None => return,
    };

    let username = unique_username("alice");
    let creds = serde_json::json!({ "username": username, "password": "password123" });

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users/register",
            None,
            Some(creds.clone()),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let json = body_json(res).await;
    assert_eq!(json.get("status").and_then(|v| v.as_str()), Some("Pending"));
    assert_eq!(json.get("role").and_then(|v| v.as_str()), Some("Member"));
    assert!(json.get("password").is_none());
    assert!(json.get("password_hash").is_none());

    let res = app
        .clone()
        .oneshot(json_request("POST", "/api/users/login", None, Some(creds)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    let token = json.get("token").and_then(|v| v.as_str()).unwrap();
    let tokens = TokenService::new(TEST_JWT_SECRET.to_string(), 24);
    assert!(tokens.validate(token));
    assert_eq!(
        json.pointer("/user/username").and_then(|v| v.as_str()),
        Some(username.as_str())
    );

    // Wrong password is a 401.
    let bad = serde_json::json!({ "username": username, "password": "wrong-password" });
    let res = app
        .oneshot(json_request("POST", "/api/users/login", None, Some(bad)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_require_bearer() {
    let app = match test_app().await {
        Some(a) => a,
        None => return,
    };

    let id = uuid::Uuid::new_v4();
    let res = app
        .clone()
        .oneshot(json_request("GET", &format!("/api/users/{id}"), None, None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app
        .oneshot(json_request(
            "GET",
            &format!("/api/users/{id}"),
            Some("garbage"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn crud_flow() {
    let app = match test_app().await {
        Some(a) => a,
        None => return,
    };
    let token = obtain_token(&app).await;

    let username = unique_username("crud");
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users",
            Some(&token),
            Some(serde_json::json!({
                "username": username,
                "password": "password123",
                "role": "Member"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = body_json(res).await;
    assert_eq!(
        created.get("status").and_then(|v| v.as_str()),
        Some("Active")
    );
    let id = created.get("id").and_then(|v| v.as_str()).unwrap().to_string();

    let res = app
        .clone()
        .oneshot(json_request(
            "GET",
            &format!("/api/users/{id}"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let renamed = unique_username("renamed");
    let res = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/users/{id}"),
            Some(&token),
            Some(serde_json::json!({ "username": renamed })),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated = body_json(res).await;
    assert_eq!(
        updated.get("username").and_then(|v| v.as_str()),
        Some(renamed.as_str())
    );

    let res = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            &format!("/api/users/{id}"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = app
        .oneshot(json_request(
            "GET",
            &format!("/api/users/{id}"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn disable_and_approve_rules() {
    let app = match test_app().await {
        Some(a) => a,
        None => return,
    };
    let token = obtain_token(&app).await;

    let create = |username: String, role: &'static str| {
        let app = app.clone();
        let token = token.clone();
        async move {
            let res = app
                .oneshot(json_request(
                    "POST",
                    "/api/users",
                    Some(&token),
                    Some(serde_json::json!({
                        "username": username,
                        "password": "password123",
                        "role": role
                    })),
                ))
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::CREATED);
            let json = body_json(res).await;
            json.get("id").and_then(|v| v.as_str()).unwrap().to_string()
        }
    };

    // Disabling an Admin is forbidden and leaves status unchanged.
    let admin_id = create(unique_username("admin"), "Admin").await;
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/users/{admin_id}/disable"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let res = app
        .clone()
        .oneshot(json_request(
            "GET",
            &format!("/api/users/{admin_id}"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    let json = body_json(res).await;
    assert_eq!(json.get("status").and_then(|v| v.as_str()), Some("Active"));

    // Disabling an active Member works.
    let member_id = create(unique_username("member"), "Member").await;
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/users/{member_id}/disable"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert_eq!(
        json.get("status").and_then(|v| v.as_str()),
        Some("Disabled")
    );

    // Approving an Active user is a 400; a Pending Member approves to Active.
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/users/{admin_id}/approve"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let pending = unique_username("pending");
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users/register",
            None,
            Some(serde_json::json!({ "username": pending, "password": "password123" })),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let json = body_json(res).await;
    let pending_id = json.get("id").and_then(|v| v.as_str()).unwrap().to_string();

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/users/{pending_id}/approve"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert_eq!(json.get("status").and_then(|v| v.as_str()), Some("Active"));

    // A second approve is a 400: no longer Pending.
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/users/{pending_id}/approve"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Unknown id is a 404.
    let missing = uuid::Uuid::new_v4();
    let res = app
        .oneshot(json_request(
            "POST",
            &format!("/api/users/{missing}/disable"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
