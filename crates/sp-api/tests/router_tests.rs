use axum::http::StatusCode;
use serde_json::json;

use sp_api::{middleware::cors::create_cors_layer, router};

use crate::common::{TestClient, TestStateBuilder, test_token};

#[tokio::test]
async fn test_health_check() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");
    let client = TestClient::new(router::router().with_state(state));

    let response = client.get("/health").await;
    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");
    let client = TestClient::new(router::router().with_state(state));

    let response = client.get("/nope").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert!(response.text().contains("not found"));
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");
    let client = TestClient::new(router::router().with_state(state));

    for uri in ["/plans", "/sessions", "/goals", "/materials", "/profile", "/streak"] {
        let response = client.get(uri).await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = response.json();
        assert!(body["error"].is_string(), "error envelope missing for {uri}");
    }
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");
    let client = TestClient::new(router::router().with_state(state));

    let response = client.get_with_token("/plans", "not-a-jwt").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_wrong_secret_is_unauthorized() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");
    let client = TestClient::new(router::router().with_state(state));

    let token = sp_api::auth::create_jwt_token(
        uuid::Uuid::new_v4(),
        "test@example.com",
        "some-other-secret-that-is-long-enough",
        24,
    )
    .expect("Failed to create token");

    let response = client.get_with_token("/plans", &token).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

// Request validation runs before any database work, so these pass without
// a live database behind the lazy pool.
#[tokio::test]
async fn test_create_plan_rejects_empty_title() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");
    let client = TestClient::new(router::router().with_state(state));
    let (_, token) = test_token();

    let body = json!({ "title": "", "subject": "Rust" });
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/plans")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .header("x-forwarded-for", "127.0.0.1")
        .body(axum::body::Body::from(body.to_string()))
        .expect("Failed to build request");

    let response = client.request(request).await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("title"));
}

#[tokio::test]
async fn test_malformed_body_is_unprocessable() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");
    let client = TestClient::new(router::router().with_state(state));
    let (_, token) = test_token();

    // Missing required fields entirely.
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/plans")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .header("x-forwarded-for", "127.0.0.1")
        .body(axum::body::Body::from("{}"))
        .expect("Failed to build request");

    let response = client.request(request).await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_request_id_is_generated_and_echoed() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");
    let app = router::router()
        .with_state(state)
        .layer(axum::middleware::from_fn(
            sp_api::middleware::request_id::request_id_middleware,
        ));
    let client = TestClient::new(app);

    let response = client.get("/health").await;
    let generated = response
        .headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .expect("x-request-id missing");
    assert!(uuid::Uuid::parse_str(generated).is_ok());
}

#[tokio::test]
async fn test_client_supplied_request_id_is_preserved() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");
    let app = router::router()
        .with_state(state)
        .layer(axum::middleware::from_fn(
            sp_api::middleware::request_id::request_id_middleware,
        ));
    let client = TestClient::new(app);

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/health")
        .header("x-request-id", "trace-abc-123")
        .header("x-forwarded-for", "127.0.0.1")
        .body(axum::body::Body::empty())
        .expect("Failed to build request");

    let response = client.request(request).await;
    assert_eq!(
        response
            .headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("trace-abc-123")
    );
}

#[tokio::test]
async fn test_cors_preflight_allows_configured_origin() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");
    let app = router::router()
        .with_state(state)
        .layer(create_cors_layer(vec!["http://localhost:8080".to_string()]));
    let client = TestClient::new(app);

    let response = client.preflight("/plans", "http://localhost:8080").await;
    response.assert_status(StatusCode::OK);
    assert_eq!(
        response
            .headers
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:8080")
    );
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn test_cors_preflight_rejects_unknown_origin() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");
    let app = router::router()
        .with_state(state)
        .layer(create_cors_layer(vec!["http://localhost:8080".to_string()]));
    let client = TestClient::new(app);

    let response = client.preflight("/plans", "https://evil.example.com").await;
    // The allow-origin header is simply absent for unlisted origins.
    assert!(response.headers.get("access-control-allow-origin").is_none());
}
