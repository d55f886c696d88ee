use axum::http::StatusCode;
use serde_json::json;

use sp_api::router;

use crate::common::{TestClient, TestStateBuilder, spawn_chat_stub};

// The test state points the model client at an unroutable address, so every
// proxy call fails upstream. That exercises the error envelope without a
// provider.

#[tokio::test]
async fn test_ask_upstream_failure_returns_error_envelope() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");
    let client = TestClient::new(router::router().with_state(state));

    let body = json!({ "question": "How do I learn lifetimes?" });
    let response = client.post_json("/ai/ask", &body).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("model provider request failed")
    );
}

#[tokio::test]
async fn test_ask_rejects_empty_question() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");
    let client = TestClient::new(router::router().with_state(state));

    let body = json!({ "question": "   " });
    let response = client.post_json("/ai/ask", &body).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("question"));
}

#[tokio::test]
async fn test_ask_missing_question_is_unprocessable() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");
    let client = TestClient::new(router::router().with_state(state));

    let body = json!({ "context": "no question here" });
    let response = client.post_json("/ai/ask", &body).await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_goal_suggestions_upstream_failure_is_error() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");
    let client = TestClient::new(router::router().with_state(state));

    let body = json!({ "context": "Learning Rust", "count": 3 });
    let response = client.post_json("/ai/goal-suggestions", &body).await;

    // No fallback for suggestions: upstream failure is the caller's problem.
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_study_plan_rejects_empty_subject() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");
    let client = TestClient::new(router::router().with_state(state));

    let body = json!({ "subject": "" });
    let response = client.post_json("/ai/study-plan", &body).await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_study_plan_unparseable_output_serves_fallback() {
    // The model answers with prose instead of plan JSON; the endpoint still
    // answers 200 with the static template and flags it.
    let base_url = spawn_chat_stub("Sure! Here is a great study plan for you:").await;
    let state = TestStateBuilder::new()
        .llm_base_url(&base_url)
        .build()
        .expect("Failed to create test state");
    let client = TestClient::new(router::router().with_state(state));

    let body = json!({ "subject": "Linear algebra", "duration_weeks": 2 });
    let response = client.post_json("/ai/study-plan", &body).await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["fallback"], json!(true));
    assert_eq!(body["plan"]["subject"], json!("Linear algebra"));

    let weeks = body["plan"]["weeks"].as_array().expect("weeks missing");
    assert_eq!(weeks.len(), 2);
    assert!(
        weeks
            .iter()
            .all(|w| !w["days"].as_array().unwrap().is_empty())
    );
}

#[tokio::test]
async fn test_study_plan_parseable_output_is_not_fallback() {
    let base_url = spawn_chat_stub(
        r#"{"title":"Rust in 1 week","subject":"Rust","weeks":[{"week_number":1,"days":[{"day_number":1,"topic":"Ownership"}]}]}"#,
    )
    .await;
    let state = TestStateBuilder::new()
        .llm_base_url(&base_url)
        .build()
        .expect("Failed to create test state");
    let client = TestClient::new(router::router().with_state(state));

    let body = json!({ "subject": "Rust", "duration_weeks": 1 });
    let response = client.post_json("/ai/study-plan", &body).await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["fallback"], json!(false));
    assert_eq!(body["plan"]["weeks"][0]["days"][0]["topic"], json!("Ownership"));
}

#[tokio::test]
async fn test_study_plan_upstream_failure_is_error_not_fallback() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");
    let client = TestClient::new(router::router().with_state(state));

    // The fallback template only covers unparseable model output. When the
    // provider is unreachable there is nothing to fall back from.
    let body = json!({ "subject": "Linear algebra", "duration_weeks": 2 });
    let response = client.post_json("/ai/study-plan", &body).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}
