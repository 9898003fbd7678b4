//! Error body shape and request-level failures.

mod common;

use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use common::{body_json, delete, empty_app, get, login, post_raw, put_json, seeded_app};
use serde_json::json;

/// Malformed JSON is a 400 with the standard error body.
#[tokio::test]
async fn malformed_json_is_400() {
    let (app, _store) = empty_app();

    let response = post_raw(&app, "/api/register", "{ not json", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].is_string());
}

/// Without a session the policy answers before the body is read.
#[tokio::test]
async fn unauthenticated_wins_over_malformed_body() {
    let (app, _store) = empty_app();

    let response = post_raw(&app, "/api/issues", "{ not json", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_json_with_session_is_400() {
    let (app, _store) = seeded_app().await;
    let john = login(&app, "user", "user123").await;

    let response = post_raw(&app, "/api/issues", "[1, 2", Some(&john)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Error bodies carry `error` and `code`, and only validation errors add `fields`.
#[tokio::test]
async fn error_body_shape() {
    let (app, _store) = seeded_app().await;

    let json = body_json(get(&app, "/api/user", None).await).await;
    let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["code", "error"]);
    assert_eq!(json["error"], "Authentication required");
}

/// A malformed id is a JSON 400 for a signed-in caller.
#[tokio::test]
async fn non_numeric_issue_id_is_400_with_error_body() {
    let (app, _store) = seeded_app().await;
    let john = login(&app, "user", "user123").await;

    let response = get(&app, "/api/issues/abc", Some(&john)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers().get(CONTENT_TYPE).unwrap(),
        "application/json"
    );

    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].is_string());

    let response = delete(&app, "/api/issues/abc", Some(&john)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Without a session a malformed id is still 401 on every single-issue route.
#[tokio::test]
async fn non_numeric_issue_id_without_session_is_401() {
    let (app, _store) = seeded_app().await;

    let response = get(&app, "/api/issues/abc", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");

    let response = put_json(&app, "/api/issues/abc", json!({ "status": "resolved" }), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = delete(&app, "/api/issues/abc", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
