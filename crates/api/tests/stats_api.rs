//! HTTP-level integration tests for `/api/stats`.

mod common;

use axum::http::StatusCode;
use civic_core::contract::Endpoint;
use common::{body_json, create_issue, delete, get, login, put_json, register, seeded_app};
use serde_json::json;

#[tokio::test]
async fn admin_sees_seeded_counts() {
    let (app, _store) = seeded_app().await;
    let admin = login(&app, "admin", "admin123").await;

    let response = get(&app, "/api/stats", Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let stats = body_json(response).await;
    assert_eq!(stats, json!({ "total": 2, "pending": 1, "in_progress": 0, "resolved": 1 }));
}

/// Non-admins are turned away with 401, not 403.
#[tokio::test]
async fn citizens_get_401() {
    let (app, _store) = seeded_app().await;
    let john = login(&app, "user", "user123").await;

    let response = get(&app, "/api/stats", Some(&john)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Admin access required");

    assert_eq!(
        get(&app, "/api/stats", None).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

/// Counts track every create, update and delete and always add up.
#[tokio::test]
async fn counts_follow_mutations() {
    let (app, _store) = seeded_app().await;
    let admin = login(&app, "admin", "admin123").await;
    let (_alice, alice) = register(&app, "alice", "pw123", "Alice A").await;

    let a = create_issue(&app, &alice, "A").await;
    let b = create_issue(&app, &alice, "B").await;

    let url_a = Endpoint::UpdateIssue.url(a["id"].as_i64().unwrap());
    put_json(&app, &url_a, json!({ "status": "in_progress" }), Some(&admin)).await;
    delete(&app, &Endpoint::DeleteIssue.url(b["id"].as_i64().unwrap()), Some(&admin)).await;

    let stats = body_json(get(&app, "/api/stats", Some(&admin)).await).await;
    assert_eq!(stats["total"], 3);
    assert_eq!(stats["pending"], 1);
    assert_eq!(stats["in_progress"], 1);
    assert_eq!(stats["resolved"], 1);

    let sum = stats["pending"].as_i64().unwrap()
        + stats["in_progress"].as_i64().unwrap()
        + stats["resolved"].as_i64().unwrap();
    assert_eq!(sum, stats["total"].as_i64().unwrap());
}
