//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use civic_core::contract::Endpoint;
use common::{body_json, empty_app, get, send};
use tower::ServiceExt;

#[tokio::test]
async fn health_check_returns_ok_with_json() {
    let (app, _store) = empty_app();
    let response = get(&app, "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["store_healthy"], true);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let (app, _store) = empty_app();
    let response = get(&app, "/this-route-does-not-exist", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let (app, _store) = empty_app();
    let response = get(&app, "/health", None).await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("response must include x-request-id");
    assert!(!request_id.is_empty());
}

/// CORS preflight from the configured origin is allowed with credentials.
#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let (app, _store) = empty_app();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/issues")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-credentials")
            .unwrap(),
        "true"
    );
}

/// Every endpoint in the contract table is routed with its declared method.
#[tokio::test]
async fn every_contract_endpoint_is_routed() {
    let (app, _store) = empty_app();

    for endpoint in Endpoint::ALL {
        let method: Method = endpoint.method().parse().unwrap();
        let response = send(&app, method, &endpoint.url(1), None, None).await;
        let status = response.status();
        assert_ne!(status, StatusCode::NOT_FOUND, "{endpoint:?} should be routed");
        assert_ne!(
            status,
            StatusCode::METHOD_NOT_ALLOWED,
            "{endpoint:?} should accept {}",
            endpoint.method()
        );
        if endpoint.requires_session() {
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{endpoint:?}");
        }
    }
}
