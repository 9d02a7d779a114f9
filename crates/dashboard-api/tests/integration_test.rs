//! Integration tests for the dashboard API

use std::path::PathBuf;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use dashboard_api::{create_router, AppState, FixtureStore};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures")
        .join(name)
}

/// Helper to create a test app over the bundled fixtures
fn create_test_app() -> Router {
    let fixtures = FixtureStore::load(
        &fixture("mock_dashboard.json"),
        &fixture("dummy_threat_model.json"),
    )
    .unwrap();

    create_router(AppState::new(fixtures, Duration::ZERO))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn with_body(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn login(app: &Router) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/api/session")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"email": "alex.chen@virantis.io", "password": "demo"}).to_string(),
        ))
        .unwrap();

    let (status, json) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    json["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();

    let (status, json) = send(
        &app,
        Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "dashboard-api");
}

#[tokio::test]
async fn test_requires_session() {
    let app = create_test_app();

    let (status, json) = send(
        &app,
        Request::builder()
            .uri("/api/portfolio")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(json["error"].is_string());

    let (status, _) = send(&app, get("/api/portfolio", "not-a-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_rejects_empty_credentials() {
    let app = create_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/session")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"email": "", "password": ""}).to_string()))
        .unwrap();

    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_logout_invalidates_token() {
    let app = create_test_app();
    let token = login(&app).await;

    let request = Request::builder()
        .method("DELETE")
        .uri("/api/session")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, get("/api/portfolio", &token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_portfolio() {
    let app = create_test_app();
    let token = login(&app).await;

    let (status, json) = send(&app, get("/api/portfolio", &token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user"]["name"], "Alex Chen");
    assert_eq!(json["stats"]["totalApps"], 3);
    assert_eq!(json["stats"]["totalThreats"], 23);
    assert_eq!(json["stats"]["criticalIssues"], 3);
    assert_eq!(json["posture"], "critical");
    assert_eq!(json["unreadNotifications"], 2);
    assert_eq!(json["pendingReviews"], 2);
}

#[tokio::test]
async fn test_applications() {
    let app = create_test_app();
    let token = login(&app).await;

    let (status, json) = send(&app, get("/api/applications", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 3);

    let (status, json) = send(&app, get("/api/applications/fintravel-ai", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["summary"]["trend"], "up");
    assert_eq!(json["summary"]["totalThreats"], 12);

    let (status, json) = send(&app, get("/api/applications/missing-app", &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("missing-app"));
}

#[tokio::test]
async fn test_get_assessment() {
    let app = create_test_app();
    let token = login(&app).await;

    let (status, json) = send(
        &app,
        get(
            "/api/applications/fintravel-ai/assessments/assess-fin-002",
            &token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["threats"]["total"], 10);

    // Assessment from another application
    let (status, _) = send(
        &app,
        get(
            "/api/applications/fintravel-ai/assessments/assess-pay-001",
            &token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_compare_orders_chronologically() {
    let app = create_test_app();
    let token = login(&app).await;

    let (status, json) = send(
        &app,
        get(
            "/api/applications/fintravel-ai/compare?a=assess-fin-002&b=assess-fin-001",
            &token,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["older"]["id"], "assess-fin-001");
    assert_eq!(json["newer"]["id"], "assess-fin-002");
    assert_eq!(json["deltas"]["total"]["value"], 2);
    assert_eq!(json["deltas"]["total"]["trend"], "up");
    assert_eq!(json["deltas"]["high"]["trend"], "stable");
}

#[tokio::test]
async fn test_compare_invalid_pairs() {
    let app = create_test_app();
    let token = login(&app).await;

    for uri in [
        "/api/applications/fintravel-ai/compare?a=assess-fin-001&b=assess-fin-001",
        "/api/applications/fintravel-ai/compare?a=assess-fin-001&b=assess-pay-001",
        "/api/applications/fintravel-ai/compare?a=assess-fin-001",
    ] {
        let (status, json) = send(&app, get(uri, &token)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(json["error"].is_string());
    }
}

#[tokio::test]
async fn test_recent_assessments() {
    let app = create_test_app();
    let token = login(&app).await;

    let (status, json) = send(&app, get("/api/assessments/recent", &token)).await;
    assert_eq!(status, StatusCode::OK);

    let recent = json["assessments"].as_array().unwrap();
    assert_eq!(recent.len(), 5);
    assert_eq!(recent[0]["id"], "assess-pay-002");
    assert_eq!(recent[0]["appId"], "payment-gateway");
}

#[tokio::test]
async fn test_selection_window() {
    let app = create_test_app();
    let token = login(&app).await;
    let uri = "/api/applications/fintravel-ai/selection";

    for id in ["assess-fin-003", "assess-fin-001"] {
        let (status, _) = send(
            &app,
            with_body("POST", uri, &token, json!({"assessmentId": id})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, json) = send(
        &app,
        with_body("POST", uri, &token, json!({"assessmentId": "assess-fin-002"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["selected"], json!(["assess-fin-001", "assess-fin-002"]));
    assert_eq!(json["comparison"]["older"]["id"], "assess-fin-001");

    // Toggling again deselects
    let (_, json) = send(
        &app,
        with_body("POST", uri, &token, json!({"assessmentId": "assess-fin-001"})),
    )
    .await;
    assert_eq!(json["selected"], json!(["assess-fin-002"]));
    assert!(json["comparison"].is_null());

    let (_, json) = send(&app, get(uri, &token)).await;
    assert_eq!(json["selected"], json!(["assess-fin-002"]));
}

#[tokio::test]
async fn test_threats_sorted() {
    let app = create_test_app();
    let token = login(&app).await;

    let (status, json) = send(&app, get("/api/threat-model/threats", &token)).await;
    assert_eq!(status, StatusCode::OK);
    let threats = json["threats"].as_array().unwrap();
    assert_eq!(threats.len(), 8);
    assert_eq!(threats[0]["severity"], "critical");
    assert_eq!(threats[7]["severity"], "low");
    assert!(threats[0]["componentName"].is_string());
    assert_eq!(json["counts"]["critical"], 2);

    let (_, json) = send(&app, get("/api/threat-model/threats?sort=name", &token)).await;
    let threats = json["threats"].as_array().unwrap();
    assert_eq!(threats[0]["name"], "Indirect Prompt Injection");
    assert_eq!(threats[7]["name"], "Verbose Error Messages");
}

#[tokio::test]
async fn test_attack_path() {
    let app = create_test_app();
    let token = login(&app).await;

    let (status, json) = send(&app, get("/api/threat-model/attack-path", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["nodes"][0], "Internet");
    assert_eq!(json["nodes"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_reports_are_html() {
    let app = create_test_app();
    let token = login(&app).await;

    for uri in [
        "/api/reports/threat-model",
        "/api/reports/executive-summary?include_risks=false&include_recommendations=true",
    ] {
        let response = app.clone().oneshot(get(uri, &token)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
    }
}

#[tokio::test]
async fn test_notifications_mark_read() {
    let app = create_test_app();
    let token = login(&app).await;

    let (_, json) = send(&app, get("/api/notifications", &token)).await;
    assert_eq!(json["unread"], 2);
    assert_eq!(json["groups"][0]["appId"], "payment-gateway");

    let (status, _) = send(
        &app,
        with_body("POST", "/api/notifications/notif-1/read", &token, json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = send(&app, get("/api/notifications", &token)).await;
    assert_eq!(json["unread"], 1);

    let (status, _) = send(
        &app,
        with_body("POST", "/api/notifications/nope/read", &token, json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(
        &app,
        with_body("POST", "/api/notifications/read-all", &token, json!({})),
    )
    .await;
    let (_, json) = send(&app, get("/api/notifications", &token)).await;
    assert_eq!(json["unread"], 0);
}

#[tokio::test]
async fn test_approvals_filter_and_dismiss() {
    let app = create_test_app();
    let token = login(&app).await;

    let (_, json) = send(&app, get("/api/approvals?filter=skip", &token)).await;
    assert_eq!(json["approvals"].as_array().unwrap().len(), 1);
    assert_eq!(json["needsReview"], 2);

    let request = Request::builder()
        .method("DELETE")
        .uri("/api/approvals/pa-1")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = send(&app, get("/api/approvals", &token)).await;
    assert_eq!(json["approvals"].as_array().unwrap().len(), 2);
    assert_eq!(json["needsReview"], 1);
}

#[tokio::test]
async fn test_remediations() {
    let app = create_test_app();
    let token = login(&app).await;

    let (status, json) = send(&app, get("/api/remediations", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stats"]["total"], 5);
    assert_eq!(json["stats"]["inProgress"], 2);
    assert_eq!(json["stats"]["resolved"], 2);
}

#[tokio::test]
async fn test_clarification_flow() {
    let app = create_test_app();
    let token = login(&app).await;

    let (status, json) = send(
        &app,
        with_body("POST", "/api/clarifications", &token, json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["complete"], false);
    assert_eq!(json["messages"].as_array().unwrap().len(), 2);
    let id = json["id"].as_str().unwrap().to_string();
    let answers_uri = format!("/api/clarifications/{}/answers", id);

    let (status, _) = send(
        &app,
        with_body("POST", &answers_uri, &token, json!({"answer": "  "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for answer in ["Tokenized only", "Yes", "No"] {
        let (status, _) = send(
            &app,
            with_body("POST", &answers_uri, &token, json!({"answer": answer})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, json) = send(&app, get(&format!("/api/clarifications/{}", id), &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["complete"], true);
    assert_eq!(json["answers"].as_array().unwrap().len(), 3);

    let (status, _) = send(
        &app,
        with_body("POST", &answers_uri, &token, json!({"answer": "again"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_clarification() {
    let app = create_test_app();
    let token = login(&app).await;

    let (status, _) = send(
        &app,
        get(
            "/api/clarifications/00000000-0000-0000-0000-000000000000",
            &token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_clarification_owned_by_session() {
    let app = create_test_app();
    let alice = login(&app).await;
    let bob = login(&app).await;

    let (status, json) = send(
        &app,
        with_body("POST", "/api/clarifications", &alice, json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = json["id"].as_str().unwrap().to_string();
    let flow_uri = format!("/api/clarifications/{}", id);
    let answers_uri = format!("{}/answers", flow_uri);

    // Another session can neither read nor advance the flow
    let (status, _) = send(&app, get(&flow_uri, &bob)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(
        &app,
        with_body("POST", &answers_uri, &bob, json!({"answer": "Yes"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, json) = send(&app, get(&flow_uri, &alice)).await;
    assert_eq!(json["answers"].as_array().unwrap().len(), 0);

    // Signing out drops the flow
    let request = Request::builder()
        .method("DELETE")
        .uri("/api/session")
        .header(header::AUTHORIZATION, format!("Bearer {}", alice))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);

    let alice = login(&app).await;
    let (status, _) = send(&app, get(&flow_uri, &alice)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
