// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem::http::StatusCode;
use poem::test::TestClient;
use serde_json::json;

use crate::modules::{
    graph::{
        mock::{candidate, MockMailService, DRAFT_ID},
        model::Message,
    },
    rest::{
        api::forward::{forward_with, ForwardOutcome, ForwardRequest, ForwardResponse},
        build_route,
    },
};

fn direct(id: &str) -> ForwardRequest {
    ForwardRequest {
        message_id: Some(id.into()),
        ..Default::default()
    }
}

fn service_with_message(id: &str) -> MockMailService {
    let mut service = MockMailService::default();
    service.messages.insert(
        id.to_string(),
        Message {
            id: id.to_string(),
            subject: Some("Invoice".into()),
            has_attachments: Some(false),
            ..Default::default()
        },
    );
    service
}

#[tokio::test]
async fn missing_credential_is_unauthorized() {
    let cli = TestClient::new(build_route());
    let resp = cli
        .post("/api/v1/forward")
        .body_json(&json!({"messageId": "AAMkAGI2"}))
        .send()
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
    resp.assert_json(json!({"success": false, "error": "missing bearer credential"}))
        .await;
}

#[tokio::test]
async fn blank_bearer_is_unauthorized() {
    let cli = TestClient::new(build_route());
    let resp = cli
        .post("/api/v1/forward")
        .header("Authorization", "Bearer   ")
        .body_json(&json!({"messageId": "AAMkAGI2"}))
        .send()
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn search_without_criteria_is_bad_request() {
    let cli = TestClient::new(build_route());
    let resp = cli
        .post("/api/v1/forward")
        .header("Authorization", "Bearer token")
        .body_json(&json!({"messageId": "  ", "subject": "", "useMetadataSearch": true}))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    resp.assert_json(json!({"success": false, "error": "insufficient search criteria"}))
        .await;
}

#[tokio::test]
async fn no_id_with_search_disabled_is_bad_request() {
    let cli = TestClient::new(build_route());
    let resp = cli
        .post("/api/v1/forward")
        .header("Authorization", "Bearer token")
        .body_json(&json!({"subject": "Invoice", "useMetadataSearch": false}))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    let json = resp.json().await;
    json.value().object().get("success").assert_bool(false);
}

#[tokio::test]
async fn unparseable_received_time_is_bad_request() {
    let cli = TestClient::new(build_route());
    let resp = cli
        .post("/api/v1/forward")
        .header("Authorization", "Bearer token")
        .body_json(&json!({"subject": "Invoice", "receivedTime": "yesterday"}))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn status_reports_ok() {
    let cli = TestClient::new(build_route());
    let resp = cli.get("/api/status").send().await;
    resp.assert_status_is_ok();
    let json = resp.json().await;
    json.value().object().get("status").assert_string("ok");
}

#[tokio::test]
async fn direct_id_is_forwarded() {
    let service = service_with_message("AAMkAGI2");
    let response = forward_with(&service, &direct("AAMkAGI2")).await;

    assert!(matches!(response, ForwardResponse::Ok(_)));
    let outcome = response.outcome();
    assert!(outcome.success);
    assert_eq!(outcome.message_id_used.as_deref(), Some("AAMkAGI2"));
    assert_eq!(outcome.strategy.as_deref(), Some("direct"));
    assert_eq!(outcome.new_message_id.as_deref(), Some(DRAFT_ID));
    assert_eq!(outcome.attachments_copied, Some(0));
}

#[tokio::test]
async fn search_match_is_forwarded() {
    let mut service = MockMailService::with_candidates(vec![candidate(
        "found-1",
        "Invoice",
        &["billing@x.com"],
    )]);
    service.messages.insert(
        "found-1".into(),
        Message {
            id: "found-1".into(),
            ..Default::default()
        },
    );
    let request = ForwardRequest {
        subject: Some("Invoice".into()),
        recipients: Some("billing@x.com".into()),
        use_metadata_search: Some(true),
        ..Default::default()
    };
    let response = forward_with(&service, &request).await;
    let outcome = response.outcome();
    assert!(outcome.success);
    assert_eq!(outcome.strategy.as_deref(), Some("metadataSearch"));
    assert_eq!(outcome.message_id_used.as_deref(), Some("found-1"));
}

#[tokio::test]
async fn no_candidate_is_not_found() {
    let service = MockMailService::default();
    let request = ForwardRequest {
        subject: Some("Invoice".into()),
        use_metadata_search: Some(true),
        ..Default::default()
    };
    let response = forward_with(&service, &request).await;
    assert!(matches!(response, ForwardResponse::NotFound(_)));
    assert!(!response.outcome().success);
}

#[tokio::test]
async fn search_failure_is_a_server_error_not_a_miss() {
    let service = MockMailService {
        query_failure: Some(503),
        ..Default::default()
    };
    let request = ForwardRequest {
        subject: Some("Invoice".into()),
        use_metadata_search: Some(true),
        ..Default::default()
    };
    let response = forward_with(&service, &request).await;
    assert!(matches!(response, ForwardResponse::ServerError(_)));
    let error = response.outcome().error.clone().unwrap_or_default();
    assert!(error.starts_with("search failed"), "{error}");
}

#[tokio::test]
async fn pipeline_failure_reports_the_id_used() {
    let mut service = service_with_message("AAMkAGI2");
    service.failing_stage = Some("send");
    let response = forward_with(&service, &direct("AAMkAGI2")).await;

    assert!(matches!(response, ForwardResponse::ServerError(_)));
    let outcome = response.outcome();
    assert!(!outcome.success);
    assert_eq!(outcome.message_id_used.as_deref(), Some("AAMkAGI2"));
    assert!(outcome.strategy.is_none());
}

#[tokio::test]
async fn missing_original_passes_through_as_not_found() {
    let service = MockMailService::default();
    let response = forward_with(&service, &direct("AAMkGone")).await;
    assert!(matches!(response, ForwardResponse::NotFound(_)));
    assert_eq!(
        response.outcome().message_id_used.as_deref(),
        Some("AAMkGone")
    );
}

#[tokio::test]
async fn malformed_json_gets_the_failure_body() {
    let cli = TestClient::new(build_route());
    let resp = cli
        .post("/api/v1/forward")
        .header("Authorization", "Bearer token")
        .content_type("application/json")
        .body("{not json")
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    let json = resp.json().await;
    let body = json.value().object();
    body.get("success").assert_bool(false);
    assert!(!body.get("error").string().is_empty());
    assert!(body.get_opt("code").is_none());
}

#[tokio::test]
async fn unknown_routes_get_the_failure_body() {
    let cli = TestClient::new(build_route());
    for path in ["/api/v1/nowhere", "/nowhere"] {
        let resp = cli.get(path).send().await;
        resp.assert_status(StatusCode::NOT_FOUND);
        let json = resp.json().await;
        json.value().object().get("success").assert_bool(false);
    }
}

#[tokio::test]
async fn wrong_method_gets_the_failure_body() {
    let cli = TestClient::new(build_route());
    let resp = cli.get("/api/v1/forward").send().await;
    resp.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    let json = resp.json().await;
    json.value().object().get("success").assert_bool(false);
}

#[test]
fn forbidden_passes_through() {
    let response = ForwardResponse::failure(
        StatusCode::FORBIDDEN,
        ForwardOutcome::failed("access denied", None),
    );
    assert!(matches!(response, ForwardResponse::Forbidden(_)));

    let response = ForwardResponse::failure(
        StatusCode::REQUEST_TIMEOUT,
        ForwardOutcome::failed("slow", None),
    );
    assert!(matches!(response, ForwardResponse::ServerError(_)));
}
