// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem::http::StatusCode;
use serde_json::json;

use crate::{
    modules::{
        common::create_api_error_response,
        error::{code::ErrorCode, ForwarderError},
    },
    raise_error,
};

fn graph_error(status: u16) -> ForwarderError {
    ForwarderError::GraphApi {
        status,
        code: "ErrorItemNotFound".into(),
        message: "The specified object was not found in the store.".into(),
        body: None,
        location: snafu::Location::default(),
    }
}

#[test]
fn graph_not_found_passes_through_as_404() {
    let error = graph_error(404);
    assert_eq!(error.status(), StatusCode::NOT_FOUND);
    assert_eq!(error.error_code(), ErrorCode::ResourceNotFound);
    assert!(error.is_not_found());
}

#[test]
fn graph_server_errors_map_to_500() {
    for status in [400, 409, 500, 503] {
        let error = graph_error(status);
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!error.is_not_found());
    }
    assert_eq!(graph_error(401).status(), StatusCode::UNAUTHORIZED);
}

#[test]
fn generic_errors_use_code_status() {
    let error = raise_error!("missing".into(), ErrorCode::InsufficientCriteria);
    assert_eq!(error.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error.to_string(), "missing");

    let error = raise_error!("gone".into(), ErrorCode::ResourceNotFound);
    assert!(error.is_not_found());
}

#[test]
fn graph_error_display_carries_service_code() {
    let error = graph_error(404);
    assert_eq!(
        error.to_string(),
        "Graph API returned 404 (ErrorItemNotFound): The specified object was not found in the store."
    );
}

async fn rendered(error: poem::Error) -> (StatusCode, serde_json::Value) {
    let response = error.into_response();
    let status = response.status();
    let body = response.into_body().into_string().await.unwrap();
    (status, serde_json::from_str(&body).unwrap())
}

#[tokio::test]
async fn timeout_renders_the_failure_body() {
    let (status, body) = rendered(create_api_error_response(
        "Request timed out after 5 seconds",
        ErrorCode::RequestTimeout,
    ))
    .await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(
        body,
        json!({"success": false, "error": "Request timed out after 5 seconds"})
    );
}

#[tokio::test]
async fn stage_failure_body_names_the_message() {
    let error = ForwarderError::PipelineStage {
        stage: "send",
        message_id: "AAMk1".into(),
        source: Box::new(graph_error(500)),
        location: snafu::Location::default(),
    };
    let (status, body) = rendered(error.into()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["messageIdUsed"], json!("AAMk1"));
    assert!(body["error"].as_str().unwrap().starts_with("send failed for message AAMk1"));
}
