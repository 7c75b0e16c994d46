// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::common::error::ErrorCapture;
use crate::modules::common::log::Tracing;
use crate::modules::common::timeout::{Timeout, TIMEOUT_HEADER};
use crate::modules::error::code::ErrorCode;
use crate::modules::error::handler::error_handler;
use crate::modules::error::ForwarderResult;
use crate::modules::rest::public::status::get_status;
use crate::modules::{settings::cli::SETTINGS, utils::shutdown::shutdown_signal};
use crate::raise_error;
use api::create_openapi_service;
use poem::get;
use poem::listener::TcpListener;
use poem::middleware::{CatchPanic, Compression, Cors};
use poem::{Endpoint, EndpointExt, Route, Server};
use std::time::Duration;
use tracing::info;

pub mod api;
pub mod public;

#[cfg(test)]
mod tests;

const DESCRIPTION: &str = r#"
    Finds a message in a Microsoft 365 mailbox and sends a duplicate of it on the caller's behalf.

    The message is located by id, by translating a legacy Exchange id, or by searching on subject,
    recipients and received time. The duplicate keeps the subject, body, recipients and attachments
    of the original, which is then moved to Deleted Items.
"#;

/// All routes with their middleware, without a listener.
pub fn build_route() -> impl Endpoint {
    let api_service = create_openapi_service()
        .description(DESCRIPTION)
        .summary("Re-send mailbox messages through Microsoft Graph");

    let swagger = api_service.swagger_ui();
    let spec_json = api_service.spec_endpoint();

    let open_api_route = Route::new()
        .nest_no_strip("/api/v1", api_service)
        .with(ErrorCapture)
        .with(Timeout)
        .with(Tracing);

    let mut cors_origins = SETTINGS.forwarder_cors_origins.clone();
    if cors_origins.is_empty() {
        cors_origins = ["*".to_string()].into_iter().collect();
    }

    let cors = Cors::new()
        .allow_origins(cors_origins)
        .allow_credentials(true)
        .allow_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_headers(vec!["Content-Type", "Authorization", TIMEOUT_HEADER])
        .max_age(SETTINGS.forwarder_cors_max_age);

    Route::new()
        .nest("/api-docs/swagger", swagger)
        .nest("/api-docs/spec.json", spec_json)
        .nest("/api/status", get(get_status))
        .nest_no_strip("/api/v1", open_api_route)
        .with(cors)
        .with_if(
            SETTINGS.forwarder_http_compression_enabled,
            Compression::new(),
        )
        .with(CatchPanic::new())
        .catch_all_error(error_handler)
}

pub async fn start_http_server() -> ForwarderResult<()> {
    let listener = TcpListener::bind((
        SETTINGS
            .forwarder_bind_ip
            .clone()
            .unwrap_or("0.0.0.0".into()),
        SETTINGS.forwarder_http_port,
    ));

    let server = Server::new(listener)
        .name("Graph Forwarder API Service")
        .idle_timeout(Duration::from_secs(60))
        .run_with_graceful_shutdown(build_route(), shutdown_signal(), Some(Duration::from_secs(5)));
    info!(
        "Graph Forwarder API Service is now running on port {}.",
        SETTINGS.forwarder_http_port
    );
    server
        .await
        .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::InternalError))
}
