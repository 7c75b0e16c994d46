// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem::http::StatusCode;
use poem_openapi::{payload::Json, ApiResponse, Object, OpenApi};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::modules::{
    common::auth::BearerToken,
    forward::{ForwardPipeline, ForwardReport},
    graph::{client::GraphClient, MailService},
    resolver::{MessageResolver, ResolutionRequest, ResolutionResult, ResolvedMessage},
    rest::api::ApiTags,
    settings::cli::SETTINGS,
};

pub struct ForwardApi;

/// Identifies the message to forward. Every field is optional; blank strings count as absent.
#[derive(Clone, Debug, Default, Deserialize, Serialize, Object)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct ForwardRequest {
    /// Native or legacy (EWS-style) id of the message.
    pub message_id: Option<String>,
    /// Exact subject, used by metadata search.
    pub subject: Option<String>,
    /// `;`-separated addresses that must all be recipients of the message.
    pub recipients: Option<String>,
    /// RFC 3339 time the message was received.
    pub received_time: Option<String>,
    /// Allow searching by subject, recipients and received time when the id
    /// does not resolve. Defaults to the server setting.
    pub use_metadata_search: Option<bool>,
}

impl ForwardRequest {
    pub fn to_resolution_request(&self, metadata_search_default: bool) -> ResolutionRequest {
        ResolutionRequest {
            provided_id: self.message_id.clone(),
            subject: self.subject.clone(),
            recipients: self.recipients.clone(),
            received_time: self.received_time.clone(),
            allow_metadata_search: self.use_metadata_search.unwrap_or(metadata_search_default),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Object)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct ForwardOutcome {
    pub success: bool,
    #[oai(skip_serializing_if_is_none)]
    pub error: Option<String>,
    /// The id the service acted on, present once resolution succeeded.
    #[oai(skip_serializing_if_is_none)]
    pub message_id_used: Option<String>,
    /// How the id was resolved: `direct`, `translated` or `metadataSearch`.
    #[oai(skip_serializing_if_is_none)]
    pub strategy: Option<String>,
    #[oai(skip_serializing_if_is_none)]
    pub new_message_id: Option<String>,
    #[oai(skip_serializing_if_is_none)]
    pub attachments_copied: Option<u32>,
    #[oai(skip_serializing_if_is_none)]
    pub attachments_skipped: Option<u32>,
}

impl ForwardOutcome {
    fn completed(resolved: &ResolvedMessage, report: ForwardReport) -> Self {
        Self {
            success: true,
            message_id_used: Some(report.original_id),
            strategy: Some(resolved.strategy.as_str().to_string()),
            new_message_id: Some(report.new_message_id),
            attachments_copied: Some(report.attachments_copied as u32),
            attachments_skipped: Some(report.attachments_skipped as u32),
            ..Default::default()
        }
    }

    pub(crate) fn failed(error: impl Into<String>, message_id_used: Option<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            message_id_used,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, ApiResponse)]
pub enum ForwardResponse {
    /// The duplicate was sent and the original moved to the trash.
    #[oai(status = 200)]
    Ok(Json<ForwardOutcome>),
    /// Not enough information to identify a message.
    #[oai(status = 400)]
    BadRequest(Json<ForwardOutcome>),
    /// No bearer credential was supplied, or the mail service rejected it.
    #[oai(status = 401)]
    Unauthorized(Json<ForwardOutcome>),
    /// The mail service refused access to the mailbox or message.
    #[oai(status = 403)]
    Forbidden(Json<ForwardOutcome>),
    /// No message matched.
    #[oai(status = 404)]
    NotFound(Json<ForwardOutcome>),
    /// The mail service failed.
    #[oai(status = 500)]
    ServerError(Json<ForwardOutcome>),
}

impl ForwardResponse {
    pub(crate) fn failure(status: StatusCode, outcome: ForwardOutcome) -> Self {
        let body = Json(outcome);
        match status {
            StatusCode::BAD_REQUEST => ForwardResponse::BadRequest(body),
            StatusCode::UNAUTHORIZED => ForwardResponse::Unauthorized(body),
            StatusCode::FORBIDDEN => ForwardResponse::Forbidden(body),
            StatusCode::NOT_FOUND => ForwardResponse::NotFound(body),
            _ => ForwardResponse::ServerError(body),
        }
    }

    pub fn outcome(&self) -> &ForwardOutcome {
        match self {
            ForwardResponse::Ok(body)
            | ForwardResponse::BadRequest(body)
            | ForwardResponse::Unauthorized(body)
            | ForwardResponse::Forbidden(body)
            | ForwardResponse::NotFound(body)
            | ForwardResponse::ServerError(body) => &body.0,
        }
    }
}

#[OpenApi(prefix_path = "/api/v1", tag = "ApiTags::Forward")]
impl ForwardApi {
    /// Locates a message and sends a duplicate of it.
    ///
    /// The message is found by its id, by translating a legacy id, or (when
    /// allowed) by searching on subject, recipients and received time. A copy
    /// with the same subject, body, recipients and attachments is then sent
    /// and the original is moved to Deleted Items.
    #[oai(path = "/forward", method = "post", operation_id = "forward_message")]
    async fn forward_message(
        &self,
        /// Identifying details of the message to forward.
        payload: Json<ForwardRequest>,
        token: BearerToken,
    ) -> ForwardResponse {
        let Some(access_token) = token.token() else {
            warn!("forward request without a bearer credential");
            return ForwardResponse::failure(
                StatusCode::UNAUTHORIZED,
                ForwardOutcome::failed("missing bearer credential", None),
            );
        };
        let client = match GraphClient::from_settings(access_token) {
            Ok(client) => client,
            Err(e) => {
                error!("failed to build Graph client: {}", e);
                return ForwardResponse::failure(e.status(), ForwardOutcome::failed(e.to_string(), None));
            }
        };
        forward_with(&client, &payload.0).await
    }
}

/// Resolves the requested message and runs the forwarding pipeline on it.
pub async fn forward_with<S: MailService>(service: &S, payload: &ForwardRequest) -> ForwardResponse {
    let request = payload.to_resolution_request(SETTINGS.forwarder_metadata_search_default);
    let resolved = match MessageResolver::new(service).resolve(&request).await {
        ResolutionResult::Resolved(resolved) => resolved,
        ResolutionResult::NotFound => {
            info!("no message matched the forward request");
            return ForwardResponse::failure(
                StatusCode::NOT_FOUND,
                ForwardOutcome::failed("no matching message was found", None),
            );
        }
        ResolutionResult::Invalid(failure) => {
            return ForwardResponse::failure(
                failure.error_code().status(),
                ForwardOutcome::failed(failure.to_string(), None),
            );
        }
    };
    info!(
        message_id = %resolved.id,
        strategy = resolved.strategy.as_str(),
        "resolved message to forward"
    );

    match ForwardPipeline::new(service).forward(&resolved.id).await {
        Ok(report) => ForwardResponse::Ok(Json(ForwardOutcome::completed(&resolved, report))),
        Err(e) => {
            error!(message_id = %resolved.id, "forward failed: {}", e);
            let message_id_used = e
                .message_id()
                .map(str::to_string)
                .or_else(|| Some(resolved.id.clone()));
            ForwardResponse::failure(e.status(), ForwardOutcome::failed(e.to_string(), message_id_used))
        }
    }
}
